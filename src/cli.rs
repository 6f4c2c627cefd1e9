use clap::{Parser, Subcommand};

/// CLI Tool to watch a github user's public activity feed
#[derive(Parser, Debug)]
pub struct Cli {
    #[command(subcommand)]
    pub commands: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the latest events, diff them against the last snapshot and report what is new
    Poll {
        /// Github username, prompted for when omitted
        username: Option<String>,

        /// Page of the events feed to fetch
        #[arg(short, long)]
        page: Option<u32>,
    },

    /// Print the stored aggregate snapshot
    Show,

    /// Delete the stored snapshot files
    Reset,
}
