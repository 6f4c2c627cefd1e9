mod cli;
mod config;
mod error;
mod events;
mod fetch;
mod report;
mod snapshot;

use std::fs;
use std::io::{self, Write};

use chrono::Local;
use clap::Parser;
use colored::*;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::error::PollError;
use crate::fetch::Fetcher;
use crate::snapshot::SnapshotStore;

fn main() {
    let cli = Cli::parse();
    let toml_path = dirs::home_dir().unwrap().join(".ghactivity.toml");
    let config = Config::create_or_load(toml_path);

    match cli.commands {
        Commands::Poll { username, page } => {
            let username = username.unwrap_or_else(prompt_username);
            if username.is_empty() {
                eprintln!("No username given");
                std::process::exit(1);
            }
            if let Err(e) = run_poll(&config, &username, page) {
                eprintln!("{} Poll failed: {}", "✗".red(), e);
                std::process::exit(1);
            }
        }
        Commands::Show => show_snapshot(&config),
        Commands::Reset => reset_snapshots(&config),
    }
}

fn run_poll(config: &Config, username: &str, page: Option<u32>) -> Result<(), PollError> {
    let token = std::env::var(&config.token_var).ok();
    if token.is_none() {
        println!(
            "{} {} is not set, polling without a token",
            "!".yellow(),
            config.token_var
        );
    }

    println!(
        "Polling events for {} at {}",
        username.green(),
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    let fetcher = Fetcher::new(config, token)?;
    let events = fetcher.fetch_events(username, page)?;
    snapshot::write_json_file(&config.response_path(), &events)?;

    let aggregation = events::aggregate(&events);
    for malformed in &aggregation.skipped {
        eprintln!("{} Skipped {}", "!".yellow(), malformed);
    }

    // The prior snapshot has to be read before the new one replaces it.
    let store = SnapshotStore::new(config.snapshot_path());
    let diffed = match store.load()? {
        Some(prior) => snapshot::diff(&aggregation.counts, &prior),
        None => {
            println!("No earlier snapshot found, everything counts as new");
            aggregation.counts.clone()
        }
    };
    store.save(&aggregation.counts)?;

    report::print_report(&diffed);
    Ok(())
}

fn show_snapshot(config: &Config) {
    let store = SnapshotStore::new(config.snapshot_path());
    match store.load() {
        Ok(Some(counts)) => match snapshot::to_pretty_json(&counts) {
            Ok(rendered) => print!("{}", rendered),
            Err(e) => {
                eprintln!("Failed to render snapshot: {}", e);
                std::process::exit(1);
            }
        },
        Ok(None) => println!("No snapshot yet. Run `ghactivity poll` first."),
        Err(e) => {
            eprintln!("Failed to read snapshot: {}", e);
            std::process::exit(1);
        }
    }
}

fn reset_snapshots(config: &Config) {
    for path in [config.response_path(), config.snapshot_path()] {
        if path.exists() {
            match fs::remove_file(&path) {
                Ok(()) => println!("{} {}", "Removed".red(), path.display()),
                Err(e) => eprintln!("Failed to remove {}: {}", path.display(), e),
            }
        } else {
            println!("{} does not exist", path.display());
        }
    }
}

fn prompt_username() -> String {
    print!("Enter your github username: ");
    io::stdout().flush().expect("Unable to flush stdout");
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .expect("Unable to read username");
    line.trim().to_string()
}
