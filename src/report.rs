use std::fmt;

use colored::*;

use crate::events::{EventCountMap, TypeCount};

#[derive(Debug, PartialEq, Eq)]
pub enum ReportLine {
    NewEvents {
        repo: String,
        kind: String,
        count: u64,
    },
    NewPullRequests {
        repo: String,
        action: String,
        count: u64,
    },
    Quiet {
        repo: String,
    },
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportLine::NewEvents { repo, kind, count } => {
                write!(f, "{} new {}s in {}", count, kind, repo)
            }
            ReportLine::NewPullRequests {
                repo,
                action,
                count,
            } => {
                write!(f, "{} {} new pull requests in {}", action, count, repo)
            }
            ReportLine::Quiet { repo } => write!(f, "No new events in {}", repo),
        }
    }
}

/// Turns a diffed count map into report lines. One `Quiet` line per repo
/// whose deltas are all zero, otherwise one line per nonzero delta.
pub fn render(counts: &EventCountMap) -> Vec<ReportLine> {
    let mut lines = Vec::new();
    for (repo, repo_counts) in counts {
        let start = lines.len();
        for (kind, count) in repo_counts {
            match count {
                TypeCount::Total(0) => {}
                TypeCount::Total(count) => lines.push(ReportLine::NewEvents {
                    repo: repo.clone(),
                    kind: kind.clone(),
                    count: *count,
                }),
                TypeCount::ByAction(actions) => {
                    for (action, count) in actions {
                        if *count > 0 {
                            lines.push(ReportLine::NewPullRequests {
                                repo: repo.clone(),
                                action: action.clone(),
                                count: *count,
                            });
                        }
                    }
                }
            }
        }
        if lines.len() == start {
            lines.push(ReportLine::Quiet { repo: repo.clone() });
        }
    }
    lines
}

pub fn print_report(counts: &EventCountMap) {
    for line in render(counts) {
        match &line {
            ReportLine::Quiet { repo } => {
                println!("No new events in {}", repo.green());
            }
            ReportLine::NewEvents { repo, kind, count } => {
                println!(
                    "{} new {}s in {}",
                    count.to_string().bright_blue(),
                    kind,
                    repo.green()
                );
            }
            ReportLine::NewPullRequests {
                repo,
                action,
                count,
            } => {
                println!(
                    "{} {} new pull requests in {}",
                    action.magenta(),
                    count.to_string().bright_blue(),
                    repo.green()
                );
            }
        }
    }
}
