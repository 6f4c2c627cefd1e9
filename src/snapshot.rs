use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::PollError;
use crate::events::{EventCountMap, RepoCounts, TypeCount};

/// On-disk carrier of the aggregate between runs. The prior snapshot must
/// be loaded before `save` replaces the file, otherwise a poll would diff
/// against its own output.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` means no snapshot exists yet (first run).
    pub fn load(&self) -> Result<Option<EventCountMap>, PollError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(|source| PollError::Snapshot {
            path: self.path.clone(),
            source,
        })?;
        let counts =
            serde_json::from_str(&content).map_err(|source| PollError::SnapshotFormat {
                path: self.path.clone(),
                source,
            })?;
        Ok(Some(counts))
    }

    pub fn save(&self, counts: &EventCountMap) -> Result<(), PollError> {
        write_json_file(&self.path, counts)
    }
}

/// Writes `value` as UTF-8 JSON with 4-space indentation.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), PollError> {
    let rendered = to_pretty_json(value).map_err(|source| PollError::SnapshotFormat {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, rendered).map_err(|source| PollError::Snapshot {
        path: path.to_path_buf(),
        source,
    })
}

pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    buf.push(b'\n');
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8(buf).expect("serializer produced invalid UTF-8"))
}

/// Rewrites every leaf of `new` as the number of occurrences not present in
/// `prior`: `max(new - old, 0)`. Keys absent from the prior snapshot count
/// as fully new; keys present only in the prior snapshot are dropped.
pub fn diff(new: &EventCountMap, prior: &EventCountMap) -> EventCountMap {
    new.iter()
        .map(|(repo, repo_counts)| {
            let diffed = match prior.get(repo) {
                Some(prior_counts) => diff_repo(repo_counts, prior_counts),
                None => repo_counts.clone(),
            };
            (repo.clone(), diffed)
        })
        .collect()
}

fn diff_repo(new: &RepoCounts, prior: &RepoCounts) -> RepoCounts {
    new.iter()
        .map(|(kind, count)| {
            let delta = match (count, prior.get(kind)) {
                (TypeCount::Total(n), Some(TypeCount::Total(old))) => {
                    TypeCount::Total(n.saturating_sub(*old))
                }
                (TypeCount::ByAction(actions), Some(TypeCount::ByAction(old_actions))) => {
                    TypeCount::ByAction(
                        actions
                            .iter()
                            .map(|(action, n)| {
                                let old = old_actions.get(action).copied().unwrap_or(0);
                                (action.clone(), n.saturating_sub(old))
                            })
                            .collect(),
                    )
                }
                // no prior entry, or the prior shape disagrees: all new
                (count, _) => count.clone(),
            };
            (kind.to_string(), delta)
        })
        .collect()
}
