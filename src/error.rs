use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PollError {
    /// Connection, DNS or timeout failure before a response arrived.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error {status}: {reason}")]
    HttpStatus { status: u16, reason: String },

    #[error("failed to decode response body as an event list: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("unable to access snapshot file {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot file {path} is not valid JSON: {source}")]
    SnapshotFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A feed record missing one of the fields the aggregator needs.
/// These are reported and skipped, they never abort a poll.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("event {}: missing {field}", id.as_deref().unwrap_or("<no id>"))]
pub struct MalformedEvent {
    pub id: Option<String>,
    pub field: &'static str,
}
