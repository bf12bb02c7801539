//! Error types for patronsync-sync.

use std::path::PathBuf;

use thiserror::Error;

use patronsync_core::error::ConfigError;
use patronsync_roster::RosterError;

/// All fatal errors that can abort a sync run.
///
/// Per-file failures (marker region missing under the lenient policy, file
/// read/write errors) are logged and folded into per-file outcomes instead
/// of surfacing here.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Invalid run configuration; raised before any network or file I/O.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Roster fetch or validation failure.
    #[error("roster error: {0}")]
    Roster(#[from] RosterError),

    /// Marker regions were missing or misordered in one or more target
    /// files while the fail-on-missing policy is in force. Raised only
    /// after every file has been attempted.
    #[error("marker region not found in {failed} of {total} target file(s)")]
    Markers { failed: usize, total: usize },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A git branch/stage/commit/push operation failed.
    #[error("git error: {0}")]
    Vcs(String),

    /// The pull-request service rejected a list or create call.
    #[error("pull request API error: {0}")]
    PullRequest(String),

    /// JSON encode/decode failure on a gateway payload.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
