//! Error types for patronsync-core.

use thiserror::Error;

/// All errors that can arise while building the run configuration.
///
/// Every variant is fatal and surfaces before any network or file activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The files-to-update input parsed to an empty list.
    #[error("no target files configured")]
    NoTargetFiles,

    /// A repository slug that is not of the form `owner/name`.
    #[error("invalid repository '{value}'; expected owner/name")]
    InvalidRepo { value: String },

    /// A repository slug is required but was not supplied.
    #[error("no repository configured; pass --repo owner/name")]
    MissingRepo,

    /// An API token is required but was not supplied.
    #[error("no API token configured; set the GITHUB_TOKEN environment variable")]
    MissingToken,
}
