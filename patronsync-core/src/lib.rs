//! Patronsync core library — domain types, run configuration, errors.
//!
//! Public API surface:
//! - [`types`] — roster document structs and marker/branch value types
//! - [`config`] — [`SyncConfig`] construction and input parsing
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::{parse_files_list, RepoSlug, SyncConfig};
pub use error::ConfigError;
pub use types::{BranchPolicy, MarkerSpec, Member, SupporterDocument, Tier};
