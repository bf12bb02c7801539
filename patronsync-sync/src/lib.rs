//! # patronsync-sync
//!
//! Marker substitution, hash-gated atomic file writes, and the
//! synchronization pipeline that drives the git and pull-request gateways.
//!
//! Call [`pipeline::run`] for the full fetch → substitute → commit → PR
//! flow, or [`pipeline::dry_run`] to preview the per-file diffs without any
//! version-control or network side effects beyond the roster fetch.

pub mod diff;
pub mod error;
pub mod git;
pub mod github;
pub mod markers;
pub mod pipeline;
pub mod writer;

pub use error::SyncError;
pub use git::{GitCli, VcsGateway};
pub use github::{GitHubApi, PullRequest, PullRequestGateway};
pub use pipeline::{dry_run, run, FileOutcome, PullRequestOutcome, RunOutcome};
pub use writer::WriteResult;
