//! Error types for patronsync-roster.

use thiserror::Error;

/// All errors that can arise while fetching the roster.
///
/// An empty `tiers` sequence is *not* an error — the caller treats it as a
/// successful no-op.
#[derive(Debug, Error)]
pub enum RosterError {
    /// Transport-level failure reaching the roster endpoint.
    #[error("roster endpoint unreachable: {0}")]
    Network(#[source] Box<ureq::Error>),

    /// The endpoint answered with a non-success HTTP status.
    #[error("roster endpoint returned HTTP {status}")]
    Status { status: u16 },

    /// The response body could not be read.
    #[error("failed to read roster response body: {0}")]
    Body(#[source] std::io::Error),

    /// The body did not match the expected document shape — not an object,
    /// `tiers` not a sequence, or a tier's `members` not a sequence.
    #[error("malformed roster document: {0}")]
    Format(String),
}
