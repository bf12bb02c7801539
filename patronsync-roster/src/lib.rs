//! # patronsync-roster
//!
//! Fetches and validates the remote supporter roster.
//!
//! Call [`fetch`] to retrieve and shape-check the document, then
//! [`display_names`] to extract the active tier's member names as a single
//! joined display string.

pub mod document;
pub mod error;
pub mod fetch;

pub use document::{display_names, parse, NAME_SEPARATOR};
pub use error::RosterError;
pub use fetch::fetch;
