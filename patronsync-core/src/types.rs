//! Domain types for the patronsync run.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem
//! paths. The roster structs deserialize directly from the remote JSON body.

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Roster document
// ---------------------------------------------------------------------------

/// The remote supporter roster as fetched from the configured endpoint.
///
/// `tiers` must be a JSON sequence; an *empty* sequence is valid and means
/// "nothing to do" for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SupporterDocument {
    pub tiers: Vec<Tier>,
}

/// A named group of supporters. Only the position of the tier inside
/// [`SupporterDocument::tiers`] matters to the logic; `name` is carried for
/// diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tier {
    #[serde(default)]
    pub name: String,
    pub members: Vec<Member>,
}

/// A single supporter. Only `name` is consumed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Member {
    pub name: String,
}

// ---------------------------------------------------------------------------
// Marker spec
// ---------------------------------------------------------------------------

/// The literal delimiters bounding the replaceable region of a target file,
/// plus the failure policy when a file has no such region.
///
/// Immutable for the whole run. Neither marker has a default — both must be
/// supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSpec {
    pub start: String,
    pub end: String,
    pub fail_on_missing: bool,
}

// ---------------------------------------------------------------------------
// Branch policy
// ---------------------------------------------------------------------------

/// How the working branch is prepared at the start of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BranchPolicy {
    /// Check out the branch if it already exists and fast-forward it from
    /// the base branch, otherwise create it fresh. Preserves unmerged prior
    /// edits on the branch.
    #[default]
    Reuse,
    /// `git checkout -B <branch> <base>` — force-reset the branch onto the
    /// base. Destructive, guarantees a clean base.
    ForceReset,
}
