//! Unified diff rendering for dry-run output.

use std::path::{Path, PathBuf};

use similar::TextDiff;

/// A single target-file diff produced by a dry run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Render a unified diff between the current and the would-be file content.
///
/// `relative` is the path as configured (relative to the checkout), used in
/// the `a/` and `b/` headers.
pub fn render_unified(relative: &Path, existing: &str, updated: &str) -> FileDiff {
    let old_header = format!("a/{}", relative.display());
    let new_header = format!("b/{}", relative.display());
    let unified = TextDiff::from_lines(existing, updated)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string();
    FileDiff {
        path: relative.to_path_buf(),
        unified_diff: unified,
    }
}
