//! Roster document parsing and name extraction.

use patronsync_core::types::SupporterDocument;

use crate::error::RosterError;

/// Literal separator between member names in the joined display string.
pub const NAME_SEPARATOR: &str = " · ";

/// Parse and shape-check a roster document from its JSON body.
pub fn parse(body: &str) -> Result<SupporterDocument, RosterError> {
    serde_json::from_str(body).map_err(|err| RosterError::Format(err.to_string()))
}

/// Extract the active tier's member names as a single display string.
///
/// The active tier is the **last** element of `tiers` by document order —
/// a positional contract with the upstream document producer, not a
/// value-based choice. Names keep their document order and are joined with
/// [`NAME_SEPARATOR`].
///
/// Returns `None` when `tiers` is empty; the run then terminates
/// successfully without touching any file.
pub fn display_names(document: &SupporterDocument) -> Option<String> {
    let tier = document.tiers.last()?;
    Some(
        tier.members
            .iter()
            .map(|member| member.name.as_str())
            .collect::<Vec<_>>()
            .join(NAME_SEPARATOR),
    )
}
