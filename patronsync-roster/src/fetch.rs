//! HTTP retrieval of the roster document.

use patronsync_core::types::SupporterDocument;

use crate::document;
use crate::error::RosterError;

/// Fetch and shape-check the roster from `url`.
///
/// Single-attempt semantics: no retries, default `ureq` timeouts. A
/// non-success HTTP status maps to [`RosterError::Status`]; transport
/// failures map to [`RosterError::Network`].
pub fn fetch(url: &str) -> Result<SupporterDocument, RosterError> {
    log::debug!("fetching roster from {url}");

    let response = ureq::get(url).call().map_err(|err| match err {
        ureq::Error::Status(status, _) => RosterError::Status { status },
        transport => RosterError::Network(Box::new(transport)),
    })?;

    let body = response.into_string().map_err(RosterError::Body)?;
    document::parse(&body)
}
