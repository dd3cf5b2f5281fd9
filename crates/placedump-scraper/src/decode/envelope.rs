//! The two framing stages wrapped around a results payload.
//!
//! ```text
//! {"c":0,"d":")]}'\n[[...payload...]]", ...}/*""*/
//! ^ stage 1: drop the 6-char tail, parse, read `d`
//!              ^ stage 2: drop the 5-char head, parse
//! ```
//!
//! Strip lengths count characters, so a multi-byte character next to the
//! framing never splits.

use serde_json::Value;

use crate::error::EnvelopeError;

/// Characters of non-JSON sentinel after the outer document.
pub const OUTER_SUFFIX_LEN: usize = 6;
/// Characters of anti-JSON-hijacking prefix at the start of `d`.
pub const INNER_PREFIX_LEN: usize = 5;

/// Stage 1: strips the trailing sentinel and returns the `d` string.
///
/// # Errors
///
/// - [`EnvelopeError::BodyTooShort`] if the body has fewer than
///   [`OUTER_SUFFIX_LEN`] characters.
/// - [`EnvelopeError::OuterJson`] if the remainder is not JSON.
/// - [`EnvelopeError::MissingDataField`] if `d` is absent or not a string.
pub fn strip_outer(body: &str) -> Result<String, EnvelopeError> {
    let cut = body
        .char_indices()
        .rev()
        .nth(OUTER_SUFFIX_LEN - 1)
        .map(|(idx, _)| idx)
        .ok_or(EnvelopeError::BodyTooShort {
            expected: OUTER_SUFFIX_LEN,
        })?;

    let outer: Value = serde_json::from_str(&body[..cut])
        .map_err(|source| EnvelopeError::OuterJson { source })?;

    match outer.get("d") {
        Some(Value::String(data)) => Ok(data.clone()),
        _ => Err(EnvelopeError::MissingDataField),
    }
}

/// Stage 2: strips the leading prefix from `data` and parses the payload.
///
/// # Errors
///
/// - [`EnvelopeError::DataTooShort`] if `data` has fewer than
///   [`INNER_PREFIX_LEN`] characters.
/// - [`EnvelopeError::InnerJson`] if the remainder is not JSON.
pub fn strip_inner(data: &str) -> Result<Value, EnvelopeError> {
    let mut chars = data.char_indices();
    if chars.by_ref().take(INNER_PREFIX_LEN).count() < INNER_PREFIX_LEN {
        return Err(EnvelopeError::DataTooShort {
            expected: INNER_PREFIX_LEN,
        });
    }
    let start = chars.next().map_or(data.len(), |(idx, _)| idx);

    serde_json::from_str(&data[start..]).map_err(|source| EnvelopeError::InnerJson { source })
}

/// Runs both stages in sequence.
///
/// # Errors
///
/// Returns the first [`EnvelopeError`] from either stage.
pub fn unwrap_payload(body: &str) -> Result<Value, EnvelopeError> {
    let data = strip_outer(body)?;
    strip_inner(&data)
}
