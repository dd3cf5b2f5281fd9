//! Decoder for one page of map search results.
//!
//! Unwraps the two framing stages ([`envelope`]), locates the listing array,
//! and reads each listing through the slot table in [`schema`].

pub mod envelope;
mod listing;
pub mod schema;

use placedump_core::{ListingPolicy, PlaceRecord};

use crate::error::{EnvelopeError, ScraperError};
use listing::{extract_listing, MissingField};
use schema::{lookup, ListingSchema, LISTING_SCHEMA_V1};

/// Records decoded from one page plus whatever went wrong along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPage {
    /// Records in upstream listing order.
    pub records: Vec<PlaceRecord>,
    pub defects: Vec<ListingDefect>,
    /// Listings the provider returned (metadata element excluded), whether
    /// or not they decoded.
    pub listing_count: usize,
}

/// A non-fatal problem with one listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDefect {
    /// 0-based position among the page's listings.
    pub index: usize,
    pub kind: DefectKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefectKind {
    /// A required field was absent; the listing was skipped.
    MissingRequired { field: &'static str },
    /// An optional field was present but unreadable; the record has `None`
    /// for it.
    FieldExtraction { field: &'static str, reason: String },
}

/// Decodes a raw response body with the current listing schema.
///
/// # Errors
///
/// See [`decode_page_with_schema`].
pub fn decode_page(body: &str, policy: ListingPolicy) -> Result<DecodedPage, ScraperError> {
    decode_page_with_schema(body, &LISTING_SCHEMA_V1, policy)
}

/// Decodes a raw response body using `schema` for slot positions.
///
/// # Errors
///
/// - [`ScraperError::Envelope`] if either framing stage fails or the
///   listing array is absent. No partial page is returned.
/// - [`ScraperError::ListingShape`] if a listing lacks a required field and
///   `policy` is [`ListingPolicy::AbortPage`].
pub fn decode_page_with_schema(
    body: &str,
    schema: &ListingSchema,
    policy: ListingPolicy,
) -> Result<DecodedPage, ScraperError> {
    let payload = envelope::unwrap_payload(body)?;
    let listings = lookup(&payload, schema.listings)
        .and_then(serde_json::Value::as_array)
        .ok_or(EnvelopeError::MissingListings)?;

    let listings = listings.get(schema.leading_metadata..).unwrap_or_default();
    let mut page = DecodedPage {
        records: Vec::with_capacity(listings.len()),
        defects: Vec::new(),
        listing_count: listings.len(),
    };

    for (index, listing) in listings.iter().enumerate() {
        match extract_listing(listing, schema) {
            Ok(extracted) => {
                for fault in extracted.faults {
                    tracing::warn!(
                        index,
                        field = fault.field,
                        reason = %fault.reason,
                        schema = schema.version,
                        "listing field could not be extracted"
                    );
                    page.defects.push(ListingDefect {
                        index,
                        kind: DefectKind::FieldExtraction {
                            field: fault.field,
                            reason: fault.reason,
                        },
                    });
                }
                page.records.push(extracted.record);
            }
            Err(MissingField(field)) => {
                if policy == ListingPolicy::AbortPage {
                    return Err(ScraperError::ListingShape { index, field });
                }
                tracing::warn!(
                    index,
                    field,
                    schema = schema.version,
                    "skipping listing without required field"
                );
                page.defects.push(ListingDefect {
                    index,
                    kind: DefectKind::MissingRequired { field },
                });
            }
        }
    }

    Ok(page)
}

#[cfg(test)]
#[path = "../decode_test.rs"]
mod tests;
