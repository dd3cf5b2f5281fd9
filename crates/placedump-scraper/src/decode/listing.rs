//! Field extraction for a single positional listing.

use std::sync::LazyLock;

use placedump_core::{DayHours, PlaceRecord};
use regex::Regex;
use serde_json::Value;

use super::schema::{lookup, lookup_optional, ListingSchema, OptionalSlot};

static PLACE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"placeid=([^&]+)").expect("valid regex"));

pub(crate) const MAP_LINK_BASE: &str = "https://www.google.com/maps/place/?q=place_id:";

/// Narrow no-break space the provider puts between times and AM/PM.
const NARROW_NBSP: char = '\u{202f}';

/// A required field could not be read; the listing cannot become a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct MissingField(pub &'static str);

/// An optional field that was present but unreadable. The record keeps the
/// field as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct FieldFault {
    pub field: &'static str,
    pub reason: String,
}

pub(super) struct ExtractedListing {
    pub record: PlaceRecord,
    pub faults: Vec<FieldFault>,
}

pub(super) fn extract_listing(
    listing: &Value,
    schema: &ListingSchema,
) -> Result<ExtractedListing, MissingField> {
    let detail = lookup(listing, schema.detail).ok_or(MissingField("detail"))?;
    let name = required_str(detail, schema.name, "name")?;
    let address = required_str(detail, schema.address, "address")?;

    let mut faults = Vec::new();
    let website = keep(&mut faults, "website", optional_str(detail, &schema.website));
    let phone_number = keep(
        &mut faults,
        "phone_number",
        optional_str(detail, &schema.phone_number),
    );
    let map_link = keep(&mut faults, "map_link", map_link(detail, &schema.place_url));
    let rating = keep(
        &mut faults,
        "rating",
        optional_number(detail, &schema.rating, Value::as_f64, "a number"),
    );
    let review_count = keep(
        &mut faults,
        "review_count",
        optional_number(
            detail,
            &schema.review_count,
            Value::as_u64,
            "a non-negative integer",
        ),
    );

    let hours = keep(&mut faults, "hours", opening_hours(detail, schema));

    Ok(ExtractedListing {
        record: PlaceRecord {
            name,
            address,
            website,
            phone_number,
            hours,
            rating,
            review_count,
            map_link,
        },
        faults,
    })
}

fn required_str(
    detail: &Value,
    path: &[usize],
    field: &'static str,
) -> Result<String, MissingField> {
    lookup(detail, path)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(MissingField(field))
}

fn optional_str(detail: &Value, slot: &OptionalSlot) -> Result<Option<String>, String> {
    match lookup_optional(detail, slot) {
        Ok(None) => Ok(None),
        Ok(Some(Value::String(s))) => Ok(Some(s.clone())),
        Ok(Some(other)) => Err(format!("expected a string, found {}", kind(other))),
        Err(()) => Err("branch present but value slot is empty".to_string()),
    }
}

/// Unwraps an optional field, recording a fault when it was unreadable.
fn keep<T>(
    faults: &mut Vec<FieldFault>,
    field: &'static str,
    result: Result<Option<T>, String>,
) -> Option<T> {
    result.unwrap_or_else(|reason| {
        faults.push(FieldFault { field, reason });
        None
    })
}

/// Inside a present rating branch the value slot is sometimes empty on
/// places with no reviews yet; that is absence, not a fault. A value of the
/// wrong type is a fault.
fn optional_number<T>(
    detail: &Value,
    slot: &OptionalSlot,
    convert: fn(&Value) -> Option<T>,
    expected: &str,
) -> Result<Option<T>, String> {
    match lookup_optional(detail, slot) {
        Ok(None) | Err(()) => Ok(None),
        Ok(Some(value)) => convert(value)
            .map(Some)
            .ok_or_else(|| format!("expected {expected}, found {}", describe(value))),
    }
}

fn map_link(detail: &Value, slot: &OptionalSlot) -> Result<Option<String>, String> {
    let url = match lookup_optional(detail, slot) {
        Ok(None) => return Ok(None),
        Ok(Some(Value::String(url))) => url,
        Ok(Some(other)) => return Err(format!("expected a URL string, found {}", kind(other))),
        Err(()) => return Err("rating branch has no place URL".to_string()),
    };

    let token = PLACE_ID_RE
        .captures(url)
        .and_then(|cap| cap.get(1))
        .ok_or_else(|| format!("place URL has no placeid token: {url}"))?;

    Ok(Some(format!("{MAP_LINK_BASE}{}", token.as_str())))
}

fn opening_hours(
    detail: &Value,
    schema: &ListingSchema,
) -> Result<Option<Vec<DayHours>>, String> {
    let Some(branch) = lookup(detail, schema.hours.branch) else {
        return Ok(None);
    };
    // A present hours branch with an empty day list is the provider's
    // "hours unknown" shape.
    let Some(days) = lookup(branch, schema.hours.value) else {
        return Ok(None);
    };
    let days = days
        .as_array()
        .ok_or_else(|| format!("expected an array of days, found {}", kind(days)))?;

    days.iter()
        .enumerate()
        .map(|(idx, entry)| {
            let day = lookup(entry, schema.day_label).and_then(Value::as_str);
            let range = lookup(entry, schema.day_range).and_then(Value::as_str);
            match (day, range) {
                (Some(day), Some(range)) => Ok(DayHours {
                    day: day.to_string(),
                    hours: range.replace(NARROW_NBSP, " "),
                }),
                _ => Err(format!("day entry {idx} has no label or time range")),
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn describe(value: &Value) -> String {
    match value {
        Value::Number(n) => format!("the number {n}"),
        other => kind(other).to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
