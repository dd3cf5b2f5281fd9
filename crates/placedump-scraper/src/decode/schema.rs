//! Slot-path table for the positional listing payload.
//!
//! The provider sends each listing as nested arrays with no field names. All
//! index knowledge lives in [`ListingSchema`] so a format change means
//! editing one constant.

use serde_json::Value;

/// A fixed sequence of array indices.
pub type SlotPath = &'static [usize];

/// An attribute the provider omits for some listings: `branch` must be
/// present before `value` (relative to `branch`) is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionalSlot {
    pub branch: SlotPath,
    pub value: SlotPath,
}

/// Where each semantic field lives inside the payload.
///
/// `listings` is resolved against the unwrapped payload. `detail` is
/// resolved against one listing; every other path is relative to the
/// detail branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingSchema {
    pub version: &'static str,
    pub listings: SlotPath,
    /// Leading elements of the listing array that are metadata.
    pub leading_metadata: usize,
    pub detail: SlotPath,
    pub name: SlotPath,
    pub address: SlotPath,
    pub website: OptionalSlot,
    pub phone_number: OptionalSlot,
    /// `value` locates the array of day entries.
    pub hours: OptionalSlot,
    pub day_label: SlotPath,
    pub day_range: SlotPath,
    pub rating: OptionalSlot,
    pub review_count: OptionalSlot,
    /// URL carrying the `placeid=` token used to build the map link.
    pub place_url: OptionalSlot,
}

/// Rating, review count and place URL share one branch.
const RATING_BRANCH: SlotPath = &[4];

/// Layout observed on the `tbm=map` endpoint in mid-2024.
pub const LISTING_SCHEMA_V1: ListingSchema = ListingSchema {
    version: "2024-07",
    listings: &[0, 1],
    leading_metadata: 1,
    detail: &[14],
    name: &[11],
    address: &[2, 0],
    website: OptionalSlot {
        branch: &[7],
        value: &[0],
    },
    phone_number: OptionalSlot {
        branch: &[178],
        value: &[0],
    },
    hours: OptionalSlot {
        branch: &[34],
        value: &[1],
    },
    day_label: &[0],
    day_range: &[1, 0],
    rating: OptionalSlot {
        branch: RATING_BRANCH,
        value: &[7],
    },
    review_count: OptionalSlot {
        branch: RATING_BRANCH,
        value: &[3, 1],
    },
    place_url: OptionalSlot {
        branch: RATING_BRANCH,
        value: &[3, 0],
    },
};

/// Follows `path` from `root`, checking every hop.
///
/// Returns `None` if any index is out of range or lands on a non-array, or
/// if the final value is not [`is_present`].
#[must_use]
pub fn lookup<'a>(root: &'a Value, path: &[usize]) -> Option<&'a Value> {
    path.iter()
        .try_fold(root, |node, &idx| node.as_array()?.get(idx))
        .filter(|value| is_present(value))
}

/// Resolves an [`OptionalSlot`]: `Ok(None)` when the branch is absent,
/// `Err(())` when the branch is present but the value is not.
pub(crate) fn lookup_optional<'a>(
    detail: &'a Value,
    slot: &OptionalSlot,
) -> Result<Option<&'a Value>, ()> {
    let Some(branch) = lookup(detail, slot.branch) else {
        return Ok(None);
    };
    lookup(branch, slot.value).map(Some).ok_or(())
}

/// `null`, `[]` and `""` all mean the provider left the attribute out.
#[must_use]
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
