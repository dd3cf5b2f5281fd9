use serde::{Deserialize, Serialize};

/// A place listing decoded from one page of map search results, flattened
/// for export.
///
/// Every `Option` field is `None` when the upstream listing omits that
/// attribute entirely; the provider drops whole branches rather than sending
/// null placeholders, so `None` here means "not published", not "empty".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub name: String,
    /// First line of the formatted address as the provider renders it.
    pub address: String,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    /// Opening hours in the order the provider lists the days.
    pub hours: Option<Vec<DayHours>>,
    /// Average star rating, e.g. `4.3`.
    pub rating: Option<f64>,
    pub review_count: Option<u64>,
    /// Canonical `place_id` link, e.g.
    /// `"https://www.google.com/maps/place/?q=place_id:ChIJ..."`.
    pub map_link: Option<String>,
}

impl PlaceRecord {
    /// Returns the time range listed for `day`, if the place publishes hours
    /// for it.
    #[must_use]
    pub fn hours_for(&self, day: &str) -> Option<&str> {
        self.hours
            .as_deref()?
            .iter()
            .find(|entry| entry.day == day)
            .map(|entry| entry.hours.as_str())
    }
}

/// One day's opening hours, e.g. `Monday` → `"9 AM–5 PM"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    pub day: String,
    pub hours: String,
}
