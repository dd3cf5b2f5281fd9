//! Synthetic results payloads for unit tests.

use serde_json::{json, Value};

/// Width of the detail branch; phone sits at slot 178.
const DETAIL_WIDTH: usize = 179;

/// Builds one positional listing with only the slots a test sets.
pub(crate) struct ListingFixture {
    detail: Vec<Value>,
}

impl ListingFixture {
    pub(crate) fn new(name: &str, address: &str) -> Self {
        Self::empty().set(11, json!(name)).set(2, json!([address]))
    }

    pub(crate) fn empty() -> Self {
        Self {
            detail: vec![Value::Null; DETAIL_WIDTH],
        }
    }

    pub(crate) fn set(mut self, slot: usize, value: Value) -> Self {
        self.detail[slot] = value;
        self
    }

    pub(crate) fn website(self, url: &str) -> Self {
        self.set(7, json!([url, "example.com"]))
    }

    pub(crate) fn phone(self, phone: &str) -> Self {
        self.set(178, json!([phone, [[phone, 1]]]))
    }

    pub(crate) fn hours(self, days: &[(&str, &str)]) -> Self {
        let entries: Vec<Value> = days
            .iter()
            .map(|(day, range)| json!([day, [range], null, 1]))
            .collect();
        self.set(34, json!([null, entries]))
    }

    pub(crate) fn rating(self, rating: f64, reviews: u64, place_url: &str) -> Self {
        self.set(
            4,
            json!([null, null, null, [place_url, reviews], null, null, null, rating]),
        )
    }

    pub(crate) fn build(self) -> Value {
        let mut listing = vec![Value::Null; 15];
        listing[14] = Value::Array(self.detail);
        Value::Array(listing)
    }
}

/// A place URL in the shape the rating branch carries.
pub(crate) fn place_url(token: &str) -> String {
    format!("https://search.google.com/local/reviews?placeid={token}&q=x&authuser=0&hl=en")
}

/// Wraps listings in the full two-stage envelope, with the metadata element
/// in front.
pub(crate) fn page_body(listings: Vec<Value>) -> String {
    let mut array = vec![json!(["metadata", 0])];
    array.extend(listings);
    let payload = json!([["query", array]]);
    let inner = format!(")]}}'\n{payload}");
    let outer = json!({ "c": 0, "d": inner, "e": "token", "p": true });
    format!("{outer}/*\"\"*/")
}

/// A page of `count` minimal but valid listings named `"<prefix> <n>"`.
pub(crate) fn numbered_page(prefix: &str, count: usize) -> String {
    page_body(
        (0..count)
            .map(|n| ListingFixture::new(&format!("{prefix} {n}"), "Somewhere").build())
            .collect(),
    )
}
