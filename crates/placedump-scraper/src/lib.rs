pub mod client;
pub mod decode;
pub mod error;
pub mod pagination;
pub mod viewport;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::MapsClient;
pub use decode::{decode_page, DecodedPage, DefectKind, ListingDefect};
pub use error::{EnvelopeError, ScraperError, ViewportError};
pub use pagination::{
    fetch_all_places, PageDefect, PageRequest, PageSource, PaginationOptions, PlaceCollection,
};
pub use viewport::{encode_pagination, Viewport};
