//! Offset-based pagination over the map search endpoint.
//!
//! The provider pages by result rank: each request carries an offset
//! (`!8i<offset>` inside the `pb` parameter) and returns at most one page of
//! listings. There is no cursor or total count, so the driver walks offsets
//! in fixed steps until the caller's bound is reached or a short page signals
//! the end of results.

use std::future::Future;

use placedump_core::{AppConfig, ListingPolicy, PlaceRecord};

use crate::decode::{decode_page, ListingDefect};
use crate::error::ScraperError;
use crate::viewport::Viewport;

/// Listings the provider returns per page (`!7i20` in the parameter template).
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// One page's worth of request inputs.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest<'a> {
    pub viewport: &'a Viewport,
    pub offset: u32,
    pub query: &'a str,
}

impl PageRequest<'_> {
    /// The `pb` parameter for this page.
    #[must_use]
    pub fn pagination_params(&self) -> String {
        self.viewport.pagination_params(self.offset)
    }
}

/// Anything that can turn a [`PageRequest`] into a raw response body.
///
/// [`crate::MapsClient`] is the HTTP implementation; tests substitute an
/// in-memory source.
pub trait PageSource {
    fn fetch_page(
        &self,
        request: &PageRequest<'_>,
    ) -> impl Future<Output = Result<String, ScraperError>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationOptions {
    pub page_size: u32,
    /// Upper bound on records returned. Offsets at or past it are never
    /// requested.
    pub max_results: u32,
    pub listing_policy: ListingPolicy,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_results: 1000,
            listing_policy: ListingPolicy::Skip,
        }
    }
}

impl PaginationOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            page_size: config.page_size,
            max_results: config.max_results,
            listing_policy: config.listing_policy,
        }
    }
}

/// A listing defect together with the page it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDefect {
    pub offset: u32,
    pub defect: ListingDefect,
}

/// Aggregate result of a paginated search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceCollection {
    /// Records in page-major, within-page order.
    pub records: Vec<PlaceRecord>,
    pub defects: Vec<PageDefect>,
    /// Offsets requested, in order.
    pub offsets: Vec<u32>,
}

/// Fetches and decodes pages for `query` inside `descriptor` until
/// `options.max_results` is reached or a page comes back short.
///
/// A page is short when it yields fewer than `options.page_size` usable
/// records. Listings skipped for missing required fields do not count, so a
/// page with a skipped listing ends the walk.
///
/// **All-or-nothing semantics**: any transport, status, or payload error
/// aborts the walk and records from earlier pages are discarded.
///
/// # Errors
///
/// - [`ScraperError::InvalidViewport`] if `descriptor` does not parse
///   (checked before any request is made).
/// - [`ScraperError::InvalidPagination`] if `options.page_size` is zero.
/// - Any error returned by `source` or by [`decode_page`].
pub async fn fetch_all_places<S: PageSource>(
    source: &S,
    descriptor: &str,
    query: &str,
    options: &PaginationOptions,
) -> Result<PlaceCollection, ScraperError> {
    if options.page_size == 0 {
        return Err(ScraperError::InvalidPagination {
            reason: "page size must be at least 1".to_string(),
        });
    }
    let viewport = Viewport::parse(descriptor)?;
    let page_size = usize::try_from(options.page_size).unwrap_or(usize::MAX);
    let max_results = usize::try_from(options.max_results).unwrap_or(usize::MAX);

    let mut collection = PlaceCollection::default();
    let mut offset = 0u32;

    while offset < options.max_results {
        let request = PageRequest {
            viewport: &viewport,
            offset,
            query,
        };
        tracing::debug!(offset, query, "requesting results page");

        let body = source.fetch_page(&request).await?;
        let page = decode_page(&body, options.listing_policy).inspect_err(|e| {
            tracing::warn!(offset, error = %e, "results page could not be decoded");
        })?;

        tracing::info!(
            offset,
            listings = page.listing_count,
            records = page.records.len(),
            defects = page.defects.len(),
            "decoded results page"
        );

        let page_records = page.records.len();
        collection.offsets.push(offset);
        collection.records.extend(page.records);
        collection.defects.extend(
            page.defects
                .into_iter()
                .map(|defect| PageDefect { offset, defect }),
        );

        if page_records < page_size {
            tracing::debug!(
                offset,
                records = page_records,
                page_size,
                "short page; end of results"
            );
            break;
        }

        let Some(next) = offset.checked_add(options.page_size) else {
            break;
        };
        offset = next;
    }

    collection.records.truncate(max_results);
    Ok(collection)
}
