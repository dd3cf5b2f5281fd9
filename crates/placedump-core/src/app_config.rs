use std::path::PathBuf;

/// What the decoder does with a listing that lacks a required field
/// (name or address).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListingPolicy {
    /// Drop the listing, record a defect, and keep the rest of the page.
    #[default]
    Skip,
    /// Fail the whole page.
    AbortPage,
}

impl std::fmt::Display for ListingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingPolicy::Skip => write!(f, "skip"),
            ListingPolicy::AbortPage => write!(f, "abort"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// Scheme and host of the map search service, without a trailing path.
    pub base_url: String,
    /// Interface language sent as the `hl` query parameter.
    pub language: String,
    pub user_agent: String,
    /// Session cookie forwarded verbatim. Supplied by the operator.
    pub cookie: Option<String>,
    pub request_timeout_secs: u64,
    pub page_size: u32,
    pub max_results: u32,
    pub listing_policy: ListingPolicy,
    pub log_level: String,
    pub output_dir: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .field("user_agent", &self.user_agent)
            .field("cookie", &self.cookie.as_ref().map(|_| "[redacted]"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("page_size", &self.page_size)
            .field("max_results", &self.max_results)
            .field("listing_policy", &self.listing_policy)
            .field("log_level", &self.log_level)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}
