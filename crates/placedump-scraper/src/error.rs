use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error(transparent)]
    InvalidViewport(#[from] ViewportError),

    #[error("malformed results payload: {0}")]
    Envelope(#[from] EnvelopeError),

    #[error("listing {index} has no {field} at its fixed slot")]
    ListingShape { index: usize, field: &'static str },

    #[error("invalid pagination options: {reason}")]
    InvalidPagination { reason: String },
}

/// A viewport descriptor that cannot be turned into pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewportError {
    #[error("viewport descriptor \"{descriptor}\" does not match @lat,lon,zoomz")]
    PatternMismatch { descriptor: String },

    #[error("viewport descriptor \"{descriptor}\" has {field} out of range")]
    OutOfRange {
        descriptor: String,
        field: &'static str,
    },
}

/// Failure in one of the two framing stages around the results payload.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("body is shorter than the {expected}-character trailing sentinel")]
    BodyTooShort { expected: usize },

    #[error("outer document is not valid JSON: {source}")]
    OuterJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("outer document has no string `d` field")]
    MissingDataField,

    #[error("`d` field is shorter than the {expected}-character prefix")]
    DataTooShort { expected: usize },

    #[error("inner document is not valid JSON: {source}")]
    InnerJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("inner document has no listing array")]
    MissingListings,
}
