//! HTTP client for the map search endpoint.

use std::time::Duration;

use placedump_core::AppConfig;
use reqwest::{Client, Url};

use crate::error::ScraperError;
use crate::pagination::{PageRequest, PageSource};

const REFERER: &str = "https://www.google.com/";

/// HTTP client for `{base_url}/search?tbm=map`.
///
/// Sends one GET per results page with browser-like headers and the
/// session cookie (if any). Non-2xx responses come back as
/// [`ScraperError::UnexpectedStatus`]; the body is returned as text for the
/// decoder.
pub struct MapsClient {
    client: Client,
    base_url: String,
    language: String,
    cookie: Option<String>,
}

impl std::fmt::Debug for MapsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapsClient")
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .field("cookie", &self.cookie.as_ref().map(|_| "[redacted]"))
            .finish_non_exhaustive()
    }
}

impl MapsClient {
    /// Creates a `MapsClient` with a request timeout and fixed `User-Agent`.
    ///
    /// `base_url` is the scheme and host (no trailing slash), e.g.
    /// `https://www.google.com`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidBaseUrl`] if `base_url` cannot be parsed.
    /// - [`ScraperError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(
        base_url: &str,
        language: &str,
        user_agent: &str,
        cookie: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, ScraperError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ScraperError::InvalidBaseUrl {
            base_url: base_url.clone(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url,
            language: language.to_string(),
            cookie,
        })
    }

    /// # Errors
    ///
    /// See [`MapsClient::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            &config.base_url,
            &config.language,
            &config.user_agent,
            config.cookie.clone(),
            config.request_timeout_secs,
        )
    }

    /// Builds the search URL for one page.
    ///
    /// Query parameters are appended in the order the web client sends them.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] if the configured base URL
    /// cannot take a `/search` path.
    pub fn search_url(&self, request: &PageRequest<'_>) -> Result<Url, ScraperError> {
        let mut url = Url::parse(&format!("{}/search", self.base_url)).map_err(|e| {
            ScraperError::InvalidBaseUrl {
                base_url: self.base_url.clone(),
                reason: e.to_string(),
            }
        })?;

        url.query_pairs_mut()
            .append_pair("tbm", "map")
            .append_pair("authuser", "0")
            .append_pair("hl", &self.language)
            .append_pair("pb", &request.pagination_params())
            .append_pair("q", request.query)
            .append_pair("tch", "1")
            .append_pair("ech", "5");

        Ok(url)
    }

    /// Fetches one raw results page.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::UnexpectedStatus`] for any non-2xx status.
    /// - [`ScraperError::Http`] for network, TLS, or timeout failures.
    pub async fn fetch_results_page(
        &self,
        request: &PageRequest<'_>,
    ) -> Result<String, ScraperError> {
        let url = self.search_url(request)?;

        let mut builder = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "*/*")
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(reqwest::header::REFERER, REFERER);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(reqwest::header::COOKIE, cookie);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                offset = request.offset,
                "search request rejected"
            );
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.redacted_url(),
            });
        }

        Ok(response.text().await?)
    }

    /// The search endpoint without its query string; the `pb` value is too
    /// long to be useful in error messages.
    fn redacted_url(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

impl PageSource for MapsClient {
    async fn fetch_page(&self, request: &PageRequest<'_>) -> Result<String, ScraperError> {
        self.fetch_results_page(request).await
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
