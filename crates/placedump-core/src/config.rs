use crate::app_config::{AppConfig, ListingPolicy};
use crate::ConfigError;

/// Browser profile the provider serves full result payloads to.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; CrOS x86_64 14541.0.0) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if any value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let base_url = or_default("PLACEDUMP_BASE_URL", "https://www.google.com")
        .trim_end_matches('/')
        .to_string();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "PLACEDUMP_BASE_URL".to_string(),
            reason: format!("\"{base_url}\" must start with http:// or https://"),
        });
    }

    let language = or_default("PLACEDUMP_LANGUAGE", "en");
    let user_agent = or_default("PLACEDUMP_USER_AGENT", DEFAULT_USER_AGENT);
    let cookie = lookup("PLACEDUMP_COOKIE")
        .ok()
        .filter(|value| !value.trim().is_empty());

    let request_timeout_secs = parse_u64("PLACEDUMP_REQUEST_TIMEOUT_SECS", "30")?;

    let page_size = parse_u32("PLACEDUMP_PAGE_SIZE", "20")?;
    if page_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PLACEDUMP_PAGE_SIZE".to_string(),
            reason: "page size must be at least 1".to_string(),
        });
    }
    let max_results = parse_u32("PLACEDUMP_MAX_RESULTS", "1000")?;

    let listing_policy = parse_listing_policy(&or_default("PLACEDUMP_LISTING_POLICY", "skip"))?;

    let log_level = or_default("PLACEDUMP_LOG_LEVEL", "info");
    let output_dir = PathBuf::from(or_default("PLACEDUMP_OUTPUT_DIR", "."));

    Ok(AppConfig {
        base_url,
        language,
        user_agent,
        cookie,
        request_timeout_secs,
        page_size,
        max_results,
        listing_policy,
        log_level,
        output_dir,
    })
}

/// Parse a string into a `ListingPolicy` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_listing_policy(s: &str) -> Result<ListingPolicy, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "skip" => Ok(ListingPolicy::Skip),
        "abort" | "abort-page" => Ok(ListingPolicy::AbortPage),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PLACEDUMP_LISTING_POLICY".to_string(),
            reason: format!("unknown policy \"{other}\"; expected skip or abort"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
