use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_listing_policy_skip() {
    assert_eq!(parse_listing_policy("skip").unwrap(), ListingPolicy::Skip);
}

#[test]
fn parse_listing_policy_abort_aliases() {
    assert_eq!(
        parse_listing_policy("abort").unwrap(),
        ListingPolicy::AbortPage
    );
    assert_eq!(
        parse_listing_policy(" Abort-Page ").unwrap(),
        ListingPolicy::AbortPage
    );
}

#[test]
fn parse_listing_policy_unknown_fails() {
    let err = parse_listing_policy("ignore").unwrap_err();
    assert!(
        matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "PLACEDUMP_LISTING_POLICY")
    );
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.base_url, "https://www.google.com");
    assert_eq!(cfg.language, "en");
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    assert!(cfg.cookie.is_none());
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.page_size, 20);
    assert_eq!(cfg.max_results, 1000);
    assert_eq!(cfg.listing_policy, ListingPolicy::Skip);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.output_dir.to_str(), Some("."));
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let mut map = HashMap::new();
    map.insert("PLACEDUMP_BASE_URL", "http://127.0.0.1:8080/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.base_url, "http://127.0.0.1:8080");
}

#[test]
fn base_url_without_scheme_fails() {
    let mut map = HashMap::new();
    map.insert("PLACEDUMP_BASE_URL", "www.google.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLACEDUMP_BASE_URL"),
        "expected InvalidEnvVar(PLACEDUMP_BASE_URL), got: {result:?}"
    );
}

#[test]
fn cookie_is_read_when_present() {
    let mut map = HashMap::new();
    map.insert("PLACEDUMP_COOKIE", "NID=abc; AEC=def");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.cookie.as_deref(), Some("NID=abc; AEC=def"));
}

#[test]
fn blank_cookie_is_treated_as_unset() {
    let mut map = HashMap::new();
    map.insert("PLACEDUMP_COOKIE", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.cookie.is_none());
}

#[test]
fn debug_output_redacts_cookie() {
    let mut map = HashMap::new();
    map.insert("PLACEDUMP_COOKIE", "NID=super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn request_timeout_override() {
    let mut map = HashMap::new();
    map.insert("PLACEDUMP_REQUEST_TIMEOUT_SECS", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 5);
}

#[test]
fn request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("PLACEDUMP_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLACEDUMP_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(PLACEDUMP_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn page_size_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("PLACEDUMP_PAGE_SIZE", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLACEDUMP_PAGE_SIZE"),
        "expected InvalidEnvVar(PLACEDUMP_PAGE_SIZE), got: {result:?}"
    );
}

#[test]
fn max_results_override() {
    let mut map = HashMap::new();
    map.insert("PLACEDUMP_MAX_RESULTS", "60");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_results, 60);
}

#[test]
fn max_results_negative_is_rejected() {
    let mut map = HashMap::new();
    map.insert("PLACEDUMP_MAX_RESULTS", "-20");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLACEDUMP_MAX_RESULTS"),
        "expected InvalidEnvVar(PLACEDUMP_MAX_RESULTS), got: {result:?}"
    );
}

#[test]
fn listing_policy_from_env() {
    let mut map = HashMap::new();
    map.insert("PLACEDUMP_LISTING_POLICY", "abort");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.listing_policy, ListingPolicy::AbortPage);
}
