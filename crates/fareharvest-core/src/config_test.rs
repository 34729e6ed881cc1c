use std::collections::HashMap;
use std::env::VarError;

use chrono::NaiveDate;

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
fn build_app_config_defaults_from_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.route.to_string(), "LAX-ATL");
    assert_eq!(cfg.window.start(), 99);
    assert_eq!(cfg.window.end(), 160);
    assert_eq!(cfg.store_path.to_str(), Some("db.csv"));
    assert_eq!(cfg.diagnostic_path.to_str(), Some("no_offers.html"));
    assert_eq!(cfg.base_url, "https://www.kayak.com");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(cfg.accept_language, "en-US,en;q=0.5");
    assert!(cfg.cookie.is_none());
    assert!(cfg.cookie_issued_on.is_none());
    assert_eq!(cfg.cookie_max_age_days, 14);
    assert_eq!(cfg.inter_request_delay_ms, 0);
}

#[test]
fn build_app_config_reads_route_override() {
    let mut map = HashMap::new();
    map.insert("FAREHARVEST_ROUTE", "jfk-lhr");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.route.to_string(), "JFK-LHR");
}

#[test]
fn build_app_config_rejects_invalid_route() {
    let mut map = HashMap::new();
    map.insert("FAREHARVEST_ROUTE", "nowhere");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FAREHARVEST_ROUTE"),
        "expected InvalidEnvVar(FAREHARVEST_ROUTE), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_numeric_offset() {
    let mut map = HashMap::new();
    map.insert("FAREHARVEST_START_OFFSET_DAYS", "tomorrow");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FAREHARVEST_START_OFFSET_DAYS"),
        "expected InvalidEnvVar(FAREHARVEST_START_OFFSET_DAYS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_inverted_window() {
    let mut map = HashMap::new();
    map.insert("FAREHARVEST_START_OFFSET_DAYS", "10");
    map.insert("FAREHARVEST_END_OFFSET_DAYS", "3");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(
            result,
            Err(ConfigError::InvalidDateWindow { start: 10, end: 3 })
        ),
        "expected InvalidDateWindow, got: {result:?}"
    );
}

#[test]
fn build_app_config_strips_trailing_slash_from_base_url() {
    let mut map = HashMap::new();
    map.insert("FAREHARVEST_BASE_URL", "http://127.0.0.1:8080/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.base_url, "http://127.0.0.1:8080");
}

#[test]
fn build_app_config_treats_blank_cookie_as_absent() {
    let mut map = HashMap::new();
    map.insert("FAREHARVEST_COOKIE", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.cookie.is_none());
}

#[test]
fn build_app_config_parses_cookie_issue_date() {
    let mut map = HashMap::new();
    map.insert("FAREHARVEST_COOKIE", "kayak=abc; cluster=5");
    map.insert("FAREHARVEST_COOKIE_ISSUED_ON", "2026-10-01");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.cookie.as_deref(), Some("kayak=abc; cluster=5"));
    assert_eq!(cfg.cookie_issued_on, NaiveDate::from_ymd_opt(2026, 10, 1));
}

#[test]
fn build_app_config_rejects_malformed_cookie_issue_date() {
    let mut map = HashMap::new();
    map.insert("FAREHARVEST_COOKIE_ISSUED_ON", "01/10/2026");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FAREHARVEST_COOKIE_ISSUED_ON"),
        "expected InvalidEnvVar(FAREHARVEST_COOKIE_ISSUED_ON), got: {result:?}"
    );
}

#[test]
fn build_app_config_inter_request_delay_override() {
    let mut map = HashMap::new();
    map.insert("FAREHARVEST_INTER_REQUEST_DELAY_MS", "4000");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.inter_request_delay_ms, 4000);
}

#[test]
fn build_app_config_inter_request_delay_invalid() {
    let mut map = HashMap::new();
    map.insert("FAREHARVEST_INTER_REQUEST_DELAY_MS", "-5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FAREHARVEST_INTER_REQUEST_DELAY_MS"),
        "expected InvalidEnvVar(FAREHARVEST_INTER_REQUEST_DELAY_MS), got: {result:?}"
    );
}

#[test]
fn debug_redacts_cookie() {
    let mut map = HashMap::new();
    map.insert("FAREHARVEST_COOKIE", "kayak=secret-session");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("secret-session"));
    assert!(rendered.contains("[redacted]"));
}
