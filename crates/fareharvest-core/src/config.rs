use crate::app_config::{AppConfig, DEFAULT_USER_AGENT};
use crate::ConfigError;

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
/// Every variable has a default, so an empty environment yields a usable
/// config for the `LAX-ATL` route.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    use chrono::NaiveDate;

    use crate::route::{DateWindow, Route};

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_i64 = |var: &str, default: &str| -> Result<i64, ConfigError> {
        or_default(var, default)
            .parse::<i64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let route_raw = or_default("FAREHARVEST_ROUTE", "LAX-ATL");
    let route: Route = route_raw
        .parse()
        .map_err(|e: ConfigError| invalid("FAREHARVEST_ROUTE", e.to_string()))?;

    let start = parse_i64("FAREHARVEST_START_OFFSET_DAYS", "99")?;
    let end = parse_i64("FAREHARVEST_END_OFFSET_DAYS", "160")?;
    let window = DateWindow::new(start, end)?;

    let store_path = PathBuf::from(or_default("FAREHARVEST_STORE_PATH", "db.csv"));
    let diagnostic_path = PathBuf::from(or_default(
        "FAREHARVEST_DIAGNOSTIC_PATH",
        "no_offers.html",
    ));
    let base_url = or_default("FAREHARVEST_BASE_URL", "https://www.kayak.com")
        .trim_end_matches('/')
        .to_string();
    let log_level = or_default("FAREHARVEST_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("FAREHARVEST_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("FAREHARVEST_USER_AGENT", DEFAULT_USER_AGENT);
    let accept_language = or_default("FAREHARVEST_ACCEPT_LANGUAGE", "en-US,en;q=0.5");

    let cookie = lookup("FAREHARVEST_COOKIE")
        .ok()
        .filter(|c| !c.trim().is_empty());
    let cookie_issued_on = match lookup("FAREHARVEST_COOKIE_ISSUED_ON") {
        Ok(raw) => Some(
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|e| invalid("FAREHARVEST_COOKIE_ISSUED_ON", e.to_string()))?,
        ),
        Err(_) => None,
    };
    let cookie_max_age_days = parse_u32("FAREHARVEST_COOKIE_MAX_AGE_DAYS", "14")?;
    let inter_request_delay_ms = parse_u64("FAREHARVEST_INTER_REQUEST_DELAY_MS", "0")?;

    Ok(AppConfig {
        route,
        window,
        store_path,
        diagnostic_path,
        base_url,
        log_level,
        request_timeout_secs,
        user_agent,
        accept_language,
        cookie,
        cookie_issued_on,
        cookie_max_age_days,
        inter_request_delay_ms,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
