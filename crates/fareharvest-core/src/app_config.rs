use std::path::PathBuf;

use chrono::NaiveDate;

use crate::route::{DateWindow, Route};

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:128.0) Gecko/20100101 Firefox/128.0";

#[derive(Clone)]
pub struct AppConfig {
    pub route: Route,
    pub window: DateWindow,
    pub store_path: PathBuf,
    pub diagnostic_path: PathBuf,
    pub base_url: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub accept_language: String,
    /// Raw `Cookie` header captured from a browser session. Expires on the
    /// provider's schedule; refreshing it is the operator's job.
    pub cookie: Option<String>,
    pub cookie_issued_on: Option<NaiveDate>,
    pub cookie_max_age_days: u32,
    /// Upper bound of the random pause between page requests; `0` disables it.
    pub inter_request_delay_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("route", &self.route)
            .field("window", &self.window)
            .field("store_path", &self.store_path)
            .field("diagnostic_path", &self.diagnostic_path)
            .field("base_url", &self.base_url)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("accept_language", &self.accept_language)
            .field("cookie", &self.cookie.as_ref().map(|_| "[redacted]"))
            .field("cookie_issued_on", &self.cookie_issued_on)
            .field("cookie_max_age_days", &self.cookie_max_age_days)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .finish()
    }
}
