//! HTTP client for the flight results pages.

use std::time::Duration;

use chrono::NaiveDate;
use fareharvest_core::AppConfig;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};

use crate::error::ScraperError;
use crate::fetch::{PageFetcher, SearchTarget};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Browser session the requests impersonate.
///
/// The cookie is captured by hand from a browser and expires on the
/// provider's schedule. Nothing here refreshes it; [`Self::cookie_is_stale`]
/// only reports when the operator should.
#[derive(Clone)]
pub struct SessionConfig {
    pub user_agent: String,
    pub accept_language: String,
    pub cookie: Option<String>,
    pub cookie_issued_on: Option<NaiveDate>,
    pub cookie_max_age_days: u32,
}

impl SessionConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            accept_language: config.accept_language.clone(),
            cookie: config.cookie.clone(),
            cookie_issued_on: config.cookie_issued_on,
            cookie_max_age_days: config.cookie_max_age_days,
        }
    }

    /// Days since the cookie was captured, if both are known.
    #[must_use]
    pub fn cookie_age_days(&self, today: NaiveDate) -> Option<i64> {
        self.cookie.as_ref()?;
        self.cookie_issued_on
            .map(|issued| (today - issued).num_days())
    }

    /// `true` when a cookie is configured and is older than its maximum age.
    #[must_use]
    pub fn cookie_is_stale(&self, today: NaiveDate) -> bool {
        self.cookie_age_days(today)
            .is_some_and(|age| age > i64::from(self.cookie_max_age_days))
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("user_agent", &self.user_agent)
            .field("accept_language", &self.accept_language)
            .field("cookie", &self.cookie.as_ref().map(|_| "[redacted]"))
            .field("cookie_issued_on", &self.cookie_issued_on)
            .field("cookie_max_age_days", &self.cookie_max_age_days)
            .finish()
    }
}

/// Fetches results pages with a fixed browser-like header set.
///
/// Challenge pages are frequently served with 403 or 429, so those bodies
/// are returned for classification rather than turned into errors.
pub struct KayakClient {
    client: Client,
}

impl KayakClient {
    /// Creates a client carrying the session headers on every request.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidHeader`] if a session value is not a
    /// legal header value, or [`ScraperError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(session: &SessionConfig, timeout_secs: u64) -> Result<Self, ScraperError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header_value("Accept-Language", &session.accept_language)?,
        );
        headers.insert(header::UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
        if let Some(cookie) = &session.cookie {
            let mut value = header_value("Cookie", cookie)?;
            value.set_sensitive(true);
            headers.insert(header::COOKIE, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&session.user_agent)
            .default_headers(headers)
            .build()?;
        Ok(Self { client })
    }
}

fn header_value(header: &'static str, value: &str) -> Result<HeaderValue, ScraperError> {
    HeaderValue::from_str(value).map_err(|e| ScraperError::InvalidHeader {
        header,
        reason: e.to_string(),
    })
}

fn is_classifiable(status: StatusCode) -> bool {
    status.is_success()
        || status == StatusCode::FORBIDDEN
        || status == StatusCode::TOO_MANY_REQUESTS
}

impl PageFetcher for KayakClient {
    async fn fetch_page(&self, target: &SearchTarget) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(&target.url)
            .header(header::REFERER, &target.url)
            .send()
            .await?;
        let status = response.status();

        if !is_classifiable(status) {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: target.url.clone(),
            });
        }
        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                url = %target.url,
                "non-success status; passing body on for classification"
            );
        }

        Ok(response.text().await?)
    }
}
