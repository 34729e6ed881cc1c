//! The page-fetch seam between the harvest loop and the network.

use std::future::Future;

use chrono::NaiveDate;
use fareharvest_core::Route;

use crate::error::ScraperError;

/// Query string selecting direct flights sorted by the provider's "best" ranking.
const SEARCH_QUERY: &str = "sort=bestflight_a&fs=stops=0";

/// One results page to request: a route on a departure date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTarget {
    pub route: Route,
    pub flight_date: NaiveDate,
    pub url: String,
}

impl SearchTarget {
    /// Builds the results-page URL for `route` on `flight_date` under `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if `base_url` does not form a valid URL.
    pub fn new(base_url: &str, route: &Route, flight_date: NaiveDate) -> Result<Self, ScraperError> {
        let url = format!(
            "{}/flights/{route}/{}?{SEARCH_QUERY}",
            base_url.trim_end_matches('/'),
            flight_date.format("%Y-%m-%d"),
        );
        reqwest::Url::parse(&url).map_err(|e| ScraperError::InvalidUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            route: route.clone(),
            flight_date,
            url,
        })
    }
}

/// Returns the rendered markup for a results page.
///
/// Implementations own transport concerns (headers, cookies, waiting for
/// dynamic content). Callers only assume the returned markup reflects a
/// fully loaded page.
pub trait PageFetcher {
    fn fetch_page(
        &self,
        target: &SearchTarget,
    ) -> impl Future<Output = Result<String, ScraperError>> + Send;
}
