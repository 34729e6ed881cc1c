use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A one-way origin-destination pair such as `LAX-ATL`.
///
/// Both ends are three-letter airport or metro codes. Input is accepted in
/// any case and stored uppercase, which is the form the search URL and the
/// `route` column use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Route {
    origin: String,
    destination: String,
}

impl Route {
    /// Build a route from its two endpoint codes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRoute`] if either code is not exactly
    /// three ASCII letters, or if origin and destination are the same.
    pub fn new(origin: &str, destination: &str) -> Result<Self, ConfigError> {
        let raw = format!("{origin}-{destination}");
        let origin = normalize_code(origin, &raw)?;
        let destination = normalize_code(destination, &raw)?;
        if origin == destination {
            return Err(ConfigError::InvalidRoute {
                route: raw,
                reason: "origin and destination must differ".to_string(),
            });
        }
        Ok(Self {
            origin,
            destination,
        })
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }
}

fn normalize_code(code: &str, raw: &str) -> Result<String, ConfigError> {
    let code = code.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ConfigError::InvalidRoute {
            route: raw.to_string(),
            reason: format!("\"{code}\" is not a three-letter code"),
        });
    }
    Ok(code.to_ascii_uppercase())
}

impl FromStr for Route {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (origin, destination) = s.split_once('-').ok_or_else(|| ConfigError::InvalidRoute {
            route: s.to_string(),
            reason: "expected ORIGIN-DESTINATION".to_string(),
        })?;
        Self::new(origin, destination)
    }
}

impl TryFrom<String> for Route {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Route> for String {
    fn from(route: Route) -> Self {
        route.to_string()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.origin, self.destination)
    }
}

/// Half-open range of departure-day offsets relative to "today": `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: i64,
    end: i64,
}

impl DateWindow {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDateWindow`] unless `start < end`.
    pub fn new(start: i64, end: i64) -> Result<Self, ConfigError> {
        if end <= start {
            return Err(ConfigError::InvalidDateWindow { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn start(&self) -> i64 {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Number of departure dates in the window.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from(self.end - self.start).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The concrete departure dates, in order, for a run starting on `today`.
    ///
    /// Offsets that would overflow the calendar are dropped.
    #[must_use]
    pub fn dates(&self, today: NaiveDate) -> Vec<NaiveDate> {
        (self.start..self.end)
            .filter_map(|offset| today.checked_add_signed(TimeDelta::days(offset)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_uppercase_route() {
        let route: Route = "LAX-ATL".parse().unwrap();
        assert_eq!(route.origin(), "LAX");
        assert_eq!(route.destination(), "ATL");
        assert_eq!(route.to_string(), "LAX-ATL");
    }

    #[test]
    fn normalizes_lowercase_route() {
        let route: Route = "jfk-mxp".parse().unwrap();
        assert_eq!(route.to_string(), "JFK-MXP");
    }

    #[test]
    fn rejects_route_without_separator() {
        let err = "LAXATL".parse::<Route>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRoute { .. }));
    }

    #[test]
    fn rejects_route_with_long_code() {
        let err = "LAXX-ATL".parse::<Route>().unwrap_err();
        assert!(err.to_string().contains("three-letter"));
    }

    #[test]
    fn rejects_route_to_itself() {
        let err = "ATL-atl".parse::<Route>().unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn window_rejects_empty_range() {
        assert!(matches!(
            DateWindow::new(5, 5),
            Err(ConfigError::InvalidDateWindow { start: 5, end: 5 })
        ));
        assert!(DateWindow::new(7, 3).is_err());
    }

    #[test]
    fn window_dates_are_end_exclusive() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let window = DateWindow::new(0, 3).unwrap();
        let dates = window.dates(today);
        assert_eq!(window.len(), 3);
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
                NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
                NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            ]
        );
    }

    #[test]
    fn window_crosses_month_boundary() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 30).unwrap();
        let dates = DateWindow::new(1, 3).unwrap().dates(today);
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2026, 10, 31).unwrap());
        assert_eq!(dates[1], NaiveDate::from_ymd_opt(2026, 11, 1).unwrap());
    }
}
