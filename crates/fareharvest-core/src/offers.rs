use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::route::Route;

/// Price sentinel for offer widgets that carry no recognizable currency.
pub const NO_PRICE: &str = "No price";

/// Why a page produced a placeholder row instead of offers.
///
/// The tag is written verbatim into every content column of the placeholder
/// row, so the rendered strings are part of the table format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureTag {
    /// The page rendered without any offer widgets.
    EmptyContent,
    /// The page was an anti-automation challenge.
    Blocked,
    /// Offer widgets were present but the page-level sequences did not line up.
    ExtractionError,
}

impl FailureTag {
    pub const ALL: [FailureTag; 3] = [
        FailureTag::EmptyContent,
        FailureTag::Blocked,
        FailureTag::ExtractionError,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FailureTag::EmptyContent => "EmptyContent",
            FailureTag::Blocked => "Blocked",
            FailureTag::ExtractionError => "ExtractionError",
        }
    }

    /// Parse a tag from its rendered column value.
    #[must_use]
    pub fn from_tag(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.as_str() == value)
    }
}

impl fmt::Display for FailureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a page came from and when it was read.
///
/// Every row produced from one page, success or failure, carries the same
/// provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub flight_date: NaiveDate,
    pub route: Route,
    pub source_url: String,
    /// Local wall-clock time of retrieval, truncated to whole seconds.
    pub retrieved: NaiveDateTime,
}

impl Provenance {
    #[must_use]
    pub fn new(
        flight_date: NaiveDate,
        route: Route,
        source_url: impl Into<String>,
        retrieved: NaiveDateTime,
    ) -> Self {
        Self {
            flight_date,
            route,
            source_url: source_url.into(),
            retrieved: retrieved.with_nanosecond(0).unwrap_or(retrieved),
        }
    }
}

/// One row of the harvested dataset.
///
/// Field order matches the column order of the CSV table; the serde names are
/// the column headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferRecord {
    pub price: String,
    pub carrier: String,
    #[serde(rename = "departure")]
    pub departure_time: String,
    #[serde(rename = "arrival")]
    pub arrival_time: String,
    pub website: String,
    pub is_best_offer: bool,
    pub flight_date: NaiveDate,
    pub route: String,
    #[serde(rename = "url")]
    pub source_url: String,
    pub retrieved_on: NaiveDate,
    pub retrieved_at: NaiveTime,
}

impl OfferRecord {
    /// Column headers, in table order.
    pub const COLUMNS: [&'static str; 11] = [
        "price",
        "carrier",
        "departure",
        "arrival",
        "website",
        "is_best_offer",
        "flight_date",
        "route",
        "url",
        "retrieved_on",
        "retrieved_at",
    ];

    /// Builds the single stand-in row recorded for a failed page.
    ///
    /// Every content column carries the tag; `is_best_offer` is always `false`.
    #[must_use]
    pub fn placeholder(tag: FailureTag, provenance: &Provenance) -> Self {
        let tag = tag.as_str();
        Self {
            price: tag.to_string(),
            carrier: tag.to_string(),
            departure_time: tag.to_string(),
            arrival_time: tag.to_string(),
            website: tag.to_string(),
            is_best_offer: false,
            flight_date: provenance.flight_date,
            route: provenance.route.to_string(),
            source_url: provenance.source_url.clone(),
            retrieved_on: provenance.retrieved.date(),
            retrieved_at: provenance.retrieved.time(),
        }
    }

    /// The failure tag if this is a placeholder row.
    #[must_use]
    pub fn failure_tag(&self) -> Option<FailureTag> {
        FailureTag::from_tag(&self.price).filter(|tag| self.carrier == tag.as_str())
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.failure_tag().is_some()
    }
}
