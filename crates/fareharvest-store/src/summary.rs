//! Read-only rollups over a loaded table.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use fareharvest_core::{FailureTag, OfferRecord};

/// Coverage of one route in the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteSummary {
    /// Distinct flight dates with at least one real offer.
    pub dates_with_offers: BTreeSet<NaiveDate>,
    /// Distinct flight dates that only ever produced placeholder rows.
    pub dates_without_offers: BTreeSet<NaiveDate>,
    pub offer_rows: usize,
}

/// Row counts by outcome and per-route date coverage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetSummary {
    pub total_rows: usize,
    pub offer_rows: usize,
    pub empty_content_rows: usize,
    pub blocked_rows: usize,
    pub extraction_error_rows: usize,
    pub routes: BTreeMap<String, RouteSummary>,
}

impl DatasetSummary {
    #[must_use]
    pub fn from_rows(rows: &[OfferRecord]) -> Self {
        let mut summary = Self {
            total_rows: rows.len(),
            ..Self::default()
        };

        for row in rows {
            let route = summary.routes.entry(row.route.clone()).or_default();
            match row.failure_tag() {
                None => {
                    summary.offer_rows += 1;
                    route.offer_rows += 1;
                    route.dates_with_offers.insert(row.flight_date);
                }
                Some(tag) => {
                    match tag {
                        FailureTag::EmptyContent => summary.empty_content_rows += 1,
                        FailureTag::Blocked => summary.blocked_rows += 1,
                        FailureTag::ExtractionError => summary.extraction_error_rows += 1,
                    }
                    route.dates_without_offers.insert(row.flight_date);
                }
            }
        }

        for route in summary.routes.values_mut() {
            let covered = route.dates_with_offers.clone();
            route.dates_without_offers.retain(|d| !covered.contains(d));
        }

        summary
    }
}
