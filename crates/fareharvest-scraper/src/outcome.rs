use fareharvest_core::{FailureTag, OfferRecord, Provenance};

/// Result of processing one results page. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// One record per offer widget, in page order.
    Success(Vec<OfferRecord>),
    EmptyContent,
    Blocked,
}

impl PageOutcome {
    /// The tag written into the placeholder row, or `None` for a success.
    #[must_use]
    pub fn failure_tag(&self) -> Option<FailureTag> {
        match self {
            PageOutcome::Success(_) => None,
            PageOutcome::EmptyContent => Some(FailureTag::EmptyContent),
            PageOutcome::Blocked => Some(FailureTag::Blocked),
        }
    }

    /// Rows to append for this page: the offers themselves, or a single
    /// placeholder so every attempted date leaves a row behind.
    #[must_use]
    pub fn into_rows(self, provenance: &Provenance) -> Vec<OfferRecord> {
        match self {
            PageOutcome::Success(records) => records,
            PageOutcome::EmptyContent => {
                vec![OfferRecord::placeholder(FailureTag::EmptyContent, provenance)]
            }
            PageOutcome::Blocked => vec![OfferRecord::placeholder(FailureTag::Blocked, provenance)],
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn provenance() -> Provenance {
        Provenance::new(
            NaiveDate::from_ymd_opt(2027, 1, 23).unwrap(),
            "LAX-ATL".parse().unwrap(),
            "https://www.kayak.com/flights/LAX-ATL/2027-01-23",
            NaiveDate::from_ymd_opt(2026, 10, 16)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn failures_become_single_tagged_row() {
        for (outcome, tag) in [
            (PageOutcome::EmptyContent, FailureTag::EmptyContent),
            (PageOutcome::Blocked, FailureTag::Blocked),
        ] {
            assert_eq!(outcome.failure_tag(), Some(tag));
            let rows = outcome.into_rows(&provenance());
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].failure_tag(), Some(tag));
        }
    }

    #[test]
    fn success_passes_records_through() {
        let record = OfferRecord::placeholder(FailureTag::EmptyContent, &provenance());
        let outcome = PageOutcome::Success(vec![record.clone(), record]);
        assert_eq!(outcome.failure_tag(), None);
        assert_eq!(outcome.into_rows(&provenance()).len(), 2);
    }
}
