//! The per-date harvest loop.
//!
//! Dates are visited strictly in order, one fetch in flight. Every date's rows
//! are persisted before the loop advances, so an interrupted run loses at most
//! the page being processed.

use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use fareharvest_core::{DateWindow, FailureTag, OfferRecord, Provenance, Route};
use fareharvest_scraper::{extract_page, Pacing, PageFetcher, PageOutcome, ScraperError, SearchTarget};
use fareharvest_store::{DiagnosticSink, OperatorPrompt, TableStore};

/// What to harvest.
#[derive(Debug, Clone)]
pub(crate) struct HarvestPlan {
    pub route: Route,
    pub window: DateWindow,
    pub base_url: String,
    /// Skip dates that already hold real offers retrieved today.
    pub skip_recorded: bool,
}

impl HarvestPlan {
    /// Search targets for every date in the window, in visiting order.
    pub(crate) fn targets(&self, today: NaiveDate) -> anyhow::Result<Vec<SearchTarget>> {
        self.window
            .dates(today)
            .into_iter()
            .map(|date| {
                SearchTarget::new(&self.base_url, &self.route, date)
                    .with_context(|| format!("building search URL for {date}"))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HarvestState {
    /// Processing the date at this index of the window.
    Running(usize),
    Completed,
    /// Stopped by a challenge page on `flight_date`.
    Aborted { flight_date: NaiveDate },
}

impl HarvestState {
    fn after(index: usize, total: usize) -> Self {
        if index + 1 < total {
            HarvestState::Running(index + 1)
        } else {
            HarvestState::Completed
        }
    }
}

/// Totals for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HarvestReport {
    pub state: HarvestState,
    pub pages_fetched: usize,
    pub dates_recorded: usize,
    pub dates_skipped: usize,
    pub offer_rows: usize,
    pub placeholder_rows: usize,
}

impl HarvestReport {
    fn new() -> Self {
        Self {
            state: HarvestState::Running(0),
            pages_fetched: 0,
            dates_recorded: 0,
            dates_skipped: 0,
            offer_rows: 0,
            placeholder_rows: 0,
        }
    }
}

/// Rows from one fetched page plus the reason it fell short, if it did.
struct PageRows {
    rows: Vec<OfferRecord>,
    failure: Option<FailureTag>,
}

/// Runs a [`HarvestPlan`] against a fetcher and the on-disk store.
pub(crate) struct Harvester<F, P, D, C> {
    fetcher: F,
    store: TableStore,
    prompt: P,
    diagnostics: D,
    clock: C,
    pacing: Pacing,
}

impl<F, P, D, C> Harvester<F, P, D, C>
where
    F: PageFetcher,
    P: OperatorPrompt,
    D: DiagnosticSink,
    C: FnMut() -> NaiveDateTime,
{
    pub(crate) fn new(
        fetcher: F,
        store: TableStore,
        prompt: P,
        diagnostics: D,
        clock: C,
        pacing: Pacing,
    ) -> Self {
        Self {
            fetcher,
            store,
            prompt,
            diagnostics,
            clock,
            pacing,
        }
    }

    /// Visits every date in the plan until the window is exhausted or a
    /// challenge page stops the run.
    ///
    /// # Errors
    ///
    /// Returns an error if a page cannot be fetched or the store cannot be
    /// read or written. Rows of dates finished before the failure are
    /// already on disk.
    pub(crate) async fn run(&mut self, plan: &HarvestPlan) -> anyhow::Result<HarvestReport> {
        let today = (self.clock)().date();
        let targets = plan.targets(today)?;
        let mut report = HarvestReport::new();

        tracing::info!(
            route = %plan.route,
            dates = targets.len(),
            first = ?targets.first().map(|t| t.flight_date),
            last = ?targets.last().map(|t| t.flight_date),
            "harvest started"
        );

        let mut state = if targets.is_empty() {
            HarvestState::Completed
        } else {
            HarvestState::Running(0)
        };

        while let HarvestState::Running(index) = state {
            let target = &targets[index];
            let blocked = self.harvest_date(plan, target, today, &mut report).await?;
            state = if blocked {
                HarvestState::Aborted {
                    flight_date: target.flight_date,
                }
            } else {
                HarvestState::after(index, targets.len())
            };
        }

        report.state = state;
        tracing::info!(
            ?state,
            pages_fetched = report.pages_fetched,
            offer_rows = report.offer_rows,
            placeholder_rows = report.placeholder_rows,
            "harvest finished"
        );
        Ok(report)
    }

    /// Fetches, extracts, and persists one date. Returns `true` if the page
    /// was a challenge and the run must stop.
    async fn harvest_date(
        &mut self,
        plan: &HarvestPlan,
        target: &SearchTarget,
        today: NaiveDate,
        report: &mut HarvestReport,
    ) -> anyhow::Result<bool> {
        let table = self.store.load().context("loading store before fetch")?;

        if plan.skip_recorded && has_offers_from(&table, &plan.route, target.flight_date, today) {
            tracing::info!(flight_date = %target.flight_date, "already recorded today; skipping");
            report.dates_skipped += 1;
            return Ok(false);
        }

        let first = self.fetch_rows(target, report).await?;
        let page = if first.failure == Some(FailureTag::EmptyContent) {
            tracing::warn!(flight_date = %target.flight_date, "no offers rendered; retrying once");
            match self.fetch_rows(target, report).await {
                Ok(retry) => retry,
                Err(err) => {
                    self.persist(table, first, target.flight_date, report)?;
                    return Err(err);
                }
            }
        } else {
            first
        };

        let blocked = page.failure == Some(FailureTag::Blocked);
        self.persist(table, page, target.flight_date, report)?;

        if blocked {
            println!(
                "Blocked by a challenge page on {} ({}); stopping.",
                target.flight_date, target.url
            );
        }
        Ok(blocked)
    }

    async fn fetch_rows(
        &mut self,
        target: &SearchTarget,
        report: &mut HarvestReport,
    ) -> anyhow::Result<PageRows> {
        if report.pages_fetched > 0 {
            self.pacing.pause().await;
        }
        let markup = self
            .fetcher
            .fetch_page(target)
            .await
            .with_context(|| format!("fetching {} for {}", target.url, target.flight_date))?;
        report.pages_fetched += 1;

        let provenance = Provenance::new(
            target.flight_date,
            target.route.clone(),
            target.url.clone(),
            (self.clock)(),
        );

        match extract_page(&markup, &provenance) {
            Ok(outcome) => {
                let failure = outcome.failure_tag();
                if matches!(outcome, PageOutcome::EmptyContent) {
                    self.record_diagnostic(target, &markup);
                }
                Ok(PageRows {
                    rows: outcome.into_rows(&provenance),
                    failure,
                })
            }
            Err(err @ ScraperError::LengthMismatch { .. }) => {
                tracing::warn!(
                    flight_date = %target.flight_date,
                    error = %err,
                    "offer listing did not line up; recording placeholder"
                );
                self.record_diagnostic(target, &markup);
                Ok(PageRows {
                    rows: vec![OfferRecord::placeholder(
                        FailureTag::ExtractionError,
                        &provenance,
                    )],
                    failure: Some(FailureTag::ExtractionError),
                })
            }
            Err(err) => Err(err).context("extracting offers"),
        }
    }

    /// Saves `markup` to the diagnostic sink. A failed write is logged and
    /// never costs the date its row.
    fn record_diagnostic(&mut self, target: &SearchTarget, markup: &str) {
        if let Err(err) = self.diagnostics.record_unparsed(&target.url, markup) {
            tracing::warn!(
                flight_date = %target.flight_date,
                error = %err,
                "could not save unparseable page for inspection"
            );
        }
    }

    fn persist(
        &mut self,
        table: Vec<OfferRecord>,
        page: PageRows,
        flight_date: NaiveDate,
        report: &mut HarvestReport,
    ) -> anyhow::Result<()> {
        let appended = page.rows.len();
        self.store
            .append_and_persist(table, page.rows, &mut self.prompt)
            .with_context(|| format!("persisting rows for {flight_date}"))?;

        report.dates_recorded += 1;
        match page.failure {
            None => report.offer_rows += appended,
            Some(_) => report.placeholder_rows += appended,
        }
        tracing::info!(
            %flight_date,
            rows = appended,
            outcome = page.failure.map_or("offers", FailureTag::as_str),
            "date recorded"
        );
        Ok(())
    }
}

/// `true` if `table` holds at least one real offer for `route` on
/// `flight_date` retrieved on `today`.
fn has_offers_from(
    table: &[OfferRecord],
    route: &Route,
    flight_date: NaiveDate,
    today: NaiveDate,
) -> bool {
    let route = route.to_string();
    table.iter().any(|row| {
        row.route == route
            && row.flight_date == flight_date
            && row.retrieved_on == today
            && !row.is_placeholder()
    })
}

#[cfg(test)]
#[path = "harvest_test.rs"]
mod tests;
