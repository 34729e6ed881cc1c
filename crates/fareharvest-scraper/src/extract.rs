//! Offer extraction from one rendered results page.
//!
//! Price and booking channel come from the offer widgets themselves. Carrier
//! and times are read from separate regions of the page and joined to the
//! widgets by position, so each of those sequences goes through an accessor
//! that checks the count the markup is expected to produce and fails with
//! [`ScraperError::LengthMismatch`] instead of zipping misaligned rows.

use fareharvest_core::{OfferRecord, Provenance};
use scraper::{ElementRef, Html, Selector};

use crate::classify::{classify, PageStatus};
use crate::error::ScraperError;
use crate::outcome::PageOutcome;
use crate::split::split_price_and_channel;

const OFFER_WIDGET: &str = "div.multibook-dropdown";
const DEPARTURE_TIME: &str = "span.depart-time.base-time";
const ARRIVAL_TIME: &str = "span.arrival-time.base-time";
const CARRIER_NAME: &str = "div.bottom";

/// Every carrier name is rendered into two adjacent `div.bottom` elements;
/// only the first of each pair is kept.
const CARRIER_ELEMENTS_PER_OFFER: usize = 2;

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static CSS selector is valid")
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Visible text of every offer widget, in document order.
fn offer_widget_texts(document: &Html) -> Vec<String> {
    document
        .select(&selector(OFFER_WIDGET))
        .map(element_text)
        .collect()
}

fn trimmed_texts(document: &Html, css: &'static str) -> Vec<String> {
    document
        .select(&selector(css))
        .map(|el| element_text(el).trim().to_owned())
        .collect()
}

fn expect_count(
    field: &'static str,
    expected: usize,
    values: Vec<String>,
) -> Result<Vec<String>, ScraperError> {
    if values.len() == expected {
        Ok(values)
    } else {
        Err(ScraperError::LengthMismatch {
            field,
            expected,
            found: values.len(),
        })
    }
}

/// Departure times: exactly one per offer widget.
fn departure_times(document: &Html, offers: usize) -> Result<Vec<String>, ScraperError> {
    expect_count("departure", offers, trimmed_texts(document, DEPARTURE_TIME))
}

/// Arrival times: exactly one per offer widget.
fn arrival_times(document: &Html, offers: usize) -> Result<Vec<String>, ScraperError> {
    expect_count("arrival", offers, trimmed_texts(document, ARRIVAL_TIME))
}

/// Carrier names: after dropping empty elements, exactly two per offer
/// widget, of which the even-indexed ones (0, 2, 4, ...) are returned.
fn carrier_names(document: &Html, offers: usize) -> Result<Vec<String>, ScraperError> {
    let raw: Vec<String> = trimmed_texts(document, CARRIER_NAME)
        .into_iter()
        .filter(|name| !name.is_empty())
        .collect();
    let raw = expect_count("carrier", offers * CARRIER_ELEMENTS_PER_OFFER, raw)?;
    Ok(raw
        .into_iter()
        .step_by(CARRIER_ELEMENTS_PER_OFFER)
        .collect())
}

/// Classifies and extracts one results page.
///
/// Returns [`PageOutcome::Blocked`] or [`PageOutcome::EmptyContent`] when the
/// page holds no offer widgets. Otherwise returns one record per widget with
/// the shared `provenance`; the first record is marked as the best offer.
///
/// # Errors
///
/// Returns [`ScraperError::LengthMismatch`] if the departure, arrival, or
/// carrier sequences do not line up with the widget count. No partial
/// output is produced in that case.
pub fn extract_page(markup: &str, provenance: &Provenance) -> Result<PageOutcome, ScraperError> {
    let document = Html::parse_document(markup);
    let widgets = offer_widget_texts(&document);

    let offers = match classify(markup, widgets.len()) {
        PageStatus::Blocked => return Ok(PageOutcome::Blocked),
        PageStatus::EmptyContent => return Ok(PageOutcome::EmptyContent),
        PageStatus::Offers(count) => count,
    };

    let departures = departure_times(&document, offers)?;
    let arrivals = arrival_times(&document, offers)?;
    let carriers = carrier_names(&document, offers)?;

    let route = provenance.route.to_string();
    let retrieved_on = provenance.retrieved.date();
    let retrieved_at = provenance.retrieved.time();

    let records = widgets
        .iter()
        .zip(departures)
        .zip(arrivals)
        .zip(carriers)
        .enumerate()
        .map(|(idx, (((widget, departure_time), arrival_time), carrier))| {
            let split = split_price_and_channel(widget);
            OfferRecord {
                price: split.price,
                carrier,
                departure_time,
                arrival_time,
                website: split.website,
                // The page is requested sorted by "best", so the first widget
                // is taken as the best offer without further checks.
                is_best_offer: idx == 0,
                flight_date: provenance.flight_date,
                route: route.clone(),
                source_url: provenance.source_url.clone(),
                retrieved_on,
                retrieved_at,
            }
        })
        .collect();

    Ok(PageOutcome::Success(records))
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
