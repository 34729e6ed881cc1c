//! Offer-widget text cleanup and the currency-aware price/channel split.
//!
//! An offer widget renders as one run of text such as `"$120 Delta View Deal"`
//! or `"95 € Ryanair Vedi offerta"`. The split works on two views of that text:
//! the raw text picks the currency branch (normalization can strip context
//! next to the glyph), while the normalized text is what gets cut into a
//! price and a booking-channel label.

use std::sync::LazyLock;

use fareharvest_core::NO_PRICE;
use regex::Regex;

/// Cabin-class labels the widget prints next to the price.
const CABIN_CLASS_LABELS: [&str; 4] = ["Economy", "Basic", "Main Cabin", "Cabina principale"];

/// Call-to-action button captions, English and Italian locales.
const CALL_TO_ACTION_LABELS: [&str; 3] = ["View Deal", "Vedi offerta", "Book"];

const CURRENCY_GLYPHS: [char; 2] = ['$', '€'];

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Price and booking channel read from one offer widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSplit {
    pub price: String,
    pub website: String,
}

/// Strips boilerplate from raw widget text.
///
/// Order is fixed: cabin-class labels, then call-to-action captions, then
/// newline removal with whitespace runs collapsed and the ends trimmed.
pub(crate) fn normalize_widget_text(raw: &str) -> String {
    let mut text = raw.to_owned();
    for label in CABIN_CLASS_LABELS {
        text = text.replace(label, "");
    }
    for label in CALL_TO_ACTION_LABELS {
        text = text.replace(label, "");
    }
    collapse_whitespace(&text)
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_owned()
}

/// Returns the part of `text` before the first occurrence of `marker`.
fn truncate_at<'a>(text: &'a str, marker: &str) -> &'a str {
    text.find(marker).map_or(text, |idx| &text[..idx])
}

/// Splits raw widget text into a price and a booking-channel label.
///
/// - `$` anywhere in the raw text: the amount follows the first `$` and runs
///   up to the first alphabetic character, which starts the channel.
/// - `€` anywhere in the raw text: the amount sits before the glyph and the
///   channel after it. With nothing before the glyph, the numeric run right
///   after it is the amount.
///
/// A branch that finds no amount reports [`NO_PRICE`] rather than an empty
/// price.
/// - neither: the price is [`NO_PRICE`] and the whole text, minus `"Info"`,
///   is the channel.
///
/// Every branch then truncates the channel at `"View Deal"` and drops
/// `"Info"` and any stray currency glyph.
#[must_use]
pub fn split_price_and_channel(raw: &str) -> PriceSplit {
    let normalized = normalize_widget_text(raw);

    let (price, channel) = if raw.contains('$') {
        split_dollar(&normalized)
    } else if raw.contains('€') {
        split_euro(&normalized)
    } else {
        let channel = normalized.replace("Info", "");
        (NO_PRICE.to_owned(), truncate_at(&channel, "Book").to_owned())
    };

    PriceSplit {
        price,
        website: clean_channel(&channel),
    }
}

fn split_dollar(normalized: &str) -> (String, String) {
    let (before, body) = normalized.split_once('$').unwrap_or(("", normalized));
    let (amount, rest) = match body.find(char::is_alphabetic) {
        Some(boundary) => body.split_at(boundary),
        None => (body, ""),
    };
    // Text ahead of the glyph ("Info", a stray label) stays with the channel.
    let channel = format!("{before} {rest}");
    (
        price_or_sentinel(amount),
        truncate_at(&channel, "Book").to_owned(),
    )
}

fn split_euro(normalized: &str) -> (String, String) {
    match normalized.split_once('€') {
        Some((amount, channel)) if !amount.trim().is_empty() => (
            price_or_sentinel(amount),
            truncate_at(channel, "Book").to_owned(),
        ),
        // Glyph ahead of the amount, as in "€95 Ryanair".
        Some((_, after)) => {
            let (amount, channel) = leading_amount(after);
            (
                price_or_sentinel(amount),
                truncate_at(channel, "Book").to_owned(),
            )
        }
        // The glyph only appeared in text that normalization removed.
        None => (NO_PRICE.to_owned(), truncate_at(normalized, "Book").to_owned()),
    }
}

/// Splits a leading run of digits and separators off `text`.
fn leading_amount(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    let end = text
        .find(|c: char| !(c.is_ascii_digit() || c == ',' || c == '.'))
        .unwrap_or(text.len());
    text.split_at(end)
}

fn price_or_sentinel(amount: &str) -> String {
    let amount = amount.trim();
    if amount.is_empty() {
        NO_PRICE.to_owned()
    } else {
        amount.to_owned()
    }
}

fn clean_channel(channel: &str) -> String {
    let channel = truncate_at(channel, "View Deal")
        .replace("Info", "")
        .replace(CURRENCY_GLYPHS, "");
    collapse_whitespace(&channel)
}

#[cfg(test)]
#[path = "split_test.rs"]
mod tests;
