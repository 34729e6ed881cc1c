//! Page-level status decision, made before any per-widget extraction.

/// Literal text carried by the provider's anti-automation verification page.
pub const CHALLENGE_MARKER: &str = "real KAYAK user";

/// What a rendered results page represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    /// The page holds this many offer widgets (always at least one).
    Offers(usize),
    /// No offer widgets and no challenge marker; the page likely had not
    /// finished rendering. Worth one more fetch.
    EmptyContent,
    /// No offer widgets and the challenge marker is present. Terminal for the run.
    Blocked,
}

/// Classifies a page from its raw markup and the number of offer widgets found.
///
/// The challenge marker is only consulted when there are no widgets: a page
/// that rendered offers is a success even if the phrase appears elsewhere.
#[must_use]
pub fn classify(markup: &str, widget_count: usize) -> PageStatus {
    if widget_count > 0 {
        PageStatus::Offers(widget_count)
    } else if markup.contains(CHALLENGE_MARKER) {
        PageStatus::Blocked
    } else {
        PageStatus::EmptyContent
    }
}
