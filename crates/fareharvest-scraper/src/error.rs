use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid search URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid session header {header}: {reason}")]
    InvalidHeader { header: &'static str, reason: String },

    /// A page-level sequence did not have the cardinality its markup contract
    /// promises relative to the number of offer widgets.
    #[error("{field} count mismatch: expected {expected}, found {found}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },
}
