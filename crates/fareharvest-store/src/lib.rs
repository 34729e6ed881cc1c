//! Durable, append-only CSV table of harvested offers.
//!
//! The table is read whole, extended in memory, and rewritten whole through a
//! temp file and rename. It is never truncated and rows are never updated or
//! deleted in place.

pub mod diagnostics;
pub mod lock;
pub mod summary;
pub mod table;

pub use diagnostics::{DiagnosticFile, DiagnosticSink};
pub use lock::{is_lock_error, persist_with_retry, OperatorPrompt};
pub use summary::{DatasetSummary, RouteSummary};
pub use table::TableStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// The file exists but its header is not the fixed column set, so
    /// appending to it would produce a misaligned table.
    #[error("{path} has columns [{found}], expected [{expected}]")]
    SchemaMismatch {
        path: String,
        found: String,
        expected: String,
    },

    /// The store file stayed locked and no operator answer could be read.
    #[error("cannot confirm that {path} was released: {source}")]
    PromptClosed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
