//! Side file holding the last page that could not be turned into offers.

use std::fs;
use std::path::{Path, PathBuf};

use crate::StoreError;

/// Keeps raw markup of an unparseable page for a human to inspect.
pub trait DiagnosticSink {
    /// Records `markup` fetched from `url`. Only the latest page is kept.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the markup cannot be written.
    fn record_unparsed(&mut self, url: &str, markup: &str) -> Result<(), StoreError>;
}

/// Overwrites a single HTML file with the latest unparseable page.
#[derive(Debug, Clone)]
pub struct DiagnosticFile {
    path: PathBuf,
}

impl DiagnosticFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DiagnosticSink for DiagnosticFile {
    fn record_unparsed(&mut self, url: &str, markup: &str) -> Result<(), StoreError> {
        fs::write(&self.path, markup).map_err(|source| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        tracing::info!(path = %self.path.display(), url, "saved unparseable page for inspection");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_markup_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DiagnosticFile::new(dir.path().join("no_offers.html"));
        sink.record_unparsed("https://example.test/a", "<html>spinner</html>")
            .unwrap();
        assert_eq!(
            fs::read_to_string(sink.path()).unwrap(),
            "<html>spinner</html>"
        );
    }

    #[test]
    fn keeps_only_latest_page() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DiagnosticFile::new(dir.path().join("no_offers.html"));
        sink.record_unparsed("https://example.test/a", "<html>first, and much longer</html>")
            .unwrap();
        sink.record_unparsed("https://example.test/b", "<html>second</html>")
            .unwrap();
        assert_eq!(
            fs::read_to_string(sink.path()).unwrap(),
            "<html>second</html>"
        );
    }

    #[test]
    fn unwritable_location_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DiagnosticFile::new(dir.path().join("missing").join("no_offers.html"));
        let err = sink.record_unparsed("u", "<html></html>").unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
