use std::fs::{self, File};
use std::io::{self, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use fareharvest_core::OfferRecord;

use crate::lock::{persist_with_retry, OperatorPrompt};
use crate::StoreError;

/// The CSV file holding every harvested row.
#[derive(Debug, Clone)]
pub struct TableStore {
    path: PathBuf,
}

impl TableStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole table.
    ///
    /// A missing file is created on the spot with only the header row, so
    /// later loads and appends see a correctly shaped table. A zero-byte file
    /// (emptied by some other tool) reads as an empty table.
    ///
    /// # Errors
    ///
    /// - [`StoreError::SchemaMismatch`] if the header is not the fixed column set.
    /// - [`StoreError::Csv`] if a row does not parse.
    /// - [`StoreError::Io`] if the file cannot be read or created.
    pub fn load(&self) -> Result<Vec<OfferRecord>, StoreError> {
        match File::open(&self.path) {
            Ok(file) => read_table(file, &self.path),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "store file absent; creating empty table");
                let bytes = encode_table(&[], &self.path)?;
                write_atomically(&self.path, &bytes).map_err(|source| self.io_error(source))?;
                Ok(Vec::new())
            }
            Err(err) => Err(self.io_error(err)),
        }
    }

    /// Appends `new_rows` after `existing` and rewrites the whole table.
    ///
    /// The table is encoded once; if the destination is locked the identical
    /// bytes are written again after the operator releases it. Returns the
    /// combined table as persisted.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Csv`] if a row cannot be encoded.
    /// - [`StoreError::Io`] for write failures other than a lock.
    /// - [`StoreError::PromptClosed`] if the file stays locked and the
    ///   operator cannot be asked.
    pub fn append_and_persist<P>(
        &self,
        mut existing: Vec<OfferRecord>,
        new_rows: Vec<OfferRecord>,
        prompt: &mut P,
    ) -> Result<Vec<OfferRecord>, StoreError>
    where
        P: OperatorPrompt + ?Sized,
    {
        let appended = new_rows.len();
        existing.extend(new_rows);
        let bytes = encode_table(&existing, &self.path)?;

        persist_with_retry(&self.path, prompt, || write_atomically(&self.path, &bytes))?;

        tracing::debug!(
            path = %self.path.display(),
            appended,
            total_rows = existing.len(),
            "store persisted"
        );
        Ok(existing)
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

fn csv_error(path: &Path, source: csv::Error) -> StoreError {
    StoreError::Csv {
        path: path.display().to_string(),
        source,
    }
}

fn read_table<R: Read>(reader: R, path: &Path) -> Result<Vec<OfferRecord>, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();
    if headers.is_empty() {
        tracing::warn!(path = %path.display(), "store file is empty; treating as an empty table");
        return Ok(Vec::new());
    }
    if !headers.iter().eq(OfferRecord::COLUMNS) {
        return Err(StoreError::SchemaMismatch {
            path: path.display().to_string(),
            found: headers.iter().collect::<Vec<_>>().join(", "),
            expected: OfferRecord::COLUMNS.join(", "),
        });
    }

    reader
        .deserialize::<OfferRecord>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| csv_error(path, e))
}

/// Encodes the header row followed by `rows`.
///
/// The header is written explicitly so a table with no rows still carries
/// the full column set.
fn encode_table(rows: &[OfferRecord], path: &Path) -> Result<Vec<u8>, StoreError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(OfferRecord::COLUMNS)
        .map_err(|e| csv_error(path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| csv_error(path, e))?;
    }
    writer.into_inner().map_err(|e| StoreError::Io {
        path: path.display().to_string(),
        source: e.into_error(),
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `bytes` to a sibling temp file, then renames it over `path`.
///
/// A crash mid-write leaves the previous table intact.
fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = temp_path(path);
    let result = File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&tmp, path));

    if result.is_err() {
        if let Err(err) = fs::remove_file(&tmp) {
            tracing::debug!(path = %tmp.display(), error = %err, "could not remove temp file");
        }
    }
    result
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
