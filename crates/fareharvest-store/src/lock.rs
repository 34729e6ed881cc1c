//! Write retry for a store file held open by another process.
//!
//! Spreadsheet viewers keep the CSV open with an exclusive lock. A write that
//! fails that way blocks on the operator until they confirm the file is
//! closed, then the same write is attempted again. There is no retry limit:
//! the loop never moves past a date with its rows unpersisted.

use std::io::{self, ErrorKind};
use std::path::Path;

use crate::StoreError;

const WINDOWS_SHARING_VIOLATION: i32 = 32;
const WINDOWS_LOCK_VIOLATION: i32 = 33;

/// Synchronous channel to the person running the harvest.
pub trait OperatorPrompt {
    /// Asks the operator to release `path` and waits for an answer.
    ///
    /// Returns `Ok(true)` once they affirm, `Ok(false)` for any other answer.
    ///
    /// # Errors
    ///
    /// Returns an error when no answer can be read (e.g. input is closed).
    fn confirm_released(&mut self, path: &Path) -> io::Result<bool>;
}

/// `true` if `err` means another process holds the destination open.
#[must_use]
pub fn is_lock_error(err: &io::Error) -> bool {
    if matches!(
        err.kind(),
        ErrorKind::PermissionDenied | ErrorKind::ResourceBusy
    ) {
        return true;
    }
    cfg!(windows)
        && matches!(
            err.raw_os_error(),
            Some(WINDOWS_SHARING_VIOLATION | WINDOWS_LOCK_VIOLATION)
        )
}

/// Runs `write` until it succeeds, asking the operator to release the file
/// after every lock failure.
///
/// # Errors
///
/// - [`StoreError::Io`] for any failure that is not a lock.
/// - [`StoreError::PromptClosed`] if the operator cannot be asked.
pub fn persist_with_retry<P, W>(path: &Path, prompt: &mut P, mut write: W) -> Result<(), StoreError>
where
    P: OperatorPrompt + ?Sized,
    W: FnMut() -> io::Result<()>,
{
    let mut lock_failures = 0u32;

    loop {
        let err = match write() {
            Ok(()) => {
                if lock_failures > 0 {
                    tracing::info!(path = %path.display(), lock_failures, "store written after lock was released");
                }
                return Ok(());
            }
            Err(err) => err,
        };

        if !is_lock_error(&err) {
            return Err(StoreError::Io {
                path: path.display().to_string(),
                source: err,
            });
        }

        lock_failures += 1;
        tracing::warn!(
            path = %path.display(),
            lock_failures,
            error = %err,
            "store file is locked by another process; waiting for operator"
        );

        loop {
            match prompt.confirm_released(path) {
                Ok(true) => break,
                Ok(false) => {}
                Err(source) => {
                    return Err(StoreError::PromptClosed {
                        path: path.display().to_string(),
                        source,
                    })
                }
            }
        }
    }
}
