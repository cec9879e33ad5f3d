use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::foundation::error::VerditeResult;

/// Cooperative cancellation handle for a bulk run.
///
/// Checked at file boundaries only: cancelling mid-file lets the current
/// file finish and stops before the next one starts.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// A fresh, uncancelled flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation at the next file boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Outcome of a bulk run over a file list.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Files processed successfully, in order.
    pub processed: Vec<PathBuf>,
    /// Files skipped after a failure, with the error message.
    pub failed: Vec<(PathBuf, String)>,
    /// True when the run stopped early at a cancellation check.
    pub cancelled: bool,
}

impl BatchReport {
    /// True when every file processed cleanly and the run was not cancelled.
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty() && !self.cancelled
    }
}

/// Process a list of files with skip-and-continue semantics.
///
/// One failing file is logged and recorded, never aborting the rest of the
/// batch. Only pre-flight validation belongs before this call; everything
/// per-file is absorbed here.
pub fn run_batch(
    files: &[PathBuf],
    cancel: &CancelFlag,
    mut process: impl FnMut(&Path) -> VerditeResult<()>,
) -> BatchReport {
    let mut report = BatchReport::default();
    for (index, file) in files.iter().enumerate() {
        if cancel.is_cancelled() {
            tracing::debug!("batch cancelled after {} of {} files", index, files.len());
            report.cancelled = true;
            break;
        }
        tracing::debug!("processing file {} of {}: {}", index + 1, files.len(), file.display());
        match process(file) {
            Ok(()) => report.processed.push(file.clone()),
            Err(e) => {
                tracing::warn!("skipping '{}' after failure: {e}", file.display());
                report.failed.push((file.clone(), e.to_string()));
            }
        }
    }
    report
}
