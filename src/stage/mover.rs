//! Batch mover.
//! Moves each source entry into one destination directory, keeping its base name.
//! Every item is attempted; a missing or failing item is recorded and skipped.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::errors::StageError;
use crate::sink::LogSink;

use super::copy::copy_then_remove;
use super::helpers::{io_error_message, is_cross_device};

/// Result of attempting one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { dest: PathBuf },
    /// The item was gone by the time it was its turn.
    Missing,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub source: PathBuf,
    pub outcome: MoveOutcome,
}

/// Per-item records in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub records: Vec<MoveRecord>,
}

impl BatchReport {
    pub fn moved(&self) -> usize {
        self.count(|o| matches!(o, MoveOutcome::Moved { .. }))
    }

    pub fn missing(&self) -> usize {
        self.count(|o| matches!(o, MoveOutcome::Missing))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, MoveOutcome::Failed { .. }))
    }

    pub fn is_clean(&self) -> bool {
        self.records.iter().all(|r| matches!(r.outcome, MoveOutcome::Moved { .. }))
    }

    fn count(&self, pred: impl Fn(&MoveOutcome) -> bool) -> usize {
        self.records.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Move every path in `sources` into `destination`.
///
/// The destination (and its parents) is created first; that is the only failure
/// returned as an error. Name collisions are left to the platform's rename.
pub fn move_items(
    sources: &[PathBuf],
    destination: &Path,
    sink: &mut dyn LogSink,
) -> Result<BatchReport, StageError> {
    fs::create_dir_all(destination).map_err(|source| StageError::Destination {
        path: destination.to_path_buf(),
        source,
    })?;

    let mut report = BatchReport::default();
    for src in sources {
        let outcome = move_one(src, destination);
        match &outcome {
            MoveOutcome::Moved { dest } => {
                info!(src = %src.display(), dest = %dest.display(), "Moved item");
                sink.ok(format!("Moved {}", display_name(src)));
            }
            MoveOutcome::Missing => {
                warn!(src = %src.display(), "Item missing at move time");
                sink.warn(format!("{} missing", src.display()));
            }
            MoveOutcome::Failed { reason } => {
                warn!(src = %src.display(), %reason, "Item move failed");
                sink.error(format!("{}: {}", display_name(src), reason));
            }
        }
        report.records.push(MoveRecord {
            source: src.clone(),
            outcome,
        });
    }

    debug!(
        moved = report.moved(),
        missing = report.missing(),
        failed = report.failed(),
        "Batch finished"
    );
    Ok(report)
}

fn move_one(src: &Path, destination: &Path) -> MoveOutcome {
    // symlink_metadata: a dangling link is still an entry that can be moved.
    if fs::symlink_metadata(src).is_err() {
        return MoveOutcome::Missing;
    }

    let Some(name) = src.file_name() else {
        return MoveOutcome::Failed {
            reason: format!("'{}' has no file name", src.display()),
        };
    };
    let dest = destination.join(name);

    match fs::rename(src, &dest) {
        Ok(()) => MoveOutcome::Moved { dest },
        Err(e) if is_cross_device(&e) => {
            debug!(src = %src.display(), "Rename crosses filesystems; copying instead");
            match copy_then_remove(src, &dest) {
                Ok(()) => MoveOutcome::Moved { dest },
                Err(e) => MoveOutcome::Failed { reason: e.to_string() },
            }
        }
        Err(e) => MoveOutcome::Failed {
            reason: io_error_message("move", src, &e),
        },
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
