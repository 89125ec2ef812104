//! Staging orchestrator.
//! One `Session` runs staging operations one after another and owns the single
//! pending-deletion slot that a successful run arms.
//!
//! Sequence of `run_staging`:
//! 1. clear the transcript
//! 2. check the source exists (nothing is touched otherwise)
//! 3. resolve and create the destination
//! 4. normalize the source (extract zips to a temp dir)
//! 5. list the staging area's immediate children
//! 6. move them
//! 7. remove the temp dir, whatever happened to individual items
//! 8. report and arm cleanup

use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error, info};

use crate::cleanup::{CleanupDecision, CleanupOutcome, CleanupState};
use crate::errors::StageError;
use crate::sink::LogSink;
use crate::stage::{BatchReport, StagingArea, move_items, normalize_source};

/// Inputs of one staging run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingRequest {
    /// Directory or `.zip` archive.
    pub source: PathBuf,
    /// Folder created under `fallback_volume` when no destination is given.
    pub folder_name: String,
    /// Explicit destination; `None` or an empty path means "use the volume".
    pub destination: Option<PathBuf>,
    pub fallback_volume: PathBuf,
}

impl StagingRequest {
    /// Explicit destination if non-empty, else `<fallback_volume>/<folder_name>`.
    pub fn resolve_destination(&self) -> PathBuf {
        match self.explicit_destination() {
            Some(dest) => dest.to_path_buf(),
            None => self.fallback_volume.join(&self.folder_name),
        }
    }

    fn explicit_destination(&self) -> Option<&Path> {
        self.destination
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingReport {
    pub destination: PathBuf,
    pub batch: BatchReport,
    /// Temporary extraction directory used (already removed), if the source was an archive.
    pub extracted_to: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct Session {
    cleanup: CleanupState,
    temp_root: Option<PathBuf>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create extraction directories under `root` instead of the system temp dir.
    pub fn with_temp_root(root: impl Into<PathBuf>) -> Self {
        Self {
            cleanup: CleanupState::Idle,
            temp_root: Some(root.into()),
        }
    }

    pub fn cleanup_state(&self) -> &CleanupState {
        &self.cleanup
    }

    /// Folder a confirmed cleanup would delete, if armed.
    pub fn pending_deletion(&self) -> Option<&Path> {
        self.cleanup.pending()
    }

    /// Run one staging operation. Errors are logged to `sink` before being returned;
    /// nothing already changed on disk is undone and the cleanup slot keeps its
    /// previous value.
    pub fn run_staging(
        &mut self,
        request: &StagingRequest,
        sink: &mut dyn LogSink,
    ) -> Result<StagingReport, StageError> {
        sink.clear();
        info!(source = %request.source.display(), "Staging run started");

        match self.stage(request, sink) {
            Ok(report) => {
                sink.done("Operation completed".to_string());
                info!(
                    dest = %report.destination.display(),
                    moved = report.batch.moved(),
                    missing = report.batch.missing(),
                    failed = report.batch.failed(),
                    "Staging run completed"
                );
                self.cleanup = CleanupState::Armed(report.destination.clone());
                Ok(report)
            }
            Err(e) => {
                error!(code = e.code(), kind = e.kind(), error = %e, "Staging run failed");
                sink.error(e.to_string());
                Err(e)
            }
        }
    }

    fn stage(&self, request: &StagingRequest, sink: &mut dyn LogSink) -> Result<StagingReport, StageError> {
        let source = &request.source;
        if !source.exists() {
            return Err(StageError::SourceNotFound(source.clone()));
        }
        if request.explicit_destination().is_none() {
            check_folder_name(&request.folder_name)?;
        }

        let destination = request.resolve_destination();
        fs::create_dir_all(&destination).map_err(|e| StageError::Destination {
            path: destination.clone(),
            source: e,
        })?;
        debug!(dest = %destination.display(), "Destination ready");

        let area = normalize_source(source, self.temp_root.as_deref(), sink)?;

        // The temp dir is removed even when listing or moving fails: `area` owns it.
        let children = list_children(area.path())?;
        let batch = if children.is_empty() {
            sink.info("Nothing to move".to_string());
            BatchReport::default()
        } else {
            move_items(&children, &destination, sink)?
        };

        let extracted_to = remove_staging_area(area, sink)?;

        Ok(StagingReport {
            destination,
            batch,
            extracted_to,
        })
    }

    /// Act on the armed pending deletion. `confirmed` is the user's answer.
    pub fn confirm_cleanup(
        &mut self,
        confirmed: bool,
        sink: &mut dyn LogSink,
    ) -> Result<CleanupOutcome, StageError> {
        let exists = self.cleanup.pending().is_some_and(Path::exists);
        match self.cleanup.decide(confirmed, exists) {
            CleanupDecision::NothingToDelete => {
                sink.info("Nothing to delete".to_string());
                Ok(CleanupOutcome::NothingToDelete)
            }
            CleanupDecision::Declined => {
                debug!("Cleanup declined; keeping moved folder");
                Ok(CleanupOutcome::Declined)
            }
            CleanupDecision::Delete(path) => match fs::remove_dir_all(&path) {
                Ok(()) => {
                    info!(path = %path.display(), "Deleted moved folder");
                    sink.ok("Deleted moved folder".to_string());
                    self.cleanup = CleanupState::Idle;
                    Ok(CleanupOutcome::Deleted(path))
                }
                Err(source) => {
                    let e = StageError::Deletion { path, source };
                    error!(code = e.code(), kind = e.kind(), error = %e, "Cleanup failed");
                    sink.error(e.to_string());
                    Err(e)
                }
            },
        }
    }
}

/// The folder name must be a single plain path component so the destination
/// stays strictly below the volume root.
fn check_folder_name(name: &str) -> Result<(), StageError> {
    let mut components = Path::new(name).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if name.trim().is_empty() || !single_normal {
        return Err(StageError::InvalidFolderName(name.to_string()));
    }
    Ok(())
}

/// Immediate children of `dir`, sorted by name so runs are reproducible.
fn list_children(dir: &Path) -> Result<Vec<PathBuf>, StageError> {
    let listing_err = |source: std::io::Error| StageError::Listing {
        path: dir.to_path_buf(),
        source,
    };
    let mut children = fs::read_dir(dir)
        .map_err(listing_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(listing_err)?;
    children.sort();
    Ok(children)
}

/// Delete an extraction directory; a direct source is left alone.
fn remove_staging_area(area: StagingArea, sink: &mut dyn LogSink) -> Result<Option<PathBuf>, StageError> {
    let StagingArea::Extracted(dir) = area else {
        return Ok(None);
    };
    let path = dir.path().to_path_buf();
    if !path.exists() {
        return Ok(Some(path));
    }
    dir.close().map_err(|source| StageError::Cleanup {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), "Removed temporary folder");
    sink.ok("Removed temp folder".to_string());
    Ok(Some(path))
}
