//! Typed error definitions for stage_move.
//! Provides a small set of well-known failure modes for better logs and tests.
//!
//! Per-item move failures are not errors here: the batch mover reports them as
//! `MoveOutcome::Failed` values and keeps going.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StageError {
    #[error("Source path not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Invalid folder name '{0}': must not be empty, '.' or '..' when no destination is given")]
    InvalidFolderName(String),

    #[error("Failed to create destination {}: {}", .path.display(), .source)]
    Destination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Archive error for {}: {}", .path.display(), .reason)]
    Archive { path: PathBuf, reason: String },

    #[error("Failed to list staging area {}: {}", .path.display(), .source)]
    Listing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to remove temporary folder {}: {}", .path.display(), .source)]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to delete moved folder {}: {}", .path.display(), .source)]
    Deletion {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StageError {
    /// Stable numeric code for structured logs and exit diagnostics.
    pub fn code(&self) -> u16 {
        match self {
            StageError::SourceNotFound(_) => 10,
            StageError::InvalidFolderName(_) => 11,
            StageError::Destination { .. } => 20,
            StageError::Archive { .. } => 30,
            StageError::Listing { .. } => 40,
            StageError::Cleanup { .. } => 50,
            StageError::Deletion { .. } => 60,
        }
    }

    /// Short snake_case label used as the `kind` field in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            StageError::SourceNotFound(_) => "source_not_found",
            StageError::InvalidFolderName(_) => "invalid_folder_name",
            StageError::Destination { .. } => "destination",
            StageError::Archive { .. } => "archive",
            StageError::Listing { .. } => "listing",
            StageError::Cleanup { .. } => "cleanup",
            StageError::Deletion { .. } => "deletion",
        }
    }
}
