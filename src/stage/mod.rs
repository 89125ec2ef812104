//! Staging building blocks: archive normalization, batch moves and their helpers.

mod archive;
mod copy;
mod helpers;
mod mover;

pub use archive::{EXTRACT_PREFIX, StagingArea, is_zip_path, normalize_source};
pub use helpers::{io_error_message, io_error_with_help};
pub use mover::{BatchReport, MoveOutcome, MoveRecord, move_items};
