//! Core library for `stage_move`.
//!
//! Stages a folder, or the contents of a `.zip` archive, into a destination
//! directory one item at a time, then offers a confirmed cleanup of that
//! destination.
//!
//! - `session`: the orchestrator (`Session::run_staging`, `Session::confirm_cleanup`).
//! - `stage`: archive normalization and batch moves.
//! - `cleanup`: the pending-deletion state machine.
//! - `sink`: the run transcript (`[OK]`, `[Warn]`, `[Error]`, `[Info]`, `[Done]` lines).
//! - `platform`: volume enumeration and owner-only file helpers.
//! - `config`, `cli`, `output`: the command-line surface.

pub mod cleanup;
pub mod cli;
pub mod config;
pub mod errors;
pub mod output;
pub mod platform;
pub mod session;
pub mod sink;
pub mod stage;

pub use cleanup::{CleanupDecision, CleanupOutcome, CleanupState};
pub use config::types::{Config, LogLevel};
pub use config::{default_config_path, load_config_from_xml_path, path_has_symlink_ancestor};
pub use errors::StageError;
pub use platform::{choose_default_volume, list_volumes};
pub use session::{Session, StagingReport, StagingRequest};
pub use sink::{LogLine, LogSink, LogTag, MemorySink};
pub use stage::{BatchReport, MoveOutcome, MoveRecord, StagingArea, is_zip_path, move_items, normalize_source};
