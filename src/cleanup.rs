//! Deferred cleanup of a run's output.
//!
//! After a successful run the destination is remembered in a single slot.
//! Deleting it needs explicit confirmation, happens at most once per arming,
//! and a failed delete keeps the slot armed so the user can retry.

use std::path::{Path, PathBuf};

/// The single pending-deletion slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CleanupState {
    #[default]
    Idle,
    Armed(PathBuf),
}

/// What a confirmation request should do, given the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupDecision {
    NothingToDelete,
    Declined,
    Delete(PathBuf),
}

/// Reported back to the caller of `confirm_cleanup`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    NothingToDelete,
    Declined,
    Deleted(PathBuf),
}

impl CleanupState {
    pub fn pending(&self) -> Option<&Path> {
        match self {
            CleanupState::Idle => None,
            CleanupState::Armed(p) => Some(p),
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self, CleanupState::Armed(_))
    }

    /// Pure transition: no filesystem access, `target_exists` is supplied by the caller.
    pub fn decide(&self, confirmed: bool, target_exists: bool) -> CleanupDecision {
        match self {
            CleanupState::Armed(path) if target_exists => {
                if confirmed {
                    CleanupDecision::Delete(path.clone())
                } else {
                    CleanupDecision::Declined
                }
            }
            _ => CleanupDecision::NothingToDelete,
        }
    }
}
