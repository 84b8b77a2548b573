//! RunSync OT - Operational transformation for collaborative rich text
//!
//! This crate keeps a document made of formatted text runs consistent
//! across participants that edit concurrently. It implements:
//! - Run sequence document model with position math
//! - Closed insert/erase operations with a local causal marker
//! - Transform functions with explicit tie-break priority
//! - Pending log and rebase against remote operations
//! - JSON wire format for operations
//!
//! Delivering operations between participants and the sequencing
//! authority is left to the caller.
//!
//! # Examples
//!
//! ```rust
//! use runsync_ot::{Controller, ControllerConfig, Operation, Run, RunSequence};
//!
//! let mut x = Controller::new(ControllerConfig::new(1), RunSequence::from_text("ab"));
//! let mut y = Controller::new(ControllerConfig::new(2), RunSequence::from_text("ab"));
//!
//! let from_x = x.local_edit(Operation::insert(1, vec![Run::plain("X")])).unwrap();
//! let from_y = y.local_edit(Operation::erase(0, 2).unwrap()).unwrap();
//!
//! // The authority sequenced Y's erase first
//! y.confirm(1).unwrap();
//! x.apply_remote(2, from_y.clone()).unwrap();
//!
//! // and then X's insert, rebased past the erase
//! let sequenced = runsync_ot::transform(&from_x, &from_y, runsync_ot::Side::Primary);
//! x.confirm(1).unwrap();
//! y.apply_remote(1, sequenced).unwrap();
//!
//! assert_eq!(x.document().text(), y.document().text());
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod ot;
pub mod protocol;

// Re-exports for convenience
pub use config::ControllerConfig;
pub use document::{Run, RunSequence};
pub use error::{Result, SyncError};
pub use ot::{
    rebase, transform, transform_against_many, Controller, Erase, Insert, Operation, PendingLog,
    Side, SyncState,
};

/// Participant identifier; the lower value wins insert ties
pub type ParticipantId = u64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_import() {
        // Smoke test that modules compile
        let _participant: ParticipantId = 1;
        let _doc = RunSequence::new();
    }
}
