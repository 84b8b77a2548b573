//! Pending log: this participant's operations awaiting confirmation
//!
//! Entries are kept oldest first. They leave the log only through
//! `confirm`, in the order they were sent; a rebase rewrites them in place
//! but never reorders them.

use super::operation::Operation;
use crate::error::{Result, SyncError};
use log::warn;

/// Ordered buffer of locally generated, unconfirmed operations
///
/// # Example
///
/// ```rust
/// use runsync_ot::{Operation, PendingLog, Run};
///
/// let mut log = PendingLog::new();
/// let first = log.record(Operation::insert(0, vec![Run::plain("a")]));
/// let second = log.record(Operation::insert(1, vec![Run::plain("b")]));
///
/// assert_eq!(first.pending_depth(), 0);
/// assert_eq!(second.pending_depth(), 1);
///
/// log.confirm(1).unwrap();
/// assert_eq!(log.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PendingLog {
    entries: Vec<Operation>,

    /// Operations recorded over the log's lifetime
    recorded: u64,

    /// Operations confirmed over the log's lifetime
    confirmed: u64,
}

impl PendingLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp `op` with the current pending count and append it
    ///
    /// Returns the stamped operation.
    pub fn record(&mut self, op: Operation) -> Operation {
        let stamped = op.with_pending_depth(self.entries.len() as u64);
        self.entries.push(stamped.clone());
        self.recorded += 1;
        stamped
    }

    /// Drop the `count` oldest entries
    ///
    /// # Errors
    ///
    /// Returns `SyncError::ProtocolViolation` if `count` exceeds the number
    /// of pending entries. The log is left untouched in that case.
    pub fn confirm(&mut self, count: usize) -> Result<()> {
        let pending = self.entries.len();
        if count > pending {
            warn!(
                "Confirmation of {} operations with only {} pending",
                count, pending
            );
            return Err(SyncError::ProtocolViolation {
                requested: count,
                pending,
            });
        }

        self.entries.drain(..count);
        self.confirmed += count as u64;
        Ok(())
    }

    /// Snapshot of the pending entries, oldest first
    pub fn entries(&self) -> &[Operation] {
        &self.entries
    }

    /// Swap in the result of a rebase pass
    pub fn replace(&mut self, entries: Vec<Operation>) {
        debug_assert_eq!(entries.len(), self.entries.len());
        self.entries = entries;
    }

    /// Discard everything, keeping the lifetime counters consistent
    pub fn clear(&mut self) {
        self.confirmed += self.entries.len() as u64;
        self.entries.clear();
    }

    /// Number of pending entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is pending
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Operations recorded over the log's lifetime
    pub fn recorded(&self) -> u64 {
        self.recorded
    }

    /// Operations confirmed or discarded over the log's lifetime
    pub fn confirmed(&self) -> u64 {
        self.confirmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Run;

    fn ins(pos: usize, text: &str) -> Operation {
        Operation::insert(pos, vec![Run::plain(text)])
    }

    #[test]
    fn test_record_stamps_depth() {
        let mut log = PendingLog::new();
        assert_eq!(log.record(ins(0, "a")).pending_depth(), 0);
        assert_eq!(log.record(ins(1, "b")).pending_depth(), 1);
        assert_eq!(log.record(ins(2, "c")).pending_depth(), 2);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_record_overrides_existing_depth() {
        let mut log = PendingLog::new();
        let op = log.record(ins(0, "a").with_pending_depth(9));
        assert_eq!(op.pending_depth(), 0);
    }

    #[test]
    fn test_depth_drops_after_confirmation() {
        let mut log = PendingLog::new();
        log.record(ins(0, "a"));
        log.record(ins(1, "b"));
        log.confirm(2).unwrap();

        assert_eq!(log.record(ins(2, "c")).pending_depth(), 0);
    }

    #[test]
    fn test_confirm_removes_oldest() {
        let mut log = PendingLog::new();
        log.record(ins(0, "a"));
        log.record(ins(1, "b"));
        log.record(ins(2, "c"));

        log.confirm(2).unwrap();
        assert_eq!(log.entries(), &[ins(2, "c").with_pending_depth(2)]);
    }

    #[test]
    fn test_confirm_too_many() {
        let mut log = PendingLog::new();
        log.record(ins(0, "a"));

        match log.confirm(2) {
            Err(SyncError::ProtocolViolation { requested, pending }) => {
                assert_eq!(requested, 2);
                assert_eq!(pending, 1);
            }
            other => panic!("Expected ProtocolViolation, got {:?}", other),
        }
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_confirm_zero_is_noop() {
        let mut log = PendingLog::new();
        log.record(ins(0, "a"));
        log.confirm(1).unwrap();
        let before = log.entries().to_vec();

        log.confirm(0).unwrap();
        assert_eq!(log.entries(), before.as_slice());
    }

    #[test]
    fn test_counters_track_length() {
        let mut log = PendingLog::new();
        for i in 0..5 {
            log.record(ins(i, "x"));
        }
        log.confirm(3).unwrap();

        assert_eq!(log.recorded(), 5);
        assert_eq!(log.confirmed(), 3);
        assert_eq!(log.len() as u64, log.recorded() - log.confirmed());

        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.recorded(), log.confirmed());
    }

    #[test]
    fn test_replace() {
        let mut log = PendingLog::new();
        log.record(ins(0, "a"));
        log.replace(vec![ins(4, "a")]);
        assert_eq!(log.entries(), &[ins(4, "a")]);
    }
}
