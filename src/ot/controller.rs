//! Reconciliation controller: one participant's view of a shared document
//!
//! The controller is the single entry point through which a participant's
//! document and pending log change:
//!
//! - local edits are recorded and applied speculatively;
//! - remote operations are bridged across the pending log, applied, and the
//!   pending log is rebased onto them;
//! - confirmations only trim the pending log, since confirmed operations
//!   were already applied when they were made.
//!
//! Every step computes its full result before touching state, so a failed
//! call leaves the document and pending log as they were.

use super::operation::Operation;
use super::pending::PendingLog;
use super::transform::{rebase, Side};
use crate::config::ControllerConfig;
use crate::document::RunSequence;
use crate::error::{Result, SyncError};
use crate::ParticipantId;
use log::{debug, info, trace, warn};

/// Whether the participant has unconfirmed operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Nothing pending
    Idle,
    /// At least one local operation awaits confirmation
    AwaitingConfirmation,
}

/// Owns a document and the pending log of local operations against it
///
/// # Example
///
/// ```rust
/// use runsync_ot::{Controller, ControllerConfig, Operation, Run, RunSequence, SyncState};
///
/// let mut x = Controller::new(ControllerConfig::new(1), RunSequence::from_text("hello"));
///
/// x.local_edit(Operation::insert(0, vec![Run::plain("X")])).unwrap();
/// assert_eq!(x.document().text(), "Xhello");
/// assert_eq!(x.state(), SyncState::AwaitingConfirmation);
///
/// // Participant 2 appended concurrently
/// x.apply_remote(2, Operation::insert(5, vec![Run::plain("Y")])).unwrap();
/// assert_eq!(x.document().text(), "XhelloY");
///
/// x.confirm(1).unwrap();
/// assert_eq!(x.state(), SyncState::Idle);
/// ```
#[derive(Debug, Clone)]
pub struct Controller {
    config: ControllerConfig,
    document: RunSequence,
    pending: PendingLog,

    /// Trailing pending entries not yet handed to the transport
    unsent: usize,
}

impl Controller {
    /// Create a controller over `document`
    pub fn new(config: ControllerConfig, document: RunSequence) -> Self {
        Self {
            config,
            document,
            pending: PendingLog::new(),
            unsent: 0,
        }
    }

    /// This participant's identifier
    pub fn participant(&self) -> ParticipantId {
        self.config.participant
    }

    /// Active configuration
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Current document, including speculative local edits
    pub fn document(&self) -> &RunSequence {
        &self.document
    }

    /// Unconfirmed local operations
    pub fn pending(&self) -> &PendingLog {
        &self.pending
    }

    /// Idle or awaiting confirmation
    pub fn state(&self) -> SyncState {
        if self.pending.is_empty() {
            SyncState::Idle
        } else {
            SyncState::AwaitingConfirmation
        }
    }

    /// Record a local edit and apply it to the document
    ///
    /// Returns the operation stamped with its pending depth; it is also
    /// queued for `take_outgoing`.
    ///
    /// # Errors
    ///
    /// - `SyncError::Backpressure` if the pending log is at `max_pending`
    /// - `SyncError::Desync` if the edit does not fit the document
    pub fn local_edit(&mut self, op: Operation) -> Result<Operation> {
        if let Some(limit) = self.config.max_pending {
            if self.pending.len() >= limit {
                warn!(
                    "Participant {} refused local edit: {} operations pending",
                    self.config.participant, limit
                );
                return Err(SyncError::Backpressure { limit });
            }
        }

        let stamped = op.with_pending_depth(self.pending.len() as u64);
        if let Err(err) = self.document.apply(&stamped) {
            warn!(
                "Participant {} rejected local edit {}: {}",
                self.config.participant, stamped, err
            );
            return Err(err);
        }
        let stamped = self.pending.record(stamped);
        self.unsent += 1;
        self.tidy();

        debug!(
            "Participant {} recorded {} ({} pending)",
            self.config.participant,
            stamped,
            self.pending.len()
        );
        Ok(stamped)
    }

    /// Drain local operations that have not been sent yet
    ///
    /// The returned operations reflect any rebase that happened since they
    /// were recorded.
    pub fn take_outgoing(&mut self) -> Vec<Operation> {
        let entries = self.pending.entries();
        let outgoing = entries[entries.len() - self.unsent..].to_vec();
        self.unsent = 0;
        outgoing
    }

    /// Number of local operations waiting for `take_outgoing`
    pub fn unsent(&self) -> usize {
        self.unsent
    }

    /// Apply an operation from `author`, delivered in sequencing order
    ///
    /// Returns the operation as it was applied here, after adjusting it past
    /// every pending local operation.
    ///
    /// # Errors
    ///
    /// - `SyncError::MalformedOperation` if `author` is this participant
    /// - `SyncError::Desync` if the adjusted operation does not fit the
    ///   document, which means an earlier operation was missed
    pub fn apply_remote(&mut self, author: ParticipantId, op: Operation) -> Result<Operation> {
        if author == self.config.participant {
            warn!(
                "Participant {} received its own operation {} as remote",
                author, op
            );
            return Err(SyncError::MalformedOperation(format!(
                "remote operation {} carries the local participant id {}",
                op, author
            )));
        }

        let local_side = Side::between(self.config.participant, author);
        let (rebased, adjusted) = rebase(self.pending.entries(), &op, local_side);

        let len = self.document.len();
        if !adjusted.fits(len) {
            warn!(
                "Participant {} desynchronized: {} from {} adjusted to {} against length {}",
                self.config.participant, op, author, adjusted, len
            );
            return Err(SyncError::Desync {
                op: adjusted.to_string(),
                document_len: len,
            });
        }

        self.document.apply(&adjusted)?;
        for (before, after) in self.pending.entries().iter().zip(&rebased) {
            trace!("Rebased {} to {}", before, after);
        }
        self.pending.replace(rebased);
        self.tidy();

        debug!(
            "Participant {} applied {} from {} as {}",
            self.config.participant, op, author, adjusted
        );
        Ok(adjusted)
    }

    /// Acknowledge the `count` oldest local operations
    ///
    /// # Errors
    ///
    /// Returns `SyncError::ProtocolViolation` if more operations are
    /// confirmed than are pending
    pub fn confirm(&mut self, count: usize) -> Result<()> {
        self.pending.confirm(count)?;
        self.unsent = self.unsent.min(self.pending.len());

        debug!(
            "Participant {} confirmed {} ({} pending)",
            self.config.participant,
            count,
            self.pending.len()
        );
        Ok(())
    }

    /// Discard local state and adopt `document` from the sequencing authority
    ///
    /// This is the recovery path after `ProtocolViolation` or `Desync`.
    pub fn resynchronize(&mut self, document: RunSequence) {
        info!(
            "Participant {} resynchronizing, dropping {} pending operations",
            self.config.participant,
            self.pending.len()
        );
        self.pending.clear();
        self.unsent = 0;
        self.document = document;
        self.tidy();
    }

    fn tidy(&mut self) {
        if self.config.coalesce_runs {
            self.document.coalesce();
        }
    }
}
