//! Operation: an atomic edit intent over a run sequence
//!
//! Operations are values. A transform never mutates its input; it builds a
//! new operation that carries the original's pending depth.

use crate::document::{runs_len, Run};
use crate::error::{Result, SyncError};
use crate::protocol::WireOperation;
use serde::{Deserialize, Serialize};

/// Insertion of runs at a position
///
/// `len()` is computed once at construction and always equals the summed
/// length of `runs()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insert {
    pos: usize,
    runs: Vec<Run>,
    length: usize,
    pending_depth: u64,
}

impl Insert {
    /// Create an insert of `runs` at `pos` with pending depth 0
    pub fn new(pos: usize, runs: Vec<Run>) -> Self {
        let length = runs_len(&runs);
        Self {
            pos,
            runs,
            length,
            pending_depth: 0,
        }
    }

    /// Position the first inserted run starts at
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// The inserted runs
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Cached length of the inserted content
    pub fn len(&self) -> usize {
        self.length
    }

    /// Check if nothing is inserted
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Causal marker (wire name `causal`)
    pub fn pending_depth(&self) -> u64 {
        self.pending_depth
    }

    /// Same content at a different position
    pub(crate) fn moved_to(&self, pos: usize) -> Self {
        Self {
            pos,
            ..self.clone()
        }
    }

    /// Content dropped, position kept at `pos`
    ///
    /// Used when the insertion point was inside concurrently erased text.
    pub(crate) fn absorbed_at(&self, pos: usize) -> Self {
        Self {
            pos,
            runs: Vec::new(),
            length: 0,
            pending_depth: self.pending_depth,
        }
    }
}

/// Erasure of the half-open range `[start, end)`
///
/// `start <= end` always holds; an empty range is a no-op erase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Erase {
    start: usize,
    end: usize,
    pending_depth: u64,
}

impl Erase {
    /// Create an erase, rejecting inverted ranges
    pub fn new(start: usize, end: usize) -> Result<Self> {
        if start > end {
            return Err(SyncError::MalformedOperation(format!(
                "erase range {}..{} is inverted",
                start, end
            )));
        }
        Ok(Self {
            start,
            end,
            pending_depth: 0,
        })
    }

    /// First erased position
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last erased position
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of erased position units
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the range is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Causal marker (wire name `causal`)
    pub fn pending_depth(&self) -> u64 {
        self.pending_depth
    }

    /// Same pending depth over a new range
    pub(crate) fn with_range(&self, start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self {
            start,
            end,
            pending_depth: self.pending_depth,
        }
    }
}

/// Closed set of edit operations
///
/// Every transform pairing is matched exhaustively; adding a variant is a
/// compile error until the engine handles it.
///
/// # Example
///
/// ```rust
/// use runsync_ot::{Operation, Run};
///
/// let insert = Operation::insert(3, vec![Run::plain("abc")]);
/// let erase = Operation::erase(0, 2).unwrap();
///
/// assert_eq!(insert.to_string(), "insert@3+3#0");
/// assert_eq!(erase.to_string(), "erase[0..2)#0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireOperation", into = "WireOperation")]
pub enum Operation {
    Insert(Insert),
    Erase(Erase),
}

impl Operation {
    /// Factory for inserts
    pub fn insert(pos: usize, runs: Vec<Run>) -> Self {
        Operation::Insert(Insert::new(pos, runs))
    }

    /// Factory for erases
    ///
    /// # Errors
    ///
    /// Returns `SyncError::MalformedOperation` if `start > end`
    pub fn erase(start: usize, end: usize) -> Result<Self> {
        Erase::new(start, end).map(Operation::Erase)
    }

    /// Causal marker: the author's unconfirmed operation count at creation
    pub fn pending_depth(&self) -> u64 {
        match self {
            Operation::Insert(insert) => insert.pending_depth,
            Operation::Erase(erase) => erase.pending_depth,
        }
    }

    /// Copy of this operation stamped with `depth`
    pub fn with_pending_depth(self, depth: u64) -> Self {
        match self {
            Operation::Insert(insert) => Operation::Insert(Insert {
                pending_depth: depth,
                ..insert
            }),
            Operation::Erase(erase) => Operation::Erase(Erase {
                pending_depth: depth,
                ..erase
            }),
        }
    }

    /// Whether applying this operation leaves any document unchanged
    pub fn is_noop(&self) -> bool {
        match self {
            Operation::Insert(insert) => insert.is_empty(),
            Operation::Erase(erase) => erase.is_empty(),
        }
    }

    /// Whether the operation's positions lie within a document of `len`
    pub fn fits(&self, len: usize) -> bool {
        match self {
            Operation::Insert(insert) => insert.pos <= len,
            Operation::Erase(erase) => erase.start <= erase.end && erase.end <= len,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Insert(insert) => write!(
                f,
                "insert@{}+{}#{}",
                insert.pos, insert.length, insert.pending_depth
            ),
            Operation::Erase(erase) => write!(
                f,
                "erase[{}..{})#{}",
                erase.start, erase.end, erase.pending_depth
            ),
        }
    }
}
