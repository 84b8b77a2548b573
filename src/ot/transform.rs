//! Transform engine: pure adjustment of one operation against another
//!
//! `transform(a, b, side)` answers: "`b` has already been applied to the
//! state `a` was generated against; what does `a` have to become?" For any
//! `a`, `b` generated against the same document,
//!
//! ```text
//! apply(apply(doc, b), transform(a, b, side))
//!     == apply(apply(doc, a), transform(b, a, side.flip()))
//! ```
//!
//! # Overlap policy
//!
//! An erase that straddles a concurrent insertion point widens to swallow
//! the inserted content, and the insert, seen from the other side, is
//! absorbed: it keeps a position at the start of the erased range but
//! drops its runs. Both orders therefore end without the inserted text.

use super::operation::{Erase, Insert, Operation};
use crate::ParticipantId;
use serde::{Deserialize, Serialize};

/// Tie-break role of the operation being adjusted
///
/// When two inserts land on the same position, the `Primary` one ends up
/// first. Only inserts at identical positions consult it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The adjusted operation wins position ties
    Primary,
    /// The already-applied operation wins position ties
    Secondary,
}

impl Side {
    /// Role of an operation by `a_author` against one by `b_author`
    ///
    /// The lower participant identifier is primary. Both participants of a
    /// pair must evaluate this with the same two identifiers, which is why
    /// identity is passed in rather than read from any ambient state.
    pub fn between(a_author: ParticipantId, b_author: ParticipantId) -> Side {
        if a_author < b_author {
            Side::Primary
        } else {
            Side::Secondary
        }
    }

    /// The opposite role
    pub fn flip(self) -> Side {
        match self {
            Side::Primary => Side::Secondary,
            Side::Secondary => Side::Primary,
        }
    }
}

/// Adjust `a` so it can be applied after `b`
///
/// # Example
///
/// ```rust
/// use runsync_ot::{transform, Operation, Run, Side};
///
/// let a = Operation::insert(5, vec![Run::plain("!")]);
/// let b = Operation::erase(0, 2).unwrap();
///
/// let adjusted = transform(&a, &b, Side::Primary);
/// assert_eq!(adjusted, Operation::insert(3, vec![Run::plain("!")]));
/// ```
pub fn transform(a: &Operation, b: &Operation, side: Side) -> Operation {
    match (a, b) {
        (Operation::Insert(a), Operation::Insert(b)) => {
            Operation::Insert(insert_after_insert(a, b, side))
        }
        (Operation::Insert(a), Operation::Erase(b)) => Operation::Insert(insert_after_erase(a, b)),
        (Operation::Erase(a), Operation::Insert(b)) => Operation::Erase(erase_after_insert(a, b)),
        (Operation::Erase(a), Operation::Erase(b)) => Operation::Erase(erase_after_erase(a, b)),
    }
}

/// Adjust `op` past every operation in `others`, in order
///
/// `others` must be in the order they were applied to the document.
pub fn transform_against_many(op: &Operation, others: &[Operation], side: Side) -> Operation {
    others
        .iter()
        .fold(op.clone(), |acc, other| transform(&acc, other, side))
}

/// Bridge an incoming operation across a list of unconfirmed local ones
///
/// `pending` were applied locally on top of the state `incoming` was
/// generated against. Returns the rebased `pending` (each adjusted to come
/// after `incoming`) and `incoming` adjusted to apply after all of
/// `pending`. `local_side` is the role of the local operations.
///
/// Each pending entry is transformed against `incoming` as it stands
/// after the entries before it; the returned incoming operation equals
/// `transform_against_many(incoming, pending, local_side.flip())`.
pub fn rebase(
    pending: &[Operation],
    incoming: &Operation,
    local_side: Side,
) -> (Vec<Operation>, Operation) {
    let mut bridged = incoming.clone();
    let mut rebased = Vec::with_capacity(pending.len());

    for local in pending {
        rebased.push(transform(local, &bridged, local_side));
        bridged = transform(&bridged, local, local_side.flip());
    }

    (rebased, bridged)
}

// Shifts saturate: a position that cannot exist stays out of range and is
// rejected by the caller's bounds check instead of wrapping into the document.
fn insert_after_insert(a: &Insert, b: &Insert, side: Side) -> Insert {
    let b_first = b.pos() < a.pos() || (b.pos() == a.pos() && side == Side::Secondary);
    if b_first {
        a.moved_to(a.pos().saturating_add(b.len()))
    } else {
        a.clone()
    }
}

fn insert_after_erase(a: &Insert, b: &Erase) -> Insert {
    if a.pos() >= b.end() {
        a.moved_to(a.pos() - b.len())
    } else if a.pos() <= b.start() {
        a.clone()
    } else {
        // Insertion point no longer exists
        a.absorbed_at(b.start())
    }
}

fn erase_after_insert(a: &Erase, b: &Insert) -> Erase {
    if b.pos() <= a.start() {
        a.with_range(
            a.start().saturating_add(b.len()),
            a.end().saturating_add(b.len()),
        )
    } else if b.pos() >= a.end() {
        *a
    } else {
        a.with_range(a.start(), a.end().saturating_add(b.len()))
    }
}

fn erase_after_erase(a: &Erase, b: &Erase) -> Erase {
    let map = |x: usize| {
        if x <= b.start() {
            x
        } else if x >= b.end() {
            x - b.len()
        } else {
            b.start()
        }
    };
    a.with_range(map(a.start()), map(a.end()))
}
