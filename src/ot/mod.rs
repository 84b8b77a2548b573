//! Operational transformation engine
//!
//! This module keeps a rich-text document consistent across participants
//! that edit concurrently and see each other's edits in a different order.
//!
//! # Components
//!
//! - **Operation:** closed `Insert`/`Erase` variant with a causal marker
//! - **Transform:** pure functions adjusting one operation past another
//! - **PendingLog:** local operations awaiting the sequencing authority
//! - **Controller:** applies local edits, remote operations and confirmations
//!
//! # Flow
//!
//! ```text
//! local edit  -> record in pending log -> apply speculatively -> send
//! remote op   -> bridge across pending log -> apply -> rebase pending log
//! confirm(k)  -> drop k oldest pending entries
//! ```
//!
//! # References
//!
//! - Ellis & Gibbs, "Concurrency Control in Groupware Systems" (1989)
//! - Nichols et al., "High-Latency, Low-Bandwidth Windowing in the Jupiter
//!   Collaboration System" (1995)

mod controller;
mod operation;
mod pending;
mod transform;

pub use controller::{Controller, SyncState};
pub use operation::{Erase, Insert, Operation};
pub use pending::PendingLog;
pub use transform::{rebase, transform, transform_against_many, Side};
