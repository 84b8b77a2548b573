//! Document content model
//!
//! The document is owned by the editing surface; the engine only computes
//! positions and lengths against it and applies transformed operations.

mod run;
mod sequence;

pub use run::{runs_len, text_len, Run};
pub use sequence::RunSequence;
