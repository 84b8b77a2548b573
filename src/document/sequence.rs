//! RunSequence: the document content model
//!
//! A document is an ordered list of runs. Positions are offsets into the
//! concatenated text of all runs, never run indices.

use super::run::{runs_len, Run};
use crate::error::{Result, SyncError};
use crate::ot::Operation;
use serde::{Deserialize, Serialize};

/// Ordered sequence of formatted runs
///
/// # Example
///
/// ```rust
/// use runsync_ot::{Run, RunSequence};
///
/// let mut doc = RunSequence::from_text("hello");
/// doc.insert_runs(5, &[Run::plain(" world")]).unwrap();
/// doc.erase(0, 1).unwrap();
///
/// assert_eq!(doc.text(), "ello world");
/// assert_eq!(doc.len(), 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunSequence {
    runs: Vec<Run>,
}

impl RunSequence {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from existing runs
    pub fn from_runs(runs: Vec<Run>) -> Self {
        Self { runs }
    }

    /// Create a document holding a single plain run
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            return Self::new();
        }
        Self {
            runs: vec![Run::plain(text)],
        }
    }

    /// Total length in position units
    pub fn len(&self) -> usize {
        runs_len(&self.runs)
    }

    /// Check if the document has no text
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(Run::is_empty)
    }

    /// The runs, in document order
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Concatenated plain text of all runs
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Insert `runs` so that the first of them starts at `pos`
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Desync` if `pos > len()`
    pub fn insert_runs(&mut self, pos: usize, runs: &[Run]) -> Result<()> {
        let len = self.len();
        if pos > len {
            return Err(SyncError::Desync {
                op: format!("insert@{}", pos),
                document_len: len,
            });
        }

        let at = self.split_at(pos);
        let incoming = runs.iter().filter(|r| !r.is_empty()).cloned();
        self.runs.splice(at..at, incoming);
        Ok(())
    }

    /// Remove the half-open range `[start, end)`
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Desync` if the range is inverted or exceeds the
    /// document
    pub fn erase(&mut self, start: usize, end: usize) -> Result<()> {
        let len = self.len();
        if start > end || end > len {
            return Err(SyncError::Desync {
                op: format!("erase[{}..{})", start, end),
                document_len: len,
            });
        }
        if start == end {
            return Ok(());
        }

        let first = self.split_at(start);
        let last = self.split_at(end);
        self.runs.drain(first..last);
        Ok(())
    }

    /// Apply an operation
    ///
    /// Bounds are checked before anything is touched, so a failed apply
    /// leaves the document unchanged.
    pub fn apply(&mut self, op: &Operation) -> Result<()> {
        let len = self.len();
        if !op.fits(len) {
            return Err(SyncError::Desync {
                op: op.to_string(),
                document_len: len,
            });
        }

        match op {
            Operation::Insert(insert) => self.insert_runs(insert.pos(), insert.runs()),
            Operation::Erase(erase) => self.erase(erase.start(), erase.end()),
        }
    }

    /// Runs covering `[start, end)`, clipped at the range boundaries
    pub fn slice(&self, start: usize, end: usize) -> Vec<Run> {
        let mut out = Vec::new();
        if start >= end {
            return out;
        }
        let mut run_start = 0;

        for run in &self.runs {
            let run_end = run_start + run.len();
            if run_end > start && run_start < end {
                let from = start.max(run_start) - run_start;
                let to = end.min(run_end) - run_start;
                out.push(run.slice(from, to));
            }
            run_start = run_end;
            if run_start >= end {
                break;
            }
        }

        out
    }

    /// Merge neighbouring runs with equal attributes and drop empty runs
    ///
    /// A trailing empty run is kept as the terminating sentinel. Runs whose
    /// concatenation would merge position units stay separate, so `len()`
    /// never changes.
    pub fn coalesce(&mut self) {
        let count = self.runs.len();
        let mut merged: Vec<Run> = Vec::with_capacity(count);

        for (i, run) in self.runs.drain(..).enumerate() {
            if run.is_empty() {
                if i + 1 == count {
                    merged.push(run);
                }
                continue;
            }
            match merged.last_mut() {
                Some(prev) if prev.same_format(&run) && prev.joins_cleanly(&run) => {
                    prev.text.push_str(&run.text)
                }
                _ => merged.push(run),
            }
        }

        self.runs = merged;
    }

    /// Ensure a run boundary at `pos` and return the index of the first run
    /// starting at or after it
    ///
    /// Callers guarantee `pos <= len()`.
    fn split_at(&mut self, pos: usize) -> usize {
        let mut run_start = 0;

        for i in 0..self.runs.len() {
            if pos == run_start {
                return i;
            }
            let run_len = self.runs[i].len();
            if pos < run_start + run_len {
                let tail = self.runs[i].split_off(pos - run_start);
                self.runs.insert(i + 1, tail);
                return i + 1;
            }
            run_start += run_len;
        }

        self.runs.len()
    }
}

impl std::fmt::Display for RunSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for run in &self.runs {
            f.write_str(&run.text)?;
        }
        Ok(())
    }
}
