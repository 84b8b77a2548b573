//! Run: a span of text sharing one attribute set
//!
//! Attributes are opaque to the engine. They are only compared for
//! equality, which decides whether two neighbouring runs may be merged.

use serde::{Deserialize, Serialize};

#[cfg(feature = "graphemes")]
use unicode_segmentation::UnicodeSegmentation;

/// A contiguous span of text with a single formatting attribute set
///
/// # Example
///
/// ```rust
/// use runsync_ot::Run;
///
/// let run = Run::new("bold", serde_json::json!({"bold": true}));
/// assert_eq!(run.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    /// Text content
    pub text: String,

    /// Opaque formatting attributes (`null` for plain text)
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub attributes: serde_json::Value,
}

impl Run {
    /// Create a run with the given attributes
    pub fn new(text: impl Into<String>, attributes: serde_json::Value) -> Self {
        Self {
            text: text.into(),
            attributes,
        }
    }

    /// Create a run without attributes
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, serde_json::Value::Null)
    }

    /// Length of the run in position units
    pub fn len(&self) -> usize {
        text_len(&self.text)
    }

    /// Check if the run has no text
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether `other` may be merged into this run
    pub fn same_format(&self, other: &Run) -> bool {
        self.attributes == other.attributes
    }

    /// Whether appending `other` keeps the combined length at the sum of both
    ///
    /// With grapheme positions a leading combining mark in `other` would fuse
    /// with the last cluster of `self` and shrink the document.
    #[cfg(feature = "graphemes")]
    pub(crate) fn joins_cleanly(&self, other: &Run) -> bool {
        let joined = format!("{}{}", self.text, other.text);
        text_len(&joined) == self.len() + other.len()
    }

    #[cfg(not(feature = "graphemes"))]
    pub(crate) fn joins_cleanly(&self, _other: &Run) -> bool {
        true
    }

    /// Split at `offset` position units, keeping the head in `self`
    ///
    /// Returns the tail as a new run with the same attributes.
    pub(crate) fn split_off(&mut self, offset: usize) -> Run {
        let at = byte_offset(&self.text, offset);
        let tail = self.text.split_off(at);
        Run::new(tail, self.attributes.clone())
    }

    /// Copy of the units in `[start, end)` with the same attributes
    pub(crate) fn slice(&self, start: usize, end: usize) -> Run {
        let from = byte_offset(&self.text, start);
        let to = byte_offset(&self.text, end);
        Run::new(&self.text[from..to], self.attributes.clone())
    }
}

/// Length of `text` in position units
///
/// Unicode scalar values by default, extended grapheme clusters with the
/// `graphemes` feature.
#[cfg(feature = "graphemes")]
pub fn text_len(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Length of `text` in position units
///
/// Unicode scalar values by default, extended grapheme clusters with the
/// `graphemes` feature.
#[cfg(not(feature = "graphemes"))]
pub fn text_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the boundary `units` position units into `text`
///
/// Offsets at or past the end map to `text.len()`.
#[cfg(feature = "graphemes")]
pub(crate) fn byte_offset(text: &str, units: usize) -> usize {
    text.grapheme_indices(true)
        .nth(units)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

#[cfg(not(feature = "graphemes"))]
pub(crate) fn byte_offset(text: &str, units: usize) -> usize {
    text.char_indices()
        .nth(units)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Sum of the lengths of `runs`
pub fn runs_len(runs: &[Run]) -> usize {
    runs.iter().map(Run::len).sum()
}
