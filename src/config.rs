//! Controller configuration

use crate::error::Result;
use crate::ParticipantId;
use serde::{Deserialize, Serialize};

/// Settings for a reconciliation controller
///
/// Missing fields fall back to their defaults, so a config can be read from
/// a partial JSON object.
///
/// # Example
///
/// ```rust
/// use runsync_ot::ControllerConfig;
///
/// let config = ControllerConfig::from_json(r#"{"participant": 7}"#).unwrap();
/// assert_eq!(config.participant, 7);
/// assert!(config.coalesce_runs);
/// assert_eq!(config.max_pending, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// This participant's identifier; the lower id wins insert ties
    pub participant: ParticipantId,

    /// Merge neighbouring runs with equal attributes after every apply
    pub coalesce_runs: bool,

    /// Refuse local edits once this many are unconfirmed
    pub max_pending: Option<usize>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            participant: 0,
            coalesce_runs: true,
            max_pending: None,
        }
    }
}

impl ControllerConfig {
    /// Default settings for `participant`
    pub fn new(participant: ParticipantId) -> Self {
        Self {
            participant,
            ..Self::default()
        }
    }

    /// Bound the pending log
    pub fn with_max_pending(mut self, limit: usize) -> Self {
        self.max_pending = Some(limit);
        self
    }

    /// Toggle run coalescing
    pub fn with_coalesce_runs(mut self, coalesce: bool) -> Self {
        self.coalesce_runs = coalesce;
        self
    }

    /// Parse a JSON config object
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
