// Serialization layer - Convert operations to/from the JSON wire shape
//!
//! The wire shape is shared with independent implementations, so field
//! names are fixed:
//!
//! ```text
//! { "type": "insert", "pos": 3, "runs": [{"text": "abc"}], "causal": 0 }
//! { "type": "erase", "start": 1, "end": 4, "causal": 2 }
//! ```
//!
//! An insert's cached length never travels; it is recomputed from `runs`.

use crate::document::Run;
use crate::error::{Result, SyncError};
use crate::ot::Operation;
use log::warn;
use serde::{Deserialize, Serialize};

const INSERT: &str = "insert";
const ERASE: &str = "erase";

/// Untyped wire form of an operation
///
/// Every field except `type` is optional here; `Operation::try_from`
/// enforces which ones each type requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireOperation {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runs: Option<Vec<Run>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,

    #[serde(default)]
    pub causal: Option<u64>,
}

impl From<Operation> for WireOperation {
    fn from(op: Operation) -> Self {
        let causal = Some(op.pending_depth());
        match op {
            Operation::Insert(insert) => WireOperation {
                kind: INSERT.to_string(),
                pos: Some(insert.pos()),
                runs: Some(insert.runs().to_vec()),
                start: None,
                end: None,
                causal,
            },
            Operation::Erase(erase) => WireOperation {
                kind: ERASE.to_string(),
                pos: None,
                runs: None,
                start: Some(erase.start()),
                end: Some(erase.end()),
                causal,
            },
        }
    }
}

impl TryFrom<WireOperation> for Operation {
    type Error = SyncError;

    fn try_from(wire: WireOperation) -> Result<Self> {
        let causal = wire
            .causal
            .ok_or_else(|| missing(&wire.kind, "causal"))?;

        let op = match wire.kind.as_str() {
            INSERT => {
                let pos = wire.pos.ok_or_else(|| missing(INSERT, "pos"))?;
                let runs = wire.runs.ok_or_else(|| missing(INSERT, "runs"))?;
                if let Some(i) = runs.iter().position(Run::is_empty) {
                    return Err(SyncError::MalformedOperation(format!(
                        "insert run {} has no text",
                        i
                    )));
                }
                Operation::insert(pos, runs)
            }
            ERASE => {
                let start = wire.start.ok_or_else(|| missing(ERASE, "start"))?;
                let end = wire.end.ok_or_else(|| missing(ERASE, "end"))?;
                Operation::erase(start, end)?
            }
            other => {
                return Err(SyncError::MalformedOperation(format!(
                    "unknown operation type {:?}",
                    other
                )))
            }
        };

        Ok(op.with_pending_depth(causal))
    }
}

fn missing(kind: &str, field: &str) -> SyncError {
    SyncError::MalformedOperation(format!("{} operation is missing `{}`", kind, field))
}

/// Serialize an operation to its JSON wire text
pub fn encode_operation(op: &Operation) -> Result<String> {
    Ok(serde_json::to_string(op)?)
}

/// Deserialize an operation from JSON wire text
///
/// # Errors
///
/// - `SyncError::Serialization` if `text` is not JSON
/// - `SyncError::MalformedOperation` if it is JSON but not a valid
///   operation; the caller should drop the message
pub fn decode_operation(text: &str) -> Result<Operation> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    from_json_value(value)
}

/// Serialize a batch of operations as a JSON array
pub fn encode_operations(ops: &[Operation]) -> Result<String> {
    Ok(serde_json::to_string(ops)?)
}

/// Deserialize a JSON array of operations
///
/// The batch is rejected as a whole if any element is malformed.
pub fn decode_operations(text: &str) -> Result<Vec<Operation>> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    match value {
        serde_json::Value::Array(items) => items.into_iter().map(from_json_value).collect(),
        _ => {
            warn!("Dropping operation batch: payload is not an array");
            Err(SyncError::MalformedOperation(
                "operation batch is not an array".to_string(),
            ))
        }
    }
}

fn from_json_value(value: serde_json::Value) -> Result<Operation> {
    let wire: WireOperation = serde_json::from_value(value).map_err(|e| {
        warn!("Dropping malformed operation: {}", e);
        SyncError::MalformedOperation(e.to_string())
    })?;

    Operation::try_from(wire).map_err(|e| {
        warn!("Dropping malformed operation: {}", e);
        e
    })
}
