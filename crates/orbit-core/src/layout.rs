//! Persisted layout codec.
//!
//! The layout is stored as a single JSON object mapping each node id to its
//! offset:
//!
//! ```json
//! { "diagnostician": { "x": -80.0, "y": -100.0 }, "nlp": { "x": 150.0, "y": 140.0 } }
//! ```
//!
//! Decoding is all-or-nothing against the configured node list: unknown
//! extra ids are ignored, but a missing or malformed entry for any
//! configured node rejects the whole record. JSON numbers are always
//! finite, so a decoded position is too.

use crate::model::{NodeSpec, Position, PositionSnapshot};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutDecodeError {
    #[error("persisted layout is not a JSON object: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("persisted layout has no position for node `{0}`")]
    MissingNode(String),
    #[error("persisted layout has an unreadable position for node `{id}`: {source}")]
    BadPosition {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Serialize a snapshot to its persisted form.
pub fn encode_layout(snapshot: &PositionSnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string(snapshot)
}

/// Parse a persisted layout, requiring a position for every node in `nodes`.
pub fn decode_layout(
    text: &str,
    nodes: &[NodeSpec],
) -> Result<PositionSnapshot, LayoutDecodeError> {
    let record: Map<String, Value> = serde_json::from_str(text)?;
    PositionSnapshot::try_from_nodes(nodes, |node| position_for(&record, node))
}

fn position_for(record: &Map<String, Value>, node: &NodeSpec) -> Result<Position, LayoutDecodeError> {
    let id = node.id.as_str();
    let value = record
        .get(id)
        .ok_or_else(|| LayoutDecodeError::MissingNode(id.to_string()))?;
    Position::deserialize(value).map_err(|source| LayoutDecodeError::BadPosition {
        id: id.to_string(),
        source,
    })
}
