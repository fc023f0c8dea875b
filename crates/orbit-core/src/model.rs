//! Core data model: satellite node specs, anchor-relative positions, and
//! the position snapshot handed to the renderer.
//!
//! All offsets are in layout units relative to the anchor's center.
//! The y axis grows downward, matching screen coordinates.

use crate::id::NodeId;
use kurbo::Vec2;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use smallvec::SmallVec;
use std::ops::Add;

// ─── Position ────────────────────────────────────────────────────────────

/// A 2D offset from the anchor's center.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// The anchor itself.
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance from the anchor.
    pub fn distance(&self) -> f64 {
        Vec2::from(*self).hypot()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Position> for Vec2 {
    fn from(p: Position) -> Self {
        Vec2::new(p.x, p.y)
    }
}

impl From<Vec2> for Position {
    fn from(v: Vec2) -> Self {
        Position::new(v.x, v.y)
    }
}

impl Add<Vec2> for Position {
    type Output = Position;

    fn add(self, delta: Vec2) -> Position {
        Position::new(self.x + delta.x, self.y + delta.y)
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// Static description of one satellite node, supplied at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: NodeId,
    pub label: String,
    #[serde(rename = "defaultPos", alias = "defaultPosition")]
    pub default_position: Position,
    /// Rendering asset reference (image path). Opaque to the engine.
    #[serde(rename = "src", default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
}

impl NodeSpec {
    pub fn new(id: &str, label: &str, default_position: Position) -> Self {
        Self {
            id: NodeId::intern(id),
            label: label.to_string(),
            default_position,
            asset: None,
        }
    }

    pub fn with_asset(mut self, asset: &str) -> Self {
        self.asset = Some(asset.to_string());
        self
    }

    /// Screen-reader description of the node at `position`.
    pub fn accessible_label(&self, position: Position) -> String {
        // Adding 0.0 turns a rounded -0 into 0.
        let x = position.x.round() + 0.0;
        let y = position.y.round() + 0.0;
        format!("{} node, currently at position {x}, {y}. Drag to move or use arrow keys.", self.label)
    }
}

// ─── Snapshot ────────────────────────────────────────────────────────────

/// Current position of every configured node, in configuration order.
///
/// Entries can only be created from the node list, so the snapshot always
/// holds exactly one position per configured node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PositionSnapshot {
    entries: SmallVec<[(NodeId, Position); 8]>,
}

impl PositionSnapshot {
    /// Snapshot with every node at its default position.
    pub fn from_defaults(nodes: &[NodeSpec]) -> Self {
        Self {
            entries: nodes.iter().map(|n| (n.id, n.default_position)).collect(),
        }
    }

    /// Build a snapshot by asking `position_of` for every configured node.
    /// Bails out with the first error; a partial snapshot is never returned.
    pub fn try_from_nodes<E, F>(nodes: &[NodeSpec], mut position_of: F) -> Result<Self, E>
    where
        F: FnMut(&NodeSpec) -> Result<Position, E>,
    {
        let mut entries = SmallVec::with_capacity(nodes.len());
        for node in nodes {
            entries.push((node.id, position_of(node)?));
        }
        Ok(Self { entries })
    }

    pub fn get(&self, id: NodeId) -> Option<Position> {
        self.entries.iter().find(|(k, _)| *k == id).map(|(_, p)| *p)
    }

    /// Overwrite the position of an existing node. Unknown ids are rejected
    /// so the one-entry-per-node invariant can't be broken.
    pub fn set(&mut self, id: NodeId, position: Position) -> bool {
        match self.entries.iter_mut().find(|(k, _)| *k == id) {
            Some(entry) => {
                entry.1 = position;
                true
            }
            None => false,
        }
    }

    /// Mutable access to positions only; ids stay fixed.
    pub fn positions_mut(&mut self) -> impl Iterator<Item = &mut Position> + '_ {
        self.entries.iter_mut().map(|(_, p)| p)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.entries.iter().any(|(k, _)| *k == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Position)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Serializes as a JSON object `{ "<id>": {"x":…, "y":…}, … }`.
impl Serialize for PositionSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, pos) in &self.entries {
            map.serialize_entry(id.as_str(), pos)?;
        }
        map.end()
    }
}
