//! Position mutations proposed by input handlers.
//!
//! Handlers never own positions. They read the current snapshot and
//! return a `PositionMutation`; the engine applies it through the
//! `PositionStore`, which constrains and (for commits) persists.

use crate::input::InputEvent;
use orbit_core::id::NodeId;
use orbit_core::model::{Position, PositionSnapshot};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionMutation {
    /// Update the in-memory snapshot only (intermediate drag frames).
    Preview { id: NodeId, candidate: Position },
    /// Update the snapshot and persist the whole layout.
    Commit { id: NodeId, candidate: Position },
}

impl PositionMutation {
    pub fn id(&self) -> NodeId {
        match self {
            Self::Preview { id, .. } | Self::Commit { id, .. } => *id,
        }
    }
}

/// Trait for handlers that turn input into position mutations.
pub trait InputHandler {
    /// Handle an input event aimed at `target` (the node whose hit target or
    /// focus received it, if any). At most one mutation per event.
    fn handle(
        &mut self,
        event: &InputEvent,
        target: Option<NodeId>,
        positions: &PositionSnapshot,
    ) -> Option<PositionMutation>;
}
