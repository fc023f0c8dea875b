//! Keyboard nudge handler: arrow keys move the focused node by a fixed step.
//!
//! Every nudge commits immediately; there is no intermediate phase to batch.

use crate::input::InputEvent;
use crate::mutation::{InputHandler, PositionMutation};
use orbit_core::config::DEFAULT_NUDGE_STEP;
use orbit_core::id::NodeId;
use orbit_core::model::{Position, PositionSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Map a `KeyboardEvent.key` value. Anything but the four arrows is `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Self::Up),
            "ArrowDown" => Some(Self::Down),
            "ArrowLeft" => Some(Self::Left),
            "ArrowRight" => Some(Self::Right),
            _ => None,
        }
    }

    /// Unit offset; y grows downward.
    fn unit(self) -> (f64, f64) {
        match self {
            Self::Up => (0.0, -1.0),
            Self::Down => (0.0, 1.0),
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NudgeHandler {
    step: f64,
}

impl Default for NudgeHandler {
    fn default() -> Self {
        Self::new(DEFAULT_NUDGE_STEP)
    }
}

impl NudgeHandler {
    pub fn new(step: f64) -> Self {
        Self { step }
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Unconstrained position one step from `current`.
    pub fn candidate(&self, current: Position, direction: Direction) -> Position {
        let (ux, uy) = direction.unit();
        Position::new(current.x + ux * self.step, current.y + uy * self.step)
    }

    /// Propose a committed nudge of `id`, if it exists in `positions`.
    pub fn nudge(
        &self,
        id: NodeId,
        direction: Direction,
        positions: &PositionSnapshot,
    ) -> Option<PositionMutation> {
        let current = positions.get(id)?;
        Some(PositionMutation::Commit {
            id,
            candidate: self.candidate(current, direction),
        })
    }
}

impl InputHandler for NudgeHandler {
    fn handle(
        &mut self,
        event: &InputEvent,
        target: Option<NodeId>,
        positions: &PositionSnapshot,
    ) -> Option<PositionMutation> {
        let InputEvent::Key { key } = event else {
            return None;
        };
        let direction = Direction::from_key(key)?;
        self.nudge(target?, direction, positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit_core::model::NodeSpec;
    use pretty_assertions::assert_eq;

    fn snapshot() -> PositionSnapshot {
        PositionSnapshot::from_defaults(&[NodeSpec::new(
            "nudge_a",
            "A",
            Position::new(-180.0, -100.0),
        )])
    }

    #[test]
    fn arrow_keys_map_to_directions() {
        assert_eq!(Direction::from_key("ArrowLeft"), Some(Direction::Left));
        assert_eq!(Direction::from_key("Enter"), None);
        assert_eq!(Direction::from_key("arrowup"), None);
    }

    #[test]
    fn each_direction_moves_one_step() {
        let h = NudgeHandler::default();
        let p = Position::new(10.0, 20.0);
        assert_eq!(h.candidate(p, Direction::Up), Position::new(10.0, 12.0));
        assert_eq!(h.candidate(p, Direction::Down), Position::new(10.0, 28.0));
        assert_eq!(h.candidate(p, Direction::Left), Position::new(2.0, 20.0));
        assert_eq!(h.candidate(p, Direction::Right), Position::new(18.0, 20.0));
    }

    #[test]
    fn key_event_produces_commit() {
        let mut h = NudgeHandler::default();
        let a = NodeId::intern("nudge_a");
        let out = h.handle(&InputEvent::key("ArrowRight"), Some(a), &snapshot());
        assert_eq!(
            out,
            Some(PositionMutation::Commit {
                id: a,
                candidate: Position::new(-172.0, -100.0),
            })
        );
    }

    #[test]
    fn other_keys_and_missing_targets_are_ignored() {
        let mut h = NudgeHandler::default();
        let a = NodeId::intern("nudge_a");
        assert_eq!(h.handle(&InputEvent::key("Tab"), Some(a), &snapshot()), None);
        assert_eq!(h.handle(&InputEvent::key("ArrowUp"), None, &snapshot()), None);
        assert_eq!(
            h.handle(
                &InputEvent::key("ArrowUp"),
                Some(NodeId::intern("nudge_stranger")),
                &snapshot()
            ),
            None
        );
    }
}
