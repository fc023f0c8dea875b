//! Drag session manager.
//!
//! An explicit two-state machine:
//!
//! ```text
//!            primary pointer-down on node
//!   Idle ───────────────────────────────────▶ Dragging(session)
//!    ▲                                            │  pointer-move → Preview
//!    └──────── pointer-up / cancel / lost ────────┘  (emits one Commit)
//! ```
//!
//! Moves produce in-memory `Preview` mutations; the session end produces a
//! single `Commit` of the last candidate, so the layout is persisted exactly
//! once per drag no matter how the drag ends.

use crate::input::InputEvent;
use crate::mutation::{InputHandler, PositionMutation};
use orbit_core::id::NodeId;
use orbit_core::model::{Position, PositionSnapshot};
use orbit_core::Point;

/// How a drag session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEnd {
    Released,
    Cancelled,
    LostCapture,
}

/// State captured when a drag starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub node_id: NodeId,
    /// Pointer that owns the session; moves from other pointers are ignored.
    pub pointer_id: i32,
    pub pointer_origin: Point,
    pub position_origin: Position,
    /// Unconstrained candidate from the latest move.
    pub last_candidate: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

#[derive(Debug, Default)]
pub struct DragSessionManager {
    state: DragState,
    last_end: Option<DragEnd>,
}

impl DragSessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn active_node(&self) -> Option<NodeId> {
        self.session().map(|s| s.node_id)
    }

    /// How the most recent session ended.
    pub fn last_end(&self) -> Option<DragEnd> {
        self.last_end
    }

    /// Drop the current session without committing it.
    pub fn abort(&mut self) -> Option<DragSession> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(session) => {
                log::debug!("drag of {} aborted", session.node_id);
                Some(session)
            }
            DragState::Idle => None,
        }
    }

    fn begin(
        &mut self,
        pointer_id: i32,
        pointer: Point,
        target: Option<NodeId>,
        positions: &PositionSnapshot,
    ) {
        let Some(node_id) = target else {
            return;
        };
        let Some(position_origin) = positions.get(node_id) else {
            log::debug!("ignoring pointer-down on unknown node `{node_id}`");
            return;
        };
        self.state = DragState::Dragging(DragSession {
            node_id,
            pointer_id,
            pointer_origin: pointer,
            position_origin,
            last_candidate: position_origin,
        });
        log::debug!("drag of {node_id} started by pointer {pointer_id}");
    }

    fn finish(&mut self, pointer_id: i32, how: DragEnd) -> Option<PositionMutation> {
        let DragState::Dragging(session) = self.state else {
            return None;
        };
        if session.pointer_id != pointer_id {
            return None;
        }
        self.state = DragState::Idle;
        self.last_end = Some(how);
        log::debug!("drag of {} ended ({how:?})", session.node_id);
        Some(PositionMutation::Commit {
            id: session.node_id,
            candidate: session.last_candidate,
        })
    }
}

impl InputHandler for DragSessionManager {
    fn handle(
        &mut self,
        event: &InputEvent,
        target: Option<NodeId>,
        positions: &PositionSnapshot,
    ) -> Option<PositionMutation> {
        match event {
            InputEvent::PointerDown {
                pointer_id,
                button,
                x,
                y,
            } => {
                if let DragState::Dragging(active) = &self.state {
                    log::debug!(
                        "ignoring pointer-down on {target:?}: {} is already being dragged",
                        active.node_id
                    );
                    return None;
                }
                if !button.is_primary() {
                    return None;
                }
                let pointer = Point::new(*x, *y);
                if !pointer.is_finite() {
                    return None;
                }
                self.begin(*pointer_id, pointer, target, positions);
                None
            }
            InputEvent::PointerMove { pointer_id, x, y } => {
                let DragState::Dragging(session) = &mut self.state else {
                    return None;
                };
                let pointer = Point::new(*x, *y);
                if session.pointer_id != *pointer_id || !pointer.is_finite() {
                    return None;
                }
                let candidate = session.position_origin + (pointer - session.pointer_origin);
                if !candidate.is_finite() {
                    log::debug!("ignoring move on {}: offset overflows", session.node_id);
                    return None;
                }
                session.last_candidate = candidate;
                Some(PositionMutation::Preview {
                    id: session.node_id,
                    candidate,
                })
            }
            InputEvent::PointerUp { pointer_id, .. } => self.finish(*pointer_id, DragEnd::Released),
            InputEvent::PointerCancel { pointer_id } => {
                self.finish(*pointer_id, DragEnd::Cancelled)
            }
            InputEvent::LostCapture { pointer_id } => {
                self.finish(*pointer_id, DragEnd::LostCapture)
            }
            InputEvent::Key { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit_core::model::NodeSpec;
    use pretty_assertions::assert_eq;

    fn snapshot() -> PositionSnapshot {
        PositionSnapshot::from_defaults(&[
            NodeSpec::new("drag_a", "A", Position::new(-180.0, -100.0)),
            NodeSpec::new("drag_b", "B", Position::new(180.0, -100.0)),
        ])
    }

    fn down(pointer_id: i32, button: i16, x: f64, y: f64) -> InputEvent {
        InputEvent::from_pointer_down(pointer_id, button, x, y)
    }

    #[test]
    fn press_starts_session_without_mutation() {
        let mut drag = DragSessionManager::new();
        let a = NodeId::intern("drag_a");
        let out = drag.handle(&down(1, 0, 50.0, 60.0), Some(a), &snapshot());
        assert_eq!(out, None);
        let session = drag.session().unwrap();
        assert_eq!(session.node_id, a);
        assert_eq!(session.pointer_origin, Point::new(50.0, 60.0));
        assert_eq!(session.position_origin, Position::new(-180.0, -100.0));
    }

    #[test]
    fn move_proposes_origin_plus_delta() {
        let mut drag = DragSessionManager::new();
        let a = NodeId::intern("drag_a");
        let snap = snapshot();
        drag.handle(&down(1, 0, 50.0, 60.0), Some(a), &snap);

        let out = drag.handle(&InputEvent::from_pointer_move(1, 150.0, 60.0), None, &snap);
        assert_eq!(
            out,
            Some(PositionMutation::Preview {
                id: a,
                candidate: Position::new(-80.0, -100.0),
            })
        );
    }

    #[test]
    fn release_commits_last_candidate_once() {
        let mut drag = DragSessionManager::new();
        let a = NodeId::intern("drag_a");
        let snap = snapshot();
        drag.handle(&down(1, 0, 0.0, 0.0), Some(a), &snap);
        drag.handle(&InputEvent::from_pointer_move(1, 10.0, 0.0), None, &snap);
        drag.handle(&InputEvent::from_pointer_move(1, 20.0, 5.0), None, &snap);

        let out = drag.handle(&InputEvent::from_pointer_up(1, 20.0, 5.0), None, &snap);
        assert_eq!(
            out,
            Some(PositionMutation::Commit {
                id: a,
                candidate: Position::new(-160.0, -95.0),
            })
        );
        assert!(!drag.is_dragging());
        assert_eq!(drag.last_end(), Some(DragEnd::Released));

        // A second release has nothing to commit.
        assert_eq!(
            drag.handle(&InputEvent::from_pointer_up(1, 20.0, 5.0), None, &snap),
            None
        );
    }

    #[test]
    fn non_primary_buttons_are_ignored() {
        let mut drag = DragSessionManager::new();
        let a = NodeId::intern("drag_a");
        for button in [1, 2, 3] {
            drag.handle(&down(1, button, 0.0, 0.0), Some(a), &snapshot());
            assert!(!drag.is_dragging(), "button {button} started a drag");
        }
    }

    #[test]
    fn second_press_does_not_steal_session() {
        let mut drag = DragSessionManager::new();
        let a = NodeId::intern("drag_a");
        let b = NodeId::intern("drag_b");
        let snap = snapshot();
        drag.handle(&down(1, 0, 5.0, 5.0), Some(a), &snap);
        let before = *drag.session().unwrap();

        let out = drag.handle(&down(2, 0, 100.0, 100.0), Some(b), &snap);
        assert_eq!(out, None);
        assert_eq!(*drag.session().unwrap(), before);
    }

    #[test]
    fn foreign_pointer_is_ignored() {
        let mut drag = DragSessionManager::new();
        let a = NodeId::intern("drag_a");
        let snap = snapshot();
        drag.handle(&down(1, 0, 0.0, 0.0), Some(a), &snap);
        assert_eq!(
            drag.handle(&InputEvent::from_pointer_move(9, 40.0, 0.0), None, &snap),
            None
        );
        assert_eq!(
            drag.handle(&InputEvent::from_pointer_up(9, 40.0, 0.0), None, &snap),
            None
        );
        assert!(drag.is_dragging());
    }

    #[test]
    fn lost_capture_ends_session() {
        let mut drag = DragSessionManager::new();
        let a = NodeId::intern("drag_a");
        let snap = snapshot();
        drag.handle(&down(3, 0, 0.0, 0.0), Some(a), &snap);
        drag.handle(&InputEvent::from_pointer_move(3, 0.0, 30.0), None, &snap);

        let out = drag.handle(&InputEvent::LostCapture { pointer_id: 3 }, None, &snap);
        assert_eq!(
            out,
            Some(PositionMutation::Commit {
                id: a,
                candidate: Position::new(-180.0, -70.0),
            })
        );
        assert!(!drag.is_dragging());
        assert_eq!(drag.last_end(), Some(DragEnd::LostCapture));
    }

    #[test]
    fn non_finite_pointer_is_ignored() {
        let mut drag = DragSessionManager::new();
        let a = NodeId::intern("drag_a");
        let snap = snapshot();
        drag.handle(&down(1, 0, 0.0, 0.0), Some(a), &snap);
        assert_eq!(
            drag.handle(&InputEvent::from_pointer_move(1, f64::NAN, 0.0), None, &snap),
            None
        );
        assert_eq!(drag.session().unwrap().last_candidate, Position::new(-180.0, -100.0));
    }

    #[test]
    fn overflowing_offset_is_ignored() {
        let mut drag = DragSessionManager::new();
        let a = NodeId::intern("drag_a");
        let snap = snapshot();
        drag.handle(&down(1, 0, -1e308, 0.0), Some(a), &snap);
        assert_eq!(
            drag.handle(&InputEvent::from_pointer_move(1, 1e308, 0.0), None, &snap),
            None
        );
        assert_eq!(drag.session().unwrap().last_candidate, Position::new(-180.0, -100.0));

        // The release commits the last finite candidate.
        assert_eq!(
            drag.handle(&InputEvent::from_pointer_up(1, 1e308, 0.0), None, &snap),
            Some(PositionMutation::Commit {
                id: a,
                candidate: Position::new(-180.0, -100.0),
            })
        );
    }

    #[test]
    fn press_without_target_or_unknown_node_is_ignored() {
        let mut drag = DragSessionManager::new();
        drag.handle(&down(1, 0, 0.0, 0.0), None, &snapshot());
        assert!(!drag.is_dragging());
        drag.handle(
            &down(1, 0, 0.0, 0.0),
            Some(NodeId::intern("drag_stranger")),
            &snapshot(),
        );
        assert!(!drag.is_dragging());
    }
}
