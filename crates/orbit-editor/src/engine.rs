//! The engine facade consumed by the renderer.
//!
//! `OrbitEngine` wires input handlers to the position store:
//!
//! - **Input**: pointer and key events go to the drag manager and nudge
//!   handler, which propose `PositionMutation`s.
//! - **Store**: mutations are constrained and written by the `PositionStore`,
//!   which persists on commit.
//! - **Output**: every call returns an `Update` describing what changed, and
//!   `state()` exposes the read-only snapshot. Intermediate drag frames are
//!   coalesced so the host schedules at most one redraw per frame.

use crate::drag::DragSessionManager;
use crate::frame::RedrawCoalescer;
use crate::input::InputEvent;
use crate::mutation::{InputHandler, PositionMutation};
use crate::nudge::{Direction, NudgeHandler};
use crate::storage::StorageBackend;
use crate::store::PositionStore;
use orbit_core::config::{ConfigError, GraphConfig};
use orbit_core::id::NodeId;
use orbit_core::model::{NodeSpec, Position, PositionSnapshot};
use serde::Serialize;

/// Document-level pointer listeners the host must attach or detach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListenerChange {
    /// A drag started: begin tracking moves and releases on the surface.
    Attach,
    /// The drag ended (or was aborted): stop tracking.
    Detach,
}

/// Result of feeding one event or command into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    /// The snapshot, drag flag, or selection changed.
    pub changed: bool,
    /// A persistence write (save or clear) was attempted and succeeded.
    pub persisted: bool,
    /// The host should schedule a frame and call `take_redraw` from it.
    pub schedule_frame: bool,
    pub listeners: Option<ListenerChange>,
}

/// Read-only view handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    pub positions: PositionSnapshot,
    pub is_dragging: bool,
    pub active_drag_id: Option<NodeId>,
    /// Node that most recently received keyboard input.
    pub selected_id: Option<NodeId>,
}

pub struct OrbitEngine<S> {
    store: PositionStore<S>,
    drag: DragSessionManager,
    nudge: NudgeHandler,
    redraw: RedrawCoalescer,
    selected: Option<NodeId>,
}

impl<S: StorageBackend> OrbitEngine<S> {
    /// Validate `config`, restore the saved layout from `storage`, and start
    /// idle.
    pub fn new(config: GraphConfig, storage: S) -> Result<Self, ConfigError> {
        let store = PositionStore::initialize(&config, storage)?;
        Ok(Self {
            store,
            drag: DragSessionManager::new(),
            nudge: NudgeHandler::new(config.nudge_step),
            redraw: RedrawCoalescer::new(),
            selected: None,
        })
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Route an input event aimed at `target` (the node whose hit target or
    /// focus received it, if any).
    pub fn handle(&mut self, event: &InputEvent, target: Option<NodeId>) -> Update {
        let was_dragging = self.drag.is_dragging();
        let mut update = Update::default();

        if let InputEvent::Key { .. } = event {
            update.changed |= self.select(target);
            if target.is_some() && target == self.drag.active_node() {
                log::debug!("ignoring key on {target:?} while it is being dragged");
                return self.finish(update, was_dragging);
            }
        }

        let mutation = match event {
            InputEvent::Key { .. } => self.nudge.handle(event, target, self.store.get()),
            _ => self.drag.handle(event, target, self.store.get()),
        };
        if let Some(mutation) = mutation {
            self.apply(mutation, &mut update);
        }
        self.finish(update, was_dragging)
    }

    pub fn on_pointer_down(
        &mut self,
        node_id: NodeId,
        pointer_id: i32,
        button: i16,
        x: f64,
        y: f64,
    ) -> Update {
        self.handle(
            &InputEvent::from_pointer_down(pointer_id, button, x, y),
            Some(node_id),
        )
    }

    pub fn on_pointer_move(&mut self, pointer_id: i32, x: f64, y: f64) -> Update {
        self.handle(&InputEvent::from_pointer_move(pointer_id, x, y), None)
    }

    pub fn on_pointer_up(&mut self, pointer_id: i32, x: f64, y: f64) -> Update {
        self.handle(&InputEvent::from_pointer_up(pointer_id, x, y), None)
    }

    pub fn on_pointer_cancel(&mut self, pointer_id: i32) -> Update {
        self.handle(&InputEvent::PointerCancel { pointer_id }, None)
    }

    pub fn on_lost_capture(&mut self, pointer_id: i32) -> Update {
        self.handle(&InputEvent::LostCapture { pointer_id }, None)
    }

    pub fn on_key_down(&mut self, node_id: NodeId, key: &str) -> Update {
        self.handle(&InputEvent::key(key), Some(node_id))
    }

    /// Move `node_id` one step in `direction` and persist.
    pub fn nudge(&mut self, node_id: NodeId, direction: Direction) -> Update {
        let was_dragging = self.drag.is_dragging();
        let mut update = Update::default();
        if self.drag.active_node() == Some(node_id) {
            return update;
        }
        if let Some(mutation) = self.nudge.nudge(node_id, direction, self.store.get()) {
            self.apply(mutation, &mut update);
        }
        self.finish(update, was_dragging)
    }

    /// Put every node back at its default and forget the saved layout.
    /// An in-progress drag is dropped without being committed.
    pub fn reset(&mut self) -> Update {
        let was_dragging = self.drag.is_dragging();
        self.drag.abort();
        self.selected = None;
        let before = self.store.get().clone();
        let persisted = self.store.reset();
        let update = Update {
            changed: before != *self.store.get() || was_dragging,
            persisted,
            ..Update::default()
        };
        self.finish(update, was_dragging)
    }

    // ─── Output ──────────────────────────────────────────────────────────

    pub fn state(&self) -> EngineState {
        EngineState {
            positions: self.store.get().clone(),
            is_dragging: self.drag.is_dragging(),
            active_drag_id: self.drag.active_node(),
            selected_id: self.selected,
        }
    }

    pub fn positions(&self) -> &PositionSnapshot {
        self.store.get()
    }

    pub fn position(&self, id: NodeId) -> Option<Position> {
        self.store.position(id)
    }

    pub fn nodes(&self) -> &[NodeSpec] {
        self.store.nodes()
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeSpec> {
        self.store.node(id)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn active_drag_id(&self) -> Option<NodeId> {
        self.drag.active_node()
    }

    pub fn selected_id(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn drag(&self) -> &DragSessionManager {
        &self.drag
    }

    /// Frame callback: returns `true` if the renderer should redraw now.
    pub fn take_redraw(&mut self) -> bool {
        self.redraw.take()
    }

    pub fn store(&self) -> &PositionStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PositionStore<S> {
        &mut self.store
    }

    pub fn into_storage(self) -> S {
        self.store.into_storage()
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn select(&mut self, target: Option<NodeId>) -> bool {
        match target {
            Some(id) if self.store.node(id).is_some() && self.selected != Some(id) => {
                self.selected = Some(id);
                true
            }
            _ => false,
        }
    }

    fn apply(&mut self, mutation: PositionMutation, update: &mut Update) {
        let id = mutation.id();
        let before = self.store.position(id);
        let after = match mutation {
            PositionMutation::Preview { id, candidate } => self.store.preview(id, candidate),
            PositionMutation::Commit { id, candidate } => {
                let stored = self.store.commit(id, candidate);
                update.persisted = stored.is_some() && self.store.persist_error().is_none();
                stored
            }
        };
        update.changed |= after.is_some() && after != before;
    }

    fn finish(&mut self, mut update: Update, was_dragging: bool) -> Update {
        let dragging = self.drag.is_dragging();
        update.listeners = match (was_dragging, dragging) {
            (false, true) => Some(ListenerChange::Attach),
            (true, false) => Some(ListenerChange::Detach),
            _ => None,
        };
        update.changed |= was_dragging != dragging;
        if update.changed {
            update.schedule_frame = self.redraw.request();
        }
        update
    }
}
