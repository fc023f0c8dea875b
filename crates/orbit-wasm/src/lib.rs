//! WASM bridge exposing the Orbit positioning engine to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page owns rendering:
//! it forwards pointer and key events from each node's hit target, reads
//! positions back, and draws markers and connectors.
//!
//! ```js
//! const graph = new OrbitGraph(null, container.clientWidth, container.clientHeight);
//! node.onpointerdown = (e) => apply(graph.on_pointer_down(id, e.pointerId, e.button, e.clientX, e.clientY));
//! function apply(json) {
//!   const update = JSON.parse(json);
//!   if (update.listeners === "attach") trackDocumentPointer();
//!   if (update.listeners === "detach") untrackDocumentPointer();
//!   if (update.scheduleFrame) requestAnimationFrame(() => graph.take_redraw() && draw());
//! }
//! ```

mod console;
mod storage;
mod view;

pub use storage::LocalStorage;

use orbit_core::config::GraphConfig;
use orbit_core::geometry::Viewport;
use orbit_core::id::NodeId;
use orbit_editor::engine::{OrbitEngine, Update};
use wasm_bindgen::prelude::*;

/// The main WASM-facing graph controller.
///
/// Holds the engine (with its localStorage-backed store) and the container
/// size used to map anchor-relative offsets to screen coordinates.
#[wasm_bindgen]
pub struct OrbitGraph {
    engine: OrbitEngine<LocalStorage>,
    viewport: Viewport,
}

#[wasm_bindgen]
impl OrbitGraph {
    /// Create a controller. `config_json` may be `null` for the stock
    /// four-node layout.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config_json: Option<String>,
        width: f64,
        height: f64,
    ) -> Result<OrbitGraph, JsError> {
        console::setup(log::LevelFilter::Warn);

        let config = match config_json.as_deref() {
            Some(text) if !text.trim().is_empty() => GraphConfig::from_json(text)?,
            _ => GraphConfig::default(),
        };
        Ok(Self::with_storage(config, LocalStorage::new(), width, height)?)
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    /// Pointer pressed on `node_id`'s hit target. Returns an update JSON:
    /// `{"changed":bool,"persisted":bool,"scheduleFrame":bool,"listeners":"attach"|"detach"|null}`
    pub fn on_pointer_down(
        &mut self,
        node_id: &str,
        pointer_id: i32,
        button: i16,
        x: f64,
        y: f64,
    ) -> String {
        match self.known(node_id) {
            Some(id) => {
                view::update_json(self.engine.on_pointer_down(id, pointer_id, button, x, y))
            }
            None => view::update_json(Update::default()),
        }
    }

    pub fn on_pointer_move(&mut self, pointer_id: i32, x: f64, y: f64) -> String {
        view::update_json(self.engine.on_pointer_move(pointer_id, x, y))
    }

    pub fn on_pointer_up(&mut self, pointer_id: i32, x: f64, y: f64) -> String {
        view::update_json(self.engine.on_pointer_up(pointer_id, x, y))
    }

    pub fn on_pointer_cancel(&mut self, pointer_id: i32) -> String {
        view::update_json(self.engine.on_pointer_cancel(pointer_id))
    }

    /// `lostpointercapture`: ends the drag like a release.
    pub fn on_lost_capture(&mut self, pointer_id: i32) -> String {
        view::update_json(self.engine.on_lost_capture(pointer_id))
    }

    // ─── Keyboard / commands ─────────────────────────────────────────────

    /// Key pressed while `node_id` had focus (`KeyboardEvent.key`).
    pub fn on_key_down(&mut self, node_id: &str, key: &str) -> String {
        match self.known(node_id) {
            Some(id) => view::update_json(self.engine.on_key_down(id, key)),
            None => view::update_json(Update::default()),
        }
    }

    /// Whether the page should `preventDefault()` this key on a node.
    pub fn handles_key(key: &str) -> bool {
        orbit_editor::nudge::Direction::from_key(key).is_some()
    }

    /// Restore the default layout and clear the saved one.
    pub fn reset(&mut self) -> String {
        view::update_json(self.engine.reset())
    }

    /// Frame callback: `true` if a redraw is due.
    pub fn take_redraw(&mut self) -> bool {
        self.engine.take_redraw()
    }

    // ─── State ───────────────────────────────────────────────────────────

    /// Full renderer state:
    /// `{"positions":{id:{x,y}},"isDragging":bool,"activeDragId":id|null,"selectedId":id|null}`
    pub fn state_json(&self) -> String {
        serde_json::to_string(&self.engine.state()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Just the `{id: {x, y}}` map.
    pub fn positions_json(&self) -> String {
        serde_json::to_string(self.engine.positions()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Configured nodes as `[{"id","label","defaultPos","src"}]`.
    pub fn nodes_json(&self) -> String {
        serde_json::to_string(self.engine.nodes()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn is_dragging(&self) -> bool {
        self.engine.is_dragging()
    }

    /// Id of the node being dragged, or empty string if none.
    pub fn active_drag_id(&self) -> String {
        self.engine
            .active_drag_id()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// Id of the node that last received a key, or empty string if none.
    pub fn selected_id(&self) -> String {
        self.engine
            .selected_id()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// Whether the last save or clear reached storage.
    pub fn storage_ok(&self) -> bool {
        self.engine.store().persist_error().is_none()
    }

    // ─── Render helpers ──────────────────────────────────────────────────

    /// Update the container size after a resize.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = view::viewport(width, height);
    }

    /// Container coordinates of a node's center: `{"x":..,"y":..}` or `null`.
    pub fn screen_position_json(&self, node_id: &str) -> String {
        let position = self.known(node_id).and_then(|id| self.engine.position(id));
        view::screen_position_json(self.viewport, position)
    }

    /// SVG `d` attribute for the connector from the anchor to `node_id`.
    pub fn connector_path(&self, node_id: &str) -> String {
        self.known(node_id)
            .and_then(|id| self.engine.position(id))
            .map(|p| self.viewport.connector_path(p))
            .unwrap_or_default()
    }

    /// `aria-label` text for a node's focus target.
    pub fn aria_label(&self, node_id: &str) -> String {
        self.known(node_id)
            .and_then(|id| Some(self.engine.node(id)?.accessible_label(self.engine.position(id)?)))
            .unwrap_or_default()
    }
}

impl OrbitGraph {
    fn with_storage(
        config: GraphConfig,
        storage: LocalStorage,
        width: f64,
        height: f64,
    ) -> Result<Self, orbit_core::ConfigError> {
        if !storage.is_available() {
            log::warn!("node positions will not be remembered: localStorage unavailable");
        }
        Ok(Self {
            engine: OrbitEngine::new(config, storage)?,
            viewport: view::viewport(width, height),
        })
    }

    /// Resolve a host-supplied id to a configured node.
    fn known(&self, node_id: &str) -> Option<NodeId> {
        let id = NodeId::lookup(node_id)?;
        self.engine.node(id).map(|n| n.id)
    }
}
