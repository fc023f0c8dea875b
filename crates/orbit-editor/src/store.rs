//! Position store: the single owner of the position snapshot.
//!
//! Loads the persisted layout once at construction, applies the
//! containment constraint to every write, and persists after commits and
//! resets. Persistence is best-effort: a failing backend is logged and
//! remembered in `persist_error`, but the in-memory snapshot always
//! updates so the session keeps working.

use crate::storage::{StorageBackend, StorageError};
use orbit_core::config::{ConfigError, GraphConfig};
use orbit_core::geometry::Containment;
use orbit_core::id::NodeId;
use orbit_core::layout::{decode_layout, encode_layout};
use orbit_core::model::{NodeSpec, Position, PositionSnapshot};

pub struct PositionStore<S> {
    nodes: Vec<NodeSpec>,
    containment: Containment,
    key: String,
    storage: S,
    snapshot: PositionSnapshot,
    persist_error: Option<StorageError>,
}

impl<S: StorageBackend> PositionStore<S> {
    /// Validate `config` and load the initial snapshot from `storage`.
    ///
    /// The persisted layout is used only if it holds a valid position for
    /// every configured node; otherwise every node starts at its default.
    pub fn initialize(config: &GraphConfig, storage: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let containment = config.containment();
        let snapshot = load_snapshot(&storage, &config.storage_key, &config.nodes, containment);
        Ok(Self {
            nodes: config.nodes.clone(),
            containment,
            key: config.storage_key.clone(),
            storage,
            snapshot,
            persist_error: None,
        })
    }

    /// Current snapshot.
    pub fn get(&self) -> &PositionSnapshot {
        &self.snapshot
    }

    pub fn position(&self, id: NodeId) -> Option<Position> {
        self.snapshot.get(id)
    }

    pub fn nodes(&self) -> &[NodeSpec] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeSpec> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn containment(&self) -> Containment {
        self.containment
    }

    /// Constrain and write one node's position without persisting.
    /// Returns the stored position, or `None` for an unknown node or a
    /// non-finite candidate.
    pub fn preview(&mut self, id: NodeId, candidate: Position) -> Option<Position> {
        if !candidate.is_finite() {
            log::debug!("ignoring non-finite position for `{id}`");
            return None;
        }
        let position = self.containment.constrain(candidate);
        if self.snapshot.set(id, position) {
            log::trace!("preview {id} -> ({:.2}, {:.2})", position.x, position.y);
            Some(position)
        } else {
            log::debug!("ignoring position for unknown node `{id}`");
            None
        }
    }

    /// Constrain and write one node's position, then persist the layout.
    pub fn commit(&mut self, id: NodeId, candidate: Position) -> Option<Position> {
        let position = self.preview(id, candidate)?;
        log::debug!("commit {id} -> ({:.2}, {:.2})", position.x, position.y);
        self.persist();
        Some(position)
    }

    /// Write the whole snapshot to storage. Returns `true` on success.
    pub fn persist(&mut self) -> bool {
        let result = encode_layout(&self.snapshot)
            .map_err(|e| StorageError::Unavailable(format!("cannot encode layout: {e}")))
            .and_then(|text| self.storage.write(&self.key, &text));
        self.record(result, "save")
    }

    /// Put every node back at its default and erase the persisted layout.
    /// Returns `true` if the persisted layout was cleared.
    pub fn reset(&mut self) -> bool {
        self.snapshot = PositionSnapshot::from_defaults(&self.nodes);
        log::debug!("reset {} nodes to defaults", self.snapshot.len());
        let result = self.storage.remove(&self.key);
        self.record(result, "clear")
    }

    /// Error from the most recent persistence attempt, if it failed.
    pub fn persist_error(&self) -> Option<&StorageError> {
        self.persist_error.as_ref()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn record(&mut self, result: Result<(), StorageError>, action: &str) -> bool {
        match result {
            Ok(()) => {
                self.persist_error = None;
                true
            }
            Err(e) => {
                log::warn!("failed to {action} node positions under `{}`: {e}", self.key);
                self.persist_error = Some(e);
                false
            }
        }
    }
}

fn load_snapshot<S: StorageBackend>(
    storage: &S,
    key: &str,
    nodes: &[NodeSpec],
    containment: Containment,
) -> PositionSnapshot {
    let text = match storage.read(key) {
        Ok(Some(text)) => text,
        Ok(None) => return PositionSnapshot::from_defaults(nodes),
        Err(e) => {
            log::warn!("failed to read saved node positions under `{key}`: {e}");
            return PositionSnapshot::from_defaults(nodes);
        }
    };

    match decode_layout(&text, nodes) {
        Ok(mut snapshot) => {
            // A layout saved under a larger radius must still honor this one.
            for position in snapshot.positions_mut() {
                *position = containment.constrain(*position);
            }
            log::debug!("restored {} node positions from `{key}`", snapshot.len());
            snapshot
        }
        Err(e) => {
            log::warn!("discarding saved node positions under `{key}`: {e}");
            PositionSnapshot::from_defaults(nodes)
        }
    }
}
