pub mod drag;
pub mod engine;
pub mod frame;
pub mod input;
pub mod mutation;
pub mod nudge;
pub mod storage;
pub mod store;

pub use engine::{EngineState, ListenerChange, OrbitEngine, Update};
pub use storage::{MemoryStorage, StorageBackend, StorageError};
pub use store::PositionStore;

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
