pub mod config;
pub mod geometry;
pub mod id;
pub mod layout;
pub mod model;

pub use config::{ConfigError, GraphConfig};
pub use geometry::{Containment, Viewport, constrain};
pub use id::NodeId;
pub use layout::{LayoutDecodeError, decode_layout, encode_layout};
pub use model::*;

// Re-export kurbo types so downstream crates don't need a direct dependency
pub use kurbo::{Point, Vec2};
