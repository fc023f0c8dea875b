//! JSON shaping for values handed back to the page.

use orbit_core::geometry::Viewport;
use orbit_core::model::Position;
use orbit_editor::engine::Update;

/// Container size, falling back to the stock 400×500 when the page passes
/// a zero, negative, or non-finite dimension (e.g. before layout).
pub(crate) fn viewport(width: f64, height: f64) -> Viewport {
    let fallback = Viewport::default();
    let usable = |v: f64| v.is_finite() && v > 0.0;
    Viewport {
        width: if usable(width) { width } else { fallback.width },
        height: if usable(height) { height } else { fallback.height },
    }
}

pub(crate) fn update_json(update: Update) -> String {
    serde_json::to_string(&update).unwrap_or_else(|_| "{}".to_string())
}

pub(crate) fn screen_position_json(viewport: Viewport, position: Option<Position>) -> String {
    match position {
        Some(p) => {
            let screen = viewport.to_screen(p);
            serde_json::to_string(&Position::new(screen.x, screen.y))
                .unwrap_or_else(|_| "null".to_string())
        }
        None => "null".to_string(),
    }
}
