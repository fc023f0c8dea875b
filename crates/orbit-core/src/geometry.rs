//! Containment geometry and anchor-relative ↔ screen conversions.
//!
//! Every satellite must stay within a circle of radius `R` around the
//! anchor. [`Containment::constrain`] is the only place that policy lives;
//! drag and keyboard input both funnel through it.

use crate::model::Position;
use kurbo::{Point, Vec2};

/// Default containment radius in layout units.
pub const DEFAULT_MAX_RADIUS: f64 = 250.0;

/// Slack for float rounding when checking a position that was clamped
/// exactly onto the boundary.
const CONTAINMENT_EPSILON: f64 = 1e-9;

/// Circular containment region centered on the anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Containment {
    pub max_radius: f64,
}

impl Default for Containment {
    fn default() -> Self {
        Self {
            max_radius: DEFAULT_MAX_RADIUS,
        }
    }
}

impl Containment {
    pub const fn new(max_radius: f64) -> Self {
        Self { max_radius }
    }

    /// Pull `candidate` back onto the boundary circle if it lies outside,
    /// keeping its direction. Positions inside (and the anchor itself)
    /// pass through unchanged.
    ///
    /// A finite candidate whose distance overflows is rescaled before
    /// measuring. A non-finite candidate has no direction and is returned
    /// as is; callers must check [`Position::is_finite`].
    pub fn constrain(&self, candidate: Position) -> Position {
        if !candidate.is_finite() {
            return candidate;
        }
        let mut v = Vec2::from(candidate);
        let mut distance = v.hypot();
        if distance.is_infinite() {
            v = v / v.x.abs().max(v.y.abs());
            distance = v.hypot();
        }
        if distance > self.max_radius {
            Position::from(v * (self.max_radius / distance))
        } else {
            candidate
        }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.distance() <= self.max_radius + CONTAINMENT_EPSILON
    }
}

/// [`Containment::constrain`] with the default radius.
pub fn constrain(candidate: Position) -> Position {
    Containment::default().constrain(candidate)
}

// ─── Screen mapping ──────────────────────────────────────────────────────

/// The container the diagram is drawn in. The anchor sits at its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 500.0,
        }
    }
}

impl Viewport {
    pub fn anchor(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Absolute container coordinates of a node's center.
    pub fn to_screen(&self, position: Position) -> Point {
        self.anchor() + Vec2::from(position)
    }

    /// SVG path for the connector from the anchor's center to the node.
    pub fn connector_path(&self, position: Position) -> String {
        let a = self.anchor();
        let n = self.to_screen(position);
        format!("M {} {} L {} {}", a.x, a.y, n.x, n.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn inside_passes_through() {
        let p = Position::new(-180.0, -100.0);
        assert_eq!(constrain(p), p);
    }

    #[test]
    fn anchor_passes_through() {
        assert_eq!(constrain(Position::ORIGIN), Position::ORIGIN);
    }

    #[test]
    fn outside_scales_to_boundary() {
        let clamped = constrain(Position::new(400.0, 0.0));
        assert_eq!(clamped, Position::new(250.0, 0.0));

        let clamped = constrain(Position::new(300.0, 400.0));
        assert!((clamped.distance() - 250.0).abs() < 1e-9);
        assert!((clamped.x - 150.0).abs() < 1e-9);
        assert!((clamped.y - 200.0).abs() < 1e-9);
    }

    #[test]
    fn custom_radius() {
        let c = Containment::new(10.0);
        assert_eq!(c.constrain(Position::new(0.0, -20.0)), Position::new(0.0, -10.0));
        assert!(c.contains(Position::new(6.0, 8.0)));
        assert!(!c.contains(Position::new(6.0, 8.1)));
    }

    #[test]
    fn screen_mapping_centers_anchor() {
        let vp = Viewport::default();
        assert_eq!(vp.anchor(), Point::new(200.0, 250.0));
        assert_eq!(vp.to_screen(Position::new(-180.0, -100.0)), Point::new(20.0, 150.0));
        assert_eq!(
            vp.connector_path(Position::new(150.0, 140.0)),
            "M 200 250 L 350 390"
        );
    }

    #[test]
    fn overflowing_distance_still_clamps() {
        let c = Containment::default();
        let p = c.constrain(Position::new(f64::MAX, f64::MAX));
        assert!(p.is_finite());
        assert!((p.distance() - 250.0).abs() < 1e-9);
        assert!((p.x - p.y).abs() < 1e-9);
    }

    #[test]
    fn non_finite_candidate_passes_through() {
        let c = Containment::default();
        assert!(!c.constrain(Position::new(f64::INFINITY, 0.0)).is_finite());
        assert!(c.constrain(Position::new(f64::NAN, 1.0)).x.is_nan());
    }

    proptest! {
        #[test]
        fn constrained_is_always_contained(x in -5000.0f64..5000.0, y in -5000.0f64..5000.0) {
            let c = Containment::default();
            prop_assert!(c.contains(c.constrain(Position::new(x, y))));
        }

        #[test]
        fn constrain_preserves_direction(x in -5000.0f64..5000.0, y in -5000.0f64..5000.0) {
            let p = Position::new(x, y);
            let q = constrain(p);
            // Cross product of original and clamped vectors is ~0.
            let cross = p.x * q.y - p.y * q.x;
            prop_assert!(cross.abs() <= 1e-6 * p.distance().max(1.0) * 250.0);
            prop_assert!(p.x * q.x + p.y * q.y >= 0.0);
        }

        #[test]
        fn constrain_is_idempotent(x in -5000.0f64..5000.0, y in -5000.0f64..5000.0) {
            let once = constrain(Position::new(x, y));
            let twice = constrain(once);
            prop_assert!((once.x - twice.x).abs() < 1e-9 && (once.y - twice.y).abs() < 1e-9);
        }
    }
}
