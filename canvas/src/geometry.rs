//! Geometry for pointer-driven transforms of rotated rectangles.
//!
//! Every element carries a body frame: `u` runs along its width and `v` along
//! its height, both rotated by the element's angle. Moves happen along world
//! axes. Resizes happen in the body frame: the screen delta is divided by the
//! zoom, projected onto `u` and `v`, applied to the active edges, and the
//! resulting center shift is rotated back into world space so that the edges
//! opposite the handle stay where they were.
//!
//! All functions here are pure and take the gesture's start snapshot, never a
//! running value, so repeated calls during one drag cannot accumulate drift.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use crate::camera::Point;
use crate::consts::{ANGLE_EPSILON_DEG, MIN_SIZE};
use crate::hit::ResizeAnchor;

/// Orthonormal basis of an element's body frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    /// Unit vector along the width axis: `(cos θ, sin θ)`.
    pub u: Point,
    /// Unit vector along the height axis: `(−sin θ, cos θ)`.
    pub v: Point,
}

impl Basis {
    #[must_use]
    pub fn from_degrees(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self { u: Point::new(cos, sin), v: Point::new(-sin, cos) }
    }

    /// Project a world-space vector onto the body axes.
    #[must_use]
    pub fn to_local(&self, world: Point) -> Point {
        Point::new(world.dot(self.u), world.dot(self.v))
    }

    /// Rebuild a world-space vector from body-frame components.
    #[must_use]
    pub fn to_world(&self, local: Point) -> Point {
        self.u * local.x + self.v * local.y
    }
}

/// Center and size of an element; the part of its state a gesture rewrites.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub center: Point,
    pub width: f64,
    pub height: f64,
}

/// New center after dragging by `screen_delta` pixels at `zoom`.
///
/// Translation only: the element's rotation plays no part.
#[must_use]
pub fn move_center(start_center: Point, screen_delta: Point, zoom: f64) -> Point {
    debug_assert!(zoom > 0.0, "zoom must be positive");
    start_center + screen_delta * (1.0 / zoom)
}

/// Resize `start` by dragging `anchor` by `screen_delta` pixels at `zoom`.
///
/// Each axis touched by the anchor grows by the projected delta (or shrinks,
/// for west and north edges) and is clamped to `MIN_SIZE`. The center moves
/// by half the clamped growth along that axis, which keeps the opposite edge
/// pinned in world space even while the dragged edge is clamped.
#[must_use]
pub fn resize(start: Frame, rotation_deg: f64, anchor: ResizeAnchor, screen_delta: Point, zoom: f64) -> Frame {
    debug_assert!(zoom > 0.0, "zoom must be positive");
    let basis = Basis::from_degrees(rotation_deg);
    let local = basis.to_local(screen_delta * (1.0 / zoom));

    let mut width = start.width;
    let mut height = start.height;
    let mut shift = Point::default();

    if let Some(sx) = anchor.x_sign() {
        width = (start.width + sx * local.x).max(MIN_SIZE);
        shift.x = sx * (width - start.width) / 2.0;
    }
    if let Some(sy) = anchor.y_sign() {
        height = (start.height + sy * local.y).max(MIN_SIZE);
        shift.y = sy * (height - start.height) / 2.0;
    }

    Frame { center: start.center + basis.to_world(shift), width, height }
}

/// Next angle of the rotation toggle: 90° becomes 0°, anything else becomes 90°.
#[must_use]
pub fn toggle_rotation(degrees: f64) -> f64 {
    if (degrees.rem_euclid(360.0) - 90.0).abs() < ANGLE_EPSILON_DEG {
        0.0
    } else {
        90.0
    }
}
