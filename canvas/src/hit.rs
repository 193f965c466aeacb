#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use std::str::FromStr;

use crate::camera::{Camera, Point};
use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::{Element, ElementId, LayoutStore};
use crate::geometry::Basis;

/// Which part of an element was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
}

/// Anchor position for resize handles, named by compass direction in the
/// element's body frame (north is the `-v` side, east the `+u` side).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    pub const ALL: [Self; 8] = [Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W, Self::Nw];

    /// Direction the width edge moves along `u`: `+1` east, `-1` west, `None` if untouched.
    #[must_use]
    pub fn x_sign(self) -> Option<f64> {
        match self {
            Self::E | Self::Ne | Self::Se => Some(1.0),
            Self::W | Self::Nw | Self::Sw => Some(-1.0),
            Self::N | Self::S => None,
        }
    }

    /// Direction the height edge moves along `v`: `+1` south, `-1` north, `None` if untouched.
    #[must_use]
    pub fn y_sign(self) -> Option<f64> {
        match self {
            Self::S | Self::Se | Self::Sw => Some(1.0),
            Self::N | Self::Ne | Self::Nw => Some(-1.0),
            Self::E | Self::W => None,
        }
    }

    /// Handle position in the body frame, relative to the element center.
    #[must_use]
    pub fn local_offset(self, width: f64, height: f64) -> Point {
        Point::new(
            self.x_sign().unwrap_or(0.0) * width / 2.0,
            self.y_sign().unwrap_or(0.0) * height / 2.0,
        )
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::N => "n",
            Self::Ne => "ne",
            Self::E => "e",
            Self::Se => "se",
            Self::S => "s",
            Self::Sw => "sw",
            Self::W => "w",
            Self::Nw => "nw",
        }
    }
}

impl FromStr for ResizeAnchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown resize handle: {s}"))
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    pub element_id: ElementId,
    pub part: HitPart,
}

/// World-space position of one resize handle of `element`.
#[must_use]
pub fn handle_position(element: &Element, anchor: ResizeAnchor) -> Point {
    let basis = Basis::from_degrees(element.rotation);
    element.center() + basis.to_world(anchor.local_offset(element.width, element.height))
}

/// Test which element (if any) is under `world_pt`.
///
/// Handles of the selected element win over any body, and only resizable
/// elements have handles. Bodies are tested topmost first, which is the
/// reverse of insertion order.
#[must_use]
pub fn hit_test(world_pt: Point, doc: &LayoutStore, camera: &Camera, selected_id: Option<ElementId>) -> Option<Hit> {
    let radius = camera.screen_dist_to_world(HANDLE_RADIUS_PX);

    if let Some(selected) = selected_id.and_then(|id| doc.get(&id)) {
        if selected.is_resizable() {
            let handle = ResizeAnchor::ALL.into_iter().find(|&anchor| {
                let d = world_pt - handle_position(selected, anchor);
                d.dot(d) <= radius * radius
            });
            if let Some(anchor) = handle {
                return Some(Hit { element_id: selected.id, part: HitPart::ResizeHandle(anchor) });
            }
        }
    }

    doc.list()
        .into_iter()
        .rev()
        .find(|e| e.contains(world_pt))
        .map(|e| Hit { element_id: e.id, part: HitPart::Body })
}
