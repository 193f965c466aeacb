//! Document model: layout elements, their properties, and the in-memory store.
//!
//! This module defines what is placed on the floor plan (`Element`,
//! `ElementKind`), a sparse-update type for shallow-merge edits
//! (`PartialElement`), the court palette (`CourtColor`), and the store that
//! owns every live element (`LayoutStore`).
//!
//! Elements are positioned by their center. Courts are created at the fixed
//! court footprint and keep it; zones can be resized but never below
//! `MIN_SIZE` on either axis. The store remembers insertion order, which is
//! the order `list` returns and the order availability results follow.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::consts::{COURT_HEIGHT, COURT_WIDTH, MIN_SIZE, SPAWN_X, SPAWN_Y, ZONE_DEFAULT_SIZE};
use crate::geometry;

/// Unique identifier for a layout element.
pub type ElementId = Uuid;

/// Palette token for a court. Purely cosmetic, but it also names the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourtColor {
    Blue,
    Green,
    Terracotta,
    Purple,
    Gray,
}

impl CourtColor {
    /// Every palette token, in palette order.
    pub const ALL: [Self; 5] = [Self::Blue, Self::Green, Self::Terracotta, Self::Purple, Self::Gray];

    /// Lowercase token name as used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Terracotta => "terracotta",
            Self::Purple => "purple",
            Self::Gray => "gray",
        }
    }

    /// Display name of the playing surface this color stands for.
    #[must_use]
    pub fn surface(self) -> &'static str {
        match self {
            Self::Blue => "Hard court",
            Self::Green => "Artificial grass",
            Self::Terracotta => "Clay",
            Self::Purple => "Acrylic",
            Self::Gray => "Concrete",
        }
    }
}

impl fmt::Display for CourtColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CourtColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown court color: {s}"))
    }
}

/// What an element is, with the per-variant data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ElementKind {
    /// A bookable court with its display number and palette color.
    Court { label: u32, color: CourtColor },
    /// A generic resizable area (seating, storage, walkway...).
    Zone,
}

/// An element placed on the floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier, stable for the element's lifetime.
    pub id: ElementId,
    /// Variant and per-variant data.
    #[serde(flatten)]
    pub kind: ElementKind,
    /// Center x in world coordinates.
    pub x: f64,
    /// Center y in world coordinates.
    pub y: f64,
    /// Extent along the element's own width axis.
    pub width: f64,
    /// Extent along the element's own height axis.
    pub height: f64,
    /// Rotation in degrees around the center.
    pub rotation: f64,
}

impl Element {
    /// World-space center.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn is_court(&self) -> bool {
        matches!(self.kind, ElementKind::Court { .. })
    }

    /// Only zones can change size after creation.
    #[must_use]
    pub fn is_resizable(&self) -> bool {
        matches!(self.kind, ElementKind::Zone)
    }

    /// Court display number, if this is a court.
    #[must_use]
    pub fn label(&self) -> Option<u32> {
        match self.kind {
            ElementKind::Court { label, .. } => Some(label),
            ElementKind::Zone => None,
        }
    }

    /// Court palette color, if this is a court.
    #[must_use]
    pub fn color(&self) -> Option<CourtColor> {
        match self.kind {
            ElementKind::Court { color, .. } => Some(color),
            ElementKind::Zone => None,
        }
    }

    /// Surface type derived from the court color.
    #[must_use]
    pub fn surface(&self) -> Option<&'static str> {
        self.color().map(CourtColor::surface)
    }

    /// Whether a world point lies inside the element's rotated rectangle.
    #[must_use]
    pub fn contains(&self, world: Point) -> bool {
        let local = geometry::Basis::from_degrees(self.rotation).to_local(world - self.center());
        local.x.abs() <= self.width / 2.0 && local.y.abs() <= self.height / 2.0
    }
}

/// Sparse update for an element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// New width; zones only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// New height; zones only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// New palette color; courts only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<CourtColor>,
}

impl PartialElement {
    /// A partial carrying only a new center.
    #[must_use]
    pub fn position(center: Point) -> Self {
        Self { x: Some(center.x), y: Some(center.y), ..Default::default() }
    }

    /// A partial carrying a new center and size.
    #[must_use]
    pub fn frame(center: Point, width: f64, height: f64) -> Self {
        Self { x: Some(center.x), y: Some(center.y), width: Some(width), height: Some(height), ..Default::default() }
    }

    fn numbers(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
            ("rotation", self.rotation),
        ]
    }
}

/// Failures of layout operations. None of them leave a partial change behind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("element not found: {0}")]
    NotFound(ElementId),
    #[error("element {id} does not support field `{field}`")]
    UnsupportedField { id: ElementId, field: &'static str },
    #[error("invalid value for `{field}`: must be finite")]
    InvalidValue { field: &'static str },
}

/// In-memory store of layout elements.
pub struct LayoutStore {
    elements: HashMap<ElementId, Element>,
    order: Vec<ElementId>,
    courts_created: u32,
}

impl LayoutStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { elements: HashMap::new(), order: Vec::new(), courts_created: 0 }
    }

    /// Place a new court at the spawn point.
    ///
    /// The label is one past the number of courts ever created in this layout,
    /// so deleting a court leaves a gap instead of handing its number out again.
    pub fn create_court(&mut self, color: CourtColor) -> Element {
        self.courts_created += 1;
        let kind = ElementKind::Court { label: self.courts_created, color };
        self.place(kind, COURT_WIDTH, COURT_HEIGHT)
    }

    /// Place a new zone at the spawn point.
    pub fn create_zone(&mut self) -> Element {
        self.place(ElementKind::Zone, ZONE_DEFAULT_SIZE, ZONE_DEFAULT_SIZE)
    }

    fn place(&mut self, kind: ElementKind, width: f64, height: f64) -> Element {
        let element = Element {
            id: Uuid::new_v4(),
            kind,
            x: SPAWN_X,
            y: SPAWN_Y,
            width,
            height,
            rotation: 0.0,
        };
        self.order.push(element.id);
        self.elements.insert(element.id, element.clone());
        element
    }

    /// Shallow-merge `partial` into an existing element.
    ///
    /// Everything is validated before anything is written. Zone sizes below
    /// `MIN_SIZE` are clamped up to it.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, `UnsupportedField` for a size change on a
    /// court or a color on a zone, `InvalidValue` for non-finite numbers.
    pub fn update(&mut self, id: &ElementId, partial: &PartialElement) -> Result<Element, LayoutError> {
        let element = self.elements.get_mut(id).ok_or(LayoutError::NotFound(*id))?;

        for (field, value) in partial.numbers() {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(LayoutError::InvalidValue { field });
            }
        }
        if !element.is_resizable() {
            if partial.width.is_some() {
                return Err(LayoutError::UnsupportedField { id: *id, field: "width" });
            }
            if partial.height.is_some() {
                return Err(LayoutError::UnsupportedField { id: *id, field: "height" });
            }
        }
        if partial.color.is_some() && !element.is_court() {
            return Err(LayoutError::UnsupportedField { id: *id, field: "color" });
        }

        if let Some(x) = partial.x {
            element.x = x;
        }
        if let Some(y) = partial.y {
            element.y = y;
        }
        if let Some(w) = partial.width {
            element.width = w.max(MIN_SIZE);
        }
        if let Some(h) = partial.height {
            element.height = h.max(MIN_SIZE);
        }
        if let Some(r) = partial.rotation {
            element.rotation = r;
        }
        if let (Some(new_color), ElementKind::Court { color, .. }) = (partial.color, &mut element.kind) {
            *color = new_color;
        }

        Ok(element.clone())
    }

    /// Toggle an element between 0° and 90°.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub fn rotate(&mut self, id: &ElementId) -> Result<Element, LayoutError> {
        let element = self.elements.get_mut(id).ok_or(LayoutError::NotFound(*id))?;
        element.rotation = geometry::toggle_rotation(element.rotation);
        Ok(element.clone())
    }

    /// Remove an element, returning it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub fn delete(&mut self, id: &ElementId) -> Result<Element, LayoutError> {
        let element = self.elements.remove(id).ok_or(LayoutError::NotFound(*id))?;
        self.order.retain(|other| other != id);
        Ok(element)
    }

    /// Remove every element and restart court numbering.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.order.clear();
        self.courts_created = 0;
    }

    /// Return a reference to an element by id.
    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    /// All elements in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<&Element> {
        self.order.iter().filter_map(|id| self.elements.get(id)).collect()
    }

    /// Courts only, in insertion order.
    pub fn courts(&self) -> impl Iterator<Item = &Element> {
        self.order
            .iter()
            .filter_map(|id| self.elements.get(id))
            .filter(|e| e.is_court())
    }

    /// Find a live court by its display number.
    #[must_use]
    pub fn court_by_label(&self, label: u32) -> Option<&Element> {
        self.courts().find(|e| e.label() == Some(label))
    }

    /// Number of elements currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the store contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Default for LayoutStore {
    fn default() -> Self {
        Self::new()
    }
}
