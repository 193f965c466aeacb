//! Input model: modifier keys, mouse buttons, and the gesture state machine.
//!
//! `InputState` is the gesture being tracked between pointer-down and
//! pointer-up. Element gestures are carried by a `DragSession`: a snapshot of
//! the element taken at press time that every subsequent pointer move is
//! measured against. The session is dropped on release or cancel; since each
//! intermediate geometry is already valid, dropping it needs no rollback.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::doc::{Element, ElementId, LayoutError, PartialElement};
use crate::geometry::{self, Frame};
use crate::hit::ResizeAnchor;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key, holding the key name as reported by the host (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Persistent UI state visible to the host.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// The id of the currently selected element, if any.
    pub selected_id: Option<ElementId>,
}

/// What an element gesture does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Translate along world axes.
    Move,
    /// Drag one of the eight resize handles.
    Resize(ResizeAnchor),
}

/// Start snapshot of an element gesture, captured once at press time.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// Element being dragged.
    pub id: ElementId,
    /// Move or resize.
    pub gesture: Gesture,
    /// Screen-space pointer position at press.
    pub start_screen: Point,
    /// Element center and size at press.
    pub start: Frame,
    /// Element rotation at press, in degrees.
    pub rotation: f64,
}

impl DragSession {
    /// Begin a gesture on `element` from the pointer position `start_screen`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedField` when asked to resize an element with a fixed size.
    pub fn begin(element: &Element, gesture: Gesture, start_screen: Point) -> Result<Self, LayoutError> {
        if matches!(gesture, Gesture::Resize(_)) && !element.is_resizable() {
            return Err(LayoutError::UnsupportedField { id: element.id, field: "width" });
        }
        Ok(Self {
            id: element.id,
            gesture,
            start_screen,
            start: Frame { center: element.center(), width: element.width, height: element.height },
            rotation: element.rotation,
        })
    }

    /// Geometry for the pointer at `screen`, computed from the start snapshot.
    #[must_use]
    pub fn frame_at(&self, screen: Point, zoom: f64) -> Frame {
        let delta = screen - self.start_screen;
        match self.gesture {
            Gesture::Move => Frame { center: geometry::move_center(self.start.center, delta, zoom), ..self.start },
            Gesture::Resize(anchor) => geometry::resize(self.start, self.rotation, anchor, delta, zoom),
        }
    }

    /// The sparse update that moves the element to its geometry for `screen`.
    ///
    /// # Errors
    ///
    /// `InvalidValue` for a non-finite pointer position. The resize clamp would
    /// otherwise swallow a NaN and collapse the element to `MIN_SIZE`.
    pub fn update_at(&self, screen: Point, zoom: f64) -> Result<PartialElement, LayoutError> {
        if !screen.x.is_finite() {
            return Err(LayoutError::InvalidValue { field: "x" });
        }
        if !screen.y.is_finite() {
            return Err(LayoutError::InvalidValue { field: "y" });
        }
        let frame = self.frame_at(screen, zoom);
        Ok(match self.gesture {
            Gesture::Move => PartialElement::position(frame.center),
            Gesture::Resize(_) => PartialElement::frame(frame.center, frame.width, frame.height),
        })
    }
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is panning the view.
    Panning {
        /// Screen-space position of the previous pointer event, used to compute pan delta.
        last_screen: Point,
    },
    /// The user is moving or resizing an element.
    Dragging(DragSession),
}
