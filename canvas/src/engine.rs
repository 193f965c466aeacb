use crate::camera::{Camera, Point};
use crate::consts::ZOOM_WHEEL_STEP;
use crate::doc::{CourtColor, Element, ElementId, LayoutError, LayoutStore, PartialElement};
use crate::hit::{self, HitPart};
use crate::input::{Button, DragSession, Gesture, InputState, Key, Modifiers, UiState, WheelDelta};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ElementUpdated { id: ElementId, fields: PartialElement },
    ElementDeleted { id: ElementId },
    LayoutCleared,
    SelectionChanged(Option<ElementId>),
    RenderNeeded,
}

/// Editor state: the layout, the view onto it, and the gesture in progress.
#[derive(Default)]
pub struct EngineCore {
    pub doc: LayoutStore,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Layout mutations ---

    /// Place a new court and select it.
    pub fn create_court(&mut self, color: CourtColor) -> Element {
        let element = self.doc.create_court(color);
        self.ui.selected_id = Some(element.id);
        element
    }

    /// Place a new zone and select it.
    pub fn create_zone(&mut self) -> Element {
        let element = self.doc.create_zone();
        self.ui.selected_id = Some(element.id);
        element
    }

    /// Shallow-merge fields into an element.
    ///
    /// # Errors
    ///
    /// Propagates the layout store's validation errors; nothing is applied on error.
    pub fn update(&mut self, id: &ElementId, fields: &PartialElement) -> Result<Vec<Action>, LayoutError> {
        self.doc.update(id, fields)?;
        Ok(vec![Action::ElementUpdated { id: *id, fields: fields.clone() }, Action::RenderNeeded])
    }

    /// Toggle an element between 0° and 90°.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub fn rotate(&mut self, id: &ElementId) -> Result<Vec<Action>, LayoutError> {
        let element = self.doc.rotate(id)?;
        let fields = PartialElement { rotation: Some(element.rotation), ..Default::default() };
        Ok(vec![Action::ElementUpdated { id: *id, fields }, Action::RenderNeeded])
    }

    /// Remove an element. A gesture or selection on it ends with it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub fn delete(&mut self, id: &ElementId) -> Result<Vec<Action>, LayoutError> {
        self.doc.delete(id)?;
        if matches!(&self.input, InputState::Dragging(session) if session.id == *id) {
            self.input = InputState::Idle;
        }
        let mut actions = vec![Action::ElementDeleted { id: *id }];
        if self.ui.selected_id.as_ref() == Some(id) {
            self.ui.selected_id = None;
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    /// Rotate the selected element, if any.
    pub fn rotate_selected(&mut self) -> Vec<Action> {
        match self.ui.selected_id {
            Some(id) => match self.rotate(&id) {
                Ok(actions) => actions,
                Err(LayoutError::NotFound(_)) => self.drop_stale_selection(),
                Err(LayoutError::UnsupportedField { .. } | LayoutError::InvalidValue { .. }) => Vec::new(),
            },
            None => Vec::new(),
        }
    }

    /// Delete the selected element, if any.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        match self.ui.selected_id {
            Some(id) => match self.delete(&id) {
                Ok(actions) => actions,
                Err(LayoutError::NotFound(_)) => self.drop_stale_selection(),
                Err(LayoutError::UnsupportedField { .. } | LayoutError::InvalidValue { .. }) => Vec::new(),
            },
            None => Vec::new(),
        }
    }

    /// Selection always names a live element; if it ever does not, clear it.
    fn drop_stale_selection(&mut self) -> Vec<Action> {
        self.ui.selected_id = None;
        vec![Action::SelectionChanged(None), Action::RenderNeeded]
    }

    /// Remove every element and reset numbering, selection and gesture.
    pub fn clear(&mut self) -> Vec<Action> {
        self.doc.clear();
        self.ui.selected_id = None;
        self.input = InputState::Idle;
        vec![Action::LayoutCleared, Action::SelectionChanged(None), Action::RenderNeeded]
    }

    /// Apply a whole press-drag-release of `screen_delta` pixels to one element
    /// at the current zoom, as if the pointer had made that gesture.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, `UnsupportedField` when resizing a court.
    pub fn drag_element(
        &mut self,
        id: &ElementId,
        gesture: Gesture,
        screen_delta: Point,
    ) -> Result<Vec<Action>, LayoutError> {
        let element = self.doc.get(id).ok_or(LayoutError::NotFound(*id))?;
        let session = DragSession::begin(element, gesture, Point::default())?;
        let fields = session.update_at(screen_delta, self.camera.zoom)?;
        self.doc.update(id, &fields)?;
        Ok(vec![Action::ElementUpdated { id: *id, fields }, Action::RenderNeeded])
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        match button {
            Button::Middle => {
                self.input = InputState::Panning { last_screen: screen_pt };
                Vec::new()
            }
            Button::Secondary => Vec::new(),
            Button::Primary => self.primary_down(screen_pt),
        }
    }

    fn primary_down(&mut self, screen_pt: Point) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        let Some(hit) = hit::hit_test(world, &self.doc, &self.camera, self.ui.selected_id) else {
            self.input = InputState::Panning { last_screen: screen_pt };
            if self.ui.selected_id.take().is_some() {
                return vec![Action::SelectionChanged(None), Action::RenderNeeded];
            }
            return Vec::new();
        };

        let gesture = match hit.part {
            HitPart::Body => Gesture::Move,
            HitPart::ResizeHandle(anchor) => Gesture::Resize(anchor),
        };
        let Some(element) = self.doc.get(&hit.element_id) else {
            return Vec::new();
        };
        if let Ok(session) = DragSession::begin(element, gesture, screen_pt) {
            self.input = InputState::Dragging(session);
        }

        if self.ui.selected_id == Some(hit.element_id) {
            return Vec::new();
        }
        self.ui.selected_id = Some(hit.element_id);
        vec![Action::SelectionChanged(Some(hit.element_id)), Action::RenderNeeded]
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        match &mut self.input {
            InputState::Idle => Vec::new(),
            InputState::Panning { last_screen } => {
                let delta = screen_pt - *last_screen;
                *last_screen = screen_pt;
                self.camera.pan_by(delta);
                vec![Action::RenderNeeded]
            }
            InputState::Dragging(session) => {
                let session = session.clone();
                self.apply_drag(&session, screen_pt)
            }
        }
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Dragging(session) => self.apply_drag(&session, screen_pt),
            InputState::Idle | InputState::Panning { .. } => Vec::new(),
        }
    }

    fn apply_drag(&mut self, session: &DragSession, screen_pt: Point) -> Vec<Action> {
        let applied = session
            .update_at(screen_pt, self.camera.zoom)
            .and_then(|fields| self.doc.update(&session.id, &fields).map(|_| fields));
        match applied {
            Ok(fields) => vec![Action::ElementUpdated { id: session.id, fields }, Action::RenderNeeded],
            Err(_) => {
                self.input = InputState::Idle;
                Vec::new()
            }
        }
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.ctrl || modifiers.meta {
            let factor = if delta.dy < 0.0 { ZOOM_WHEEL_STEP } else { 1.0 / ZOOM_WHEEL_STEP };
            self.camera.zoom_at(screen_pt, factor);
        } else {
            self.camera.pan_by(Point::new(-delta.dx, -delta.dy));
        }
        vec![Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        match key.0.as_str() {
            "Escape" => {
                self.input = InputState::Idle;
                if self.ui.selected_id.take().is_some() {
                    return vec![Action::SelectionChanged(None), Action::RenderNeeded];
                }
                Vec::new()
            }
            "Delete" | "Backspace" => self.delete_selected(),
            "r" | "R" => self.rotate_selected(),
            _ => Vec::new(),
        }
    }

    // --- Queries ---

    /// The currently selected element, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.ui.selected_id
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Look up an element by ID.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.doc.get(id)
    }

    /// All elements in insertion order.
    #[must_use]
    pub fn elements(&self) -> Vec<&Element> {
        self.doc.list()
    }
}
