#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::consts::{MIN_SIZE, SPAWN_X, SPAWN_Y, ZONE_DEFAULT_SIZE, ZOOM_WHEEL_STEP};
use crate::hit::{ResizeAnchor, handle_position};

// =============================================================
// Helpers
// =============================================================

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn no_modifiers() -> Modifiers {
    Modifiers::default()
}

fn ctrl_modifier() -> Modifiers {
    Modifiers { ctrl: true, ..Default::default() }
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn key(name: &str) -> Key {
    Key(name.to_owned())
}

fn has_action<F>(actions: &[Action], pred: F) -> bool
where
    F: Fn(&Action) -> bool,
{
    actions.iter().any(pred)
}

fn has_render_needed(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::RenderNeeded))
}

fn has_element_updated(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::ElementUpdated { .. }))
}

fn spawn() -> Point {
    pt(SPAWN_X, SPAWN_Y)
}

// =============================================================
// Construction and layout mutations
// =============================================================

#[test]
fn core_new_is_empty_and_idle() {
    let core = EngineCore::new();
    assert!(core.selection().is_none());
    assert!(core.elements().is_empty());
    assert!(matches!(core.input, InputState::Idle));
    assert_eq!(core.camera().zoom, 1.0);
}

#[test]
fn create_court_selects_it() {
    let mut core = EngineCore::new();
    let court = core.create_court(CourtColor::Green);
    assert_eq!(core.selection(), Some(court.id));
    assert_eq!(core.element(&court.id), Some(&court));
    assert_eq!(court.label(), Some(1));
}

#[test]
fn create_zone_replaces_selection() {
    let mut core = EngineCore::new();
    core.create_court(CourtColor::Green);
    let zone = core.create_zone();
    assert_eq!(core.selection(), Some(zone.id));
}

#[test]
fn update_reports_fields() {
    let mut core = EngineCore::new();
    let id = core.create_zone().id;
    let fields = PartialElement { x: Some(5.0), ..Default::default() };
    let actions = core.update(&id, &fields).unwrap();
    assert_eq!(actions[0], Action::ElementUpdated { id, fields });
    assert_eq!(core.element(&id).unwrap().x, 5.0);
}

#[test]
fn rotate_reports_new_angle() {
    let mut core = EngineCore::new();
    let id = core.create_court(CourtColor::Blue).id;
    let actions = core.rotate(&id).unwrap();
    let expected = PartialElement { rotation: Some(90.0), ..Default::default() };
    assert_eq!(actions[0], Action::ElementUpdated { id, fields: expected });
}

#[test]
fn delete_clears_selection() {
    let mut core = EngineCore::new();
    let id = core.create_zone().id;
    let actions = core.delete(&id).unwrap();
    assert_eq!(actions[0], Action::ElementDeleted { id });
    assert!(has_action(&actions, |a| *a == Action::SelectionChanged(None)));
    assert!(core.selection().is_none());
    assert!(core.element(&id).is_none());
}

#[test]
fn delete_unknown_is_not_found() {
    let mut core = EngineCore::new();
    let id = Uuid::new_v4();
    assert_eq!(core.delete(&id).unwrap_err(), LayoutError::NotFound(id));
}

#[test]
fn clear_resets_everything() {
    let mut core = EngineCore::new();
    core.create_court(CourtColor::Blue);
    core.create_zone();
    let actions = core.clear();
    assert_eq!(actions[0], Action::LayoutCleared);
    assert!(core.elements().is_empty());
    assert!(core.selection().is_none());
}

#[test]
fn rotate_and_delete_selected_without_selection_do_nothing() {
    let mut core = EngineCore::new();
    assert!(core.rotate_selected().is_empty());
    assert!(core.delete_selected().is_empty());
}

#[test]
fn stale_selection_is_cleared_instead_of_ignored() {
    let mut core = EngineCore::new();
    core.ui.selected_id = Some(Uuid::new_v4());
    assert_eq!(core.rotate_selected(), vec![Action::SelectionChanged(None), Action::RenderNeeded]);
    assert!(core.selection().is_none());

    core.ui.selected_id = Some(Uuid::new_v4());
    assert_eq!(core.delete_selected(), vec![Action::SelectionChanged(None), Action::RenderNeeded]);
    assert!(core.selection().is_none());
}

// =============================================================
// drag_element
// =============================================================

#[test]
fn drag_element_move_respects_zoom() {
    let mut core = EngineCore::new();
    let id = core.create_court(CourtColor::Blue).id;
    core.camera.set_zoom(2.0);
    core.drag_element(&id, Gesture::Move, pt(40.0, -20.0)).unwrap();
    let court = core.element(&id).unwrap();
    assert!(approx_eq(court.x, SPAWN_X + 20.0));
    assert!(approx_eq(court.y, SPAWN_Y - 10.0));
}

#[test]
fn drag_element_resize_court_is_refused() {
    let mut core = EngineCore::new();
    let id = core.create_court(CourtColor::Blue).id;
    let err = core.drag_element(&id, Gesture::Resize(ResizeAnchor::E), pt(10.0, 0.0)).unwrap_err();
    assert!(matches!(err, LayoutError::UnsupportedField { .. }));
}

#[test]
fn drag_element_resize_zone() {
    let mut core = EngineCore::new();
    let id = core.create_zone().id;
    core.drag_element(&id, Gesture::Resize(ResizeAnchor::S), pt(0.0, 30.0)).unwrap();
    let zone = core.element(&id).unwrap();
    assert!(approx_eq(zone.height, ZONE_DEFAULT_SIZE + 30.0));
    assert!(approx_eq(zone.y, SPAWN_Y + 15.0));
}

#[test]
fn drag_element_non_finite_resize_leaves_zone_untouched() {
    let mut core = EngineCore::new();
    let before = core.create_zone();
    let err = core
        .drag_element(&before.id, Gesture::Resize(ResizeAnchor::E), pt(f64::NAN, 0.0))
        .unwrap_err();
    assert_eq!(err, LayoutError::InvalidValue { field: "x" });
    assert_eq!(core.element(&before.id), Some(&before));
}

#[test]
fn drag_element_non_finite_move_is_rejected() {
    let mut core = EngineCore::new();
    let before = core.create_court(CourtColor::Blue);
    assert!(core.drag_element(&before.id, Gesture::Move, pt(0.0, f64::INFINITY)).is_err());
    assert_eq!(core.element(&before.id), Some(&before));
}

// =============================================================
// Pointer gestures
// =============================================================

#[test]
fn press_on_body_selects_and_starts_move() {
    let mut core = EngineCore::new();
    let id = core.create_court(CourtColor::Blue).id;
    core.ui.selected_id = None;
    let actions = core.on_pointer_down(spawn(), Button::Primary, no_modifiers());
    assert_eq!(core.selection(), Some(id));
    assert!(has_action(&actions, |a| *a == Action::SelectionChanged(Some(id))));
    assert!(matches!(&core.input, InputState::Dragging(s) if s.gesture == Gesture::Move));
}

#[test]
fn drag_moves_from_snapshot_and_release_ends() {
    let mut core = EngineCore::new();
    let id = core.create_court(CourtColor::Blue).id;
    core.on_pointer_down(spawn(), Button::Primary, no_modifiers());

    let actions = core.on_pointer_move(pt(SPAWN_X + 10.0, SPAWN_Y), no_modifiers());
    assert!(has_element_updated(&actions));
    assert!(has_render_needed(&actions));
    core.on_pointer_move(pt(SPAWN_X + 25.0, SPAWN_Y + 5.0), no_modifiers());
    assert_eq!(core.element(&id).unwrap().x, SPAWN_X + 25.0);
    assert_eq!(core.element(&id).unwrap().y, SPAWN_Y + 5.0);

    let actions = core.on_pointer_up(pt(SPAWN_X + 25.0, SPAWN_Y + 5.0), Button::Primary, no_modifiers());
    assert!(has_element_updated(&actions));
    assert!(matches!(core.input, InputState::Idle));

    // Further moves do nothing once released.
    assert!(core.on_pointer_move(pt(0.0, 0.0), no_modifiers()).is_empty());
    assert_eq!(core.element(&id).unwrap().x, SPAWN_X + 25.0);
}

#[test]
fn drag_under_zoom_moves_half_as_far() {
    let mut core = EngineCore::new();
    let id = core.create_court(CourtColor::Blue).id;
    core.camera.set_zoom(2.0);
    let press = core.camera.world_to_screen(spawn());
    core.on_pointer_down(press, Button::Primary, no_modifiers());
    core.on_pointer_move(pt(press.x + 40.0, press.y), no_modifiers());
    assert!(approx_eq(core.element(&id).unwrap().x, SPAWN_X + 20.0));
}

#[test]
fn press_on_selected_zone_handle_starts_resize() {
    let mut core = EngineCore::new();
    let id = core.create_zone().id;
    let e = handle_position(core.element(&id).unwrap(), ResizeAnchor::E);
    core.on_pointer_down(e, Button::Primary, no_modifiers());
    assert!(matches!(
        &core.input,
        InputState::Dragging(s) if s.gesture == Gesture::Resize(ResizeAnchor::E)
    ));

    core.on_pointer_move(pt(e.x + 20.0, e.y), no_modifiers());
    let zone = core.element(&id).unwrap();
    assert!(approx_eq(zone.width, ZONE_DEFAULT_SIZE + 20.0));
    assert!(approx_eq(zone.x - zone.width / 2.0, SPAWN_X - ZONE_DEFAULT_SIZE / 2.0));
}

#[test]
fn resize_gesture_clamps_at_minimum() {
    let mut core = EngineCore::new();
    let id = core.create_zone().id;
    let w = handle_position(core.element(&id).unwrap(), ResizeAnchor::W);
    core.on_pointer_down(w, Button::Primary, no_modifiers());
    core.on_pointer_move(pt(w.x + 1000.0, w.y), no_modifiers());
    let zone = core.element(&id).unwrap();
    assert_eq!(zone.width, MIN_SIZE);
    assert!(approx_eq(zone.x + zone.width / 2.0, SPAWN_X + ZONE_DEFAULT_SIZE / 2.0));
}

#[test]
fn press_on_empty_space_deselects_and_pans() {
    let mut core = EngineCore::new();
    core.create_zone();
    let actions = core.on_pointer_down(pt(-500.0, -500.0), Button::Primary, no_modifiers());
    assert!(core.selection().is_none());
    assert!(has_action(&actions, |a| *a == Action::SelectionChanged(None)));
    assert!(matches!(core.input, InputState::Panning { .. }));

    core.on_pointer_move(pt(-490.0, -495.0), no_modifiers());
    assert_eq!(core.camera().pan_x, 10.0);
    assert_eq!(core.camera().pan_y, 5.0);
}

#[test]
fn middle_button_pans_even_over_elements() {
    let mut core = EngineCore::new();
    core.create_court(CourtColor::Blue);
    core.on_pointer_down(spawn(), Button::Middle, no_modifiers());
    assert!(matches!(core.input, InputState::Panning { .. }));
}

#[test]
fn secondary_button_is_ignored() {
    let mut core = EngineCore::new();
    core.create_court(CourtColor::Blue);
    assert!(core.on_pointer_down(spawn(), Button::Secondary, no_modifiers()).is_empty());
    assert!(matches!(core.input, InputState::Idle));
}

#[test]
fn deleting_dragged_element_ends_gesture() {
    let mut core = EngineCore::new();
    let id = core.create_zone().id;
    core.on_pointer_down(spawn(), Button::Primary, no_modifiers());
    core.delete(&id).unwrap();
    assert!(matches!(core.input, InputState::Idle));
    assert!(core.on_pointer_move(pt(0.0, 0.0), no_modifiers()).is_empty());
}

// =============================================================
// Wheel
// =============================================================

#[test]
fn wheel_with_ctrl_zooms_in() {
    let mut core = EngineCore::new();
    core.on_wheel(pt(100.0, 100.0), WheelDelta { dx: 0.0, dy: -1.0 }, ctrl_modifier());
    assert!(approx_eq(core.camera().zoom, ZOOM_WHEEL_STEP));
}

#[test]
fn wheel_without_modifier_pans() {
    let mut core = EngineCore::new();
    let actions = core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 3.0, dy: 7.0 }, no_modifiers());
    assert!(has_render_needed(&actions));
    assert_eq!(core.camera().pan_x, -3.0);
    assert_eq!(core.camera().pan_y, -7.0);
    assert_eq!(core.camera().zoom, 1.0);
}

// =============================================================
// Keyboard
// =============================================================

#[test]
fn escape_cancels_gesture_without_rollback() {
    let mut core = EngineCore::new();
    let id = core.create_court(CourtColor::Blue).id;
    core.on_pointer_down(spawn(), Button::Primary, no_modifiers());
    core.on_pointer_move(pt(SPAWN_X + 10.0, SPAWN_Y), no_modifiers());
    core.on_key_down(&key("Escape"), no_modifiers());
    assert!(matches!(core.input, InputState::Idle));
    assert!(core.selection().is_none());
    assert_eq!(core.element(&id).unwrap().x, SPAWN_X + 10.0);
}

#[test]
fn delete_key_removes_selection() {
    let mut core = EngineCore::new();
    let id = core.create_court(CourtColor::Blue).id;
    let actions = core.on_key_down(&key("Delete"), no_modifiers());
    assert_eq!(actions[0], Action::ElementDeleted { id });
    assert!(core.elements().is_empty());
}

#[test]
fn r_key_rotates_selection() {
    let mut core = EngineCore::new();
    let id = core.create_court(CourtColor::Blue).id;
    core.on_key_down(&key("r"), no_modifiers());
    assert_eq!(core.element(&id).unwrap().rotation, 90.0);
    core.on_key_down(&key("R"), no_modifiers());
    assert_eq!(core.element(&id).unwrap().rotation, 0.0);
}

#[test]
fn unknown_key_does_nothing() {
    let mut core = EngineCore::new();
    core.create_zone();
    assert!(core.on_key_down(&key("q"), no_modifiers()).is_empty());
}

#[test]
fn non_finite_pointer_during_resize_ends_drag_without_change() {
    let mut core = EngineCore::new();
    let before = core.create_zone();
    let e = handle_position(&before, ResizeAnchor::E);
    core.on_pointer_down(e, Button::Primary, no_modifiers());
    assert!(core.on_pointer_move(pt(f64::NAN, e.y), no_modifiers()).is_empty());
    assert!(matches!(core.input, InputState::Idle));
    assert_eq!(core.element(&before.id), Some(&before));
}
