//! Facility: the layout editor and the reservation store behind one API.
//!
//! The editor owns elements, the store owns reservations, and reservations
//! only point at courts by id. Every layout change goes through here so the
//! two stay consistent: when a court disappears (deleted, or the whole layout
//! cleared) its reservations go with it.

use std::fmt;
use std::str::FromStr;

use canvas::camera::Point;
use canvas::doc::{CourtColor, Element, ElementId, LayoutError, PartialElement};
use canvas::engine::{Action, EngineCore};
use canvas::hit::ResizeAnchor;
use canvas::input::Gesture;
use time::{Date, PrimitiveDateTime};
use tracing::{info, warn};
use uuid::Uuid;

use crate::availability;
use crate::config::PlannerConfig;
use crate::error::FacilityError;
use crate::reservation::{Interval, NewReservation, Reservation, ReservationId, ReservationStore};

#[cfg(test)]
#[path = "facility_test.rs"]
mod facility_test;

/// How a caller names an element: a court's display label or any element's id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRef {
    Label(u32),
    Id(ElementId),
}

impl FromStr for ElementRef {
    type Err = FacilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if let Ok(label) = raw.parse::<u32>() {
            return Ok(Self::Label(label));
        }
        Uuid::parse_str(raw)
            .map(Self::Id)
            .map_err(|_| FacilityError::UnknownCourt(raw.to_owned()))
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(label) => write!(f, "{label}"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

/// A court and whoever holds it at the queried instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourtStatus<'a> {
    pub court: &'a Element,
    pub reservation: Option<&'a Reservation>,
}

#[derive(Default)]
pub struct Facility {
    editor: EngineCore,
    reservations: ReservationStore,
}

impl Facility {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn editor(&self) -> &EngineCore {
        &self.editor
    }

    #[must_use]
    pub fn reservations(&self) -> &ReservationStore {
        &self.reservations
    }

    // =========================================================================
    // LAYOUT
    // =========================================================================

    pub fn create_court(&mut self, color: CourtColor) -> Element {
        let court = self.editor.create_court(color);
        info!(court_id = %court.id, label = court.label(), %color, "court created");
        court
    }

    pub fn create_zone(&mut self) -> Element {
        let zone = self.editor.create_zone();
        info!(zone_id = %zone.id, "zone created");
        zone
    }

    /// Run an editor operation (pointer, wheel, key) and reconcile what it did.
    pub fn edit(&mut self, op: impl FnOnce(&mut EngineCore) -> Vec<Action>) -> Vec<Action> {
        let actions = op(&mut self.editor);
        self.reconcile(&actions);
        actions
    }

    /// Shallow-merge fields into an element.
    ///
    /// # Errors
    ///
    /// Layout validation errors; nothing is applied on error.
    pub fn update_element(&mut self, id: &ElementId, fields: &PartialElement) -> Result<&Element, FacilityError> {
        let actions = self.editor.update(id, fields)?;
        self.reconcile(&actions);
        self.element(id)
    }

    /// Toggle an element between 0° and 90°.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id.
    pub fn rotate_element(&mut self, id: &ElementId) -> Result<&Element, FacilityError> {
        let actions = self.editor.rotate(id)?;
        self.reconcile(&actions);
        self.element(id)
    }

    /// Drag an element by `screen_delta` pixels at the current zoom.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id.
    pub fn move_element(&mut self, id: &ElementId, screen_delta: Point) -> Result<&Element, FacilityError> {
        let actions = self.editor.drag_element(id, Gesture::Move, screen_delta)?;
        self.reconcile(&actions);
        self.element(id)
    }

    /// Drag one of a zone's resize handles by `screen_delta` pixels.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, `UnsupportedField` for a court.
    pub fn resize_element(
        &mut self,
        id: &ElementId,
        anchor: ResizeAnchor,
        screen_delta: Point,
    ) -> Result<&Element, FacilityError> {
        let actions = self.editor.drag_element(id, Gesture::Resize(anchor), screen_delta)?;
        self.reconcile(&actions);
        self.element(id)
    }

    /// Set the view zoom, returning the value actually applied after clamping.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.editor.camera.set_zoom(zoom);
        self.editor.camera.zoom
    }

    /// Remove an element, and every reservation of it if it was a court.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id.
    pub fn delete_element(&mut self, id: &ElementId) -> Result<Vec<Reservation>, FacilityError> {
        let actions = self.editor.delete(id)?;
        Ok(self.reconcile(&actions))
    }

    /// Remove every element and every reservation. Court numbering restarts at 1.
    pub fn clear(&mut self) -> Vec<Reservation> {
        let actions = self.editor.clear();
        self.reconcile(&actions)
    }

    /// Apply the reservation side of layout actions; returns cascaded reservations.
    fn reconcile(&mut self, actions: &[Action]) -> Vec<Reservation> {
        let mut removed = Vec::new();
        for action in actions {
            match action {
                Action::ElementDeleted { id } => {
                    let cascaded = self.reservations.remove_for_resource(id);
                    info!(element_id = %id, reservations = cascaded.len(), "element deleted");
                    removed.extend(cascaded);
                }
                Action::LayoutCleared => {
                    let cascaded: Vec<_> = self.reservations.list().into_iter().cloned().collect();
                    self.reservations.clear();
                    info!(reservations = cascaded.len(), "layout cleared");
                    removed.extend(cascaded);
                }
                Action::ElementUpdated { .. } | Action::SelectionChanged(_) | Action::RenderNeeded => {}
            }
        }
        removed
    }

    #[must_use]
    pub fn elements(&self) -> Vec<&Element> {
        self.editor.elements()
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown id.
    pub fn element(&self, id: &ElementId) -> Result<&Element, FacilityError> {
        self.editor.element(id).ok_or_else(|| LayoutError::NotFound(*id).into())
    }

    /// Look up any element by label or id.
    ///
    /// # Errors
    ///
    /// `UnknownCourt` for an unused label, `NotFound` for an unknown id.
    pub fn resolve(&self, element: &ElementRef) -> Result<&Element, FacilityError> {
        match element {
            ElementRef::Label(label) => self
                .editor
                .doc
                .court_by_label(*label)
                .ok_or_else(|| FacilityError::UnknownCourt(label.to_string())),
            ElementRef::Id(id) => self.element(id),
        }
    }

    /// Like [`Self::resolve`], but the element must be a court.
    ///
    /// # Errors
    ///
    /// As `resolve`, plus `NotACourt` for a zone.
    pub fn resolve_court(&self, element: &ElementRef) -> Result<&Element, FacilityError> {
        let found = self.resolve(element)?;
        if found.is_court() { Ok(found) } else { Err(FacilityError::NotACourt(found.id)) }
    }

    fn court(&self, id: &ElementId) -> Result<&Element, FacilityError> {
        self.resolve_court(&ElementRef::Id(*id))
    }

    // =========================================================================
    // RESERVATIONS
    // =========================================================================

    /// Book a court.
    ///
    /// # Errors
    ///
    /// `NotFound`/`NotACourt` if the resource is not a live court, then the
    /// store's `InvalidInput` and `Conflict`.
    pub fn book(&mut self, new: NewReservation) -> Result<Reservation, FacilityError> {
        let label = self.court(&new.resource_id)?.label();
        match self.reservations.create(new) {
            Ok(reservation) => {
                info!(
                    reservation_id = %reservation.id,
                    court_id = %reservation.resource_id,
                    label,
                    start = %reservation.interval.start(),
                    end = %reservation.interval.end(),
                    "reservation created"
                );
                Ok(reservation)
            }
            Err(e) => {
                warn!(error = %e, label, "reservation rejected");
                Err(e.into())
            }
        }
    }

    /// Delete a reservation. Confirmation is the caller's business.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown or already deleted id.
    pub fn cancel(&mut self, id: ReservationId) -> Result<Reservation, FacilityError> {
        let reservation = self.reservations.delete(id)?;
        info!(reservation_id = %id, court_id = %reservation.resource_id, "reservation cancelled");
        Ok(reservation)
    }

    /// The reservation holding a court at `instant`.
    ///
    /// # Errors
    ///
    /// `NotFound`/`NotACourt` if `court_id` is not a live court.
    pub fn active_at(&self, court_id: &ElementId, instant: PrimitiveDateTime) -> Result<Option<&Reservation>, FacilityError> {
        self.court(court_id)?;
        Ok(self.reservations.active_at(court_id, instant))
    }

    /// Every court, in layout order, with its reservation at `instant`.
    #[must_use]
    pub fn status_at(&self, instant: PrimitiveDateTime) -> Vec<CourtStatus<'_>> {
        self.editor
            .doc
            .courts()
            .map(|court| CourtStatus { court, reservation: self.reservations.active_at(&court.id, instant) })
            .collect()
    }

    /// # Errors
    ///
    /// `NotFound`/`NotACourt` if `court_id` is not a live court.
    pub fn reservations_on(&self, court_id: &ElementId, date: Date) -> Result<Vec<&Reservation>, FacilityError> {
        self.court(court_id)?;
        Ok(self.reservations.on_date(court_id, date))
    }

    /// # Errors
    ///
    /// `NotFound`/`NotACourt` if `court_id` is not a live court.
    pub fn reservations_for(&self, court_id: &ElementId) -> Result<Vec<&Reservation>, FacilityError> {
        self.court(court_id)?;
        Ok(self.reservations.for_resource(court_id))
    }

    /// Courts free for the whole candidate slot, in layout order.
    #[must_use]
    pub fn available(&self, candidate: &Interval) -> Vec<&Element> {
        availability::find_available(self.editor.doc.list(), &self.reservations, candidate)
    }

    /// Free `minutes`-long slots on one court during opening hours of `date`.
    ///
    /// # Errors
    ///
    /// `NotFound`/`NotACourt` for a bad court, `InvalidInput` for a date at
    /// the calendar edge or an unrepresentable length.
    pub fn free_slots(
        &self,
        court_id: &ElementId,
        date: Date,
        minutes: i64,
        config: &PlannerConfig,
    ) -> Result<Vec<Interval>, FacilityError> {
        self.court(court_id)?;
        let window = config.day_window(date)?;
        Ok(availability::free_slots(
            &self.reservations,
            court_id,
            &window,
            availability::duration_minutes(minutes)?,
            config.slot_step(),
        ))
    }
}
