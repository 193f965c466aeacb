//! Availability: which courts are free for a candidate slot, and the inverse
//! view of which slots are free on one court.
//!
//! Both answers are derived from the reservation store on demand; nothing is
//! cached, so they are always consistent with the latest bookings.

use canvas::doc::{Element, ElementId};
use time::{Duration, PrimitiveDateTime};

use crate::reservation::{Interval, ReservationError, ReservationStore};

#[cfg(test)]
#[path = "availability_test.rs"]
mod availability_test;

/// `minutes` as a [`Duration`].
///
/// # Errors
///
/// `InvalidInput` when the length does not fit a `Duration`.
pub fn duration_minutes(minutes: i64) -> Result<Duration, ReservationError> {
    minutes
        .checked_mul(60)
        .map(Duration::seconds)
        .ok_or_else(|| ReservationError::InvalidInput(format!("duration of {minutes} minutes is out of range")))
}

/// The candidate slot `[start, start + minutes)`.
///
/// # Errors
///
/// `InvalidInterval` for a zero or negative duration, `InvalidInput` for one
/// too long to represent.
pub fn candidate(start: PrimitiveDateTime, minutes: i64) -> Result<Interval, ReservationError> {
    Interval::starting_at(start, duration_minutes(minutes)?)
}

/// Courts among `resources` with no reservation overlapping `candidate`, in
/// input order. Zones are skipped; only courts can be booked.
pub fn find_available<'a>(
    resources: impl IntoIterator<Item = &'a Element>,
    reservations: &ReservationStore,
    candidate: &Interval,
) -> Vec<&'a Element> {
    resources
        .into_iter()
        .filter(|element| element.is_court() && reservations.is_free(&element.id, candidate))
        .collect()
}

/// Every `[t, t + duration)` inside `window`, with `t` stepping from the
/// window start by `step`, that is free on `resource_id`.
///
/// A non-positive `duration` or `step` yields no slots.
#[must_use]
pub fn free_slots(
    reservations: &ReservationStore,
    resource_id: &ElementId,
    window: &Interval,
    duration: Duration,
    step: Duration,
) -> Vec<Interval> {
    if !duration.is_positive() || !step.is_positive() {
        return Vec::new();
    }

    let mut slots = Vec::new();
    let mut start = window.start();
    while let Ok(slot) = Interval::starting_at(start, duration) {
        if slot.end() > window.end() {
            break;
        }
        if reservations.is_free(resource_id, &slot) {
            slots.push(slot);
        }
        match start.checked_add(step) {
            Some(next) => start = next,
            None => break,
        }
    }
    slots
}
