//! Reservations: half-open booking intervals and the per-court conflict rule.
//!
//! A reservation holds a court for `[start, end)`. Two intervals overlap iff
//! `s1 < e2 && e1 > s2`, so a booking ending at 11:00 and one starting at
//! 11:00 never conflict. The store keeps the invariant that no two
//! reservations for the same court overlap; `create` checks and inserts in one
//! `&mut self` call, so nothing can slip in between.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use canvas::doc::ElementId;
use serde::{Deserialize, Serialize};
use time::{Date, Duration, PrimitiveDateTime};

#[cfg(test)]
#[path = "reservation_test.rs"]
mod reservation_test;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReservationError {
    #[error("invalid interval: end {end} is not after start {start}")]
    InvalidInterval { start: PrimitiveDateTime, end: PrimitiveDateTime },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("court {resource_id} is already booked at that time (reservation {existing})")]
    Conflict { resource_id: ElementId, existing: ReservationId },
    #[error("reservation not found: {0}")]
    NotFound(ReservationId),
}

// =============================================================================
// VALUE TYPES
// =============================================================================

/// Store-assigned reservation number, starting at 1 and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(pub u64);

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReservationId {
    type Err = ReservationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().trim_start_matches('#');
        raw.parse()
            .map(Self)
            .map_err(|_| ReservationError::InvalidInput(format!("invalid reservation id: {s:?}")))
    }
}

/// A half-open time range `[start, end)` with `start < end`.
///
/// The fields are private so an empty or inverted interval cannot exist;
/// deserialization goes through the same check as [`Interval::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    start: PrimitiveDateTime,
    end: PrimitiveDateTime,
}

#[derive(Deserialize)]
struct RawInterval {
    start: PrimitiveDateTime,
    end: PrimitiveDateTime,
}

impl TryFrom<RawInterval> for Interval {
    type Error = ReservationError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl Interval {
    /// # Errors
    ///
    /// `InvalidInterval` unless `start < end`.
    pub fn new(start: PrimitiveDateTime, end: PrimitiveDateTime) -> Result<Self, ReservationError> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(ReservationError::InvalidInterval { start, end })
        }
    }

    /// `[start, start + duration)`.
    ///
    /// # Errors
    ///
    /// `InvalidInterval` for a zero or negative duration, `InvalidInput` when
    /// the end falls outside the representable calendar.
    pub fn starting_at(start: PrimitiveDateTime, duration: Duration) -> Result<Self, ReservationError> {
        let end = start
            .checked_add(duration)
            .ok_or_else(|| ReservationError::InvalidInput(format!("interval end out of range: {start} + {duration}")))?;
        Self::new(start, end)
    }

    #[must_use]
    pub fn start(&self) -> PrimitiveDateTime {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> PrimitiveDateTime {
        self.end
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// The overlap predicate. Touching intervals do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// `start <= instant < end`.
    #[must_use]
    pub fn contains(&self, instant: PrimitiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Whether any part of the interval falls on `date`.
    #[must_use]
    pub fn touches_date(&self, date: Date) -> bool {
        let day_start = date.midnight();
        let day_end = date.next_day().map(Date::midnight);
        self.end > day_start && day_end.is_none_or(|end| self.start < end)
    }
}

/// Non-negative amount in minor units (cents).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deposit(u64);

impl Deposit {
    #[must_use]
    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub fn cents(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Deposit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Deposit {
    type Err = ReservationError;

    /// Accepts `12`, `12.5` and `12.50`. Signs, exponents and more than two
    /// decimals are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ReservationError::InvalidInput(format!("invalid deposit amount: {s:?}"));
        let raw = s.trim();
        let (whole, frac) = match raw.split_once('.') {
            Some((whole, frac)) if !frac.is_empty() => (whole, frac),
            Some(_) => return Err(invalid()),
            None => (raw, ""),
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || frac.len() > 2 || !all_digits(frac) {
            return Err(invalid());
        }

        let whole: u64 = whole.parse().map_err(|_| invalid())?;
        let frac: u64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };
        whole
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(frac))
            .map(Self)
            .ok_or_else(invalid)
    }
}

// =============================================================================
// RESERVATIONS
// =============================================================================

/// Input to [`ReservationStore::create`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewReservation {
    pub resource_id: ElementId,
    pub interval: Interval,
    pub client_name: String,
    pub deposit: Deposit,
}

/// A committed booking of one court.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    /// The booked court. Not owned; the facility keeps it pointing at a live court.
    pub resource_id: ElementId,
    pub interval: Interval,
    pub client_name: String,
    pub deposit: Deposit,
}

/// Every reservation of the facility, keyed by id.
#[derive(Debug, Default)]
pub struct ReservationStore {
    reservations: BTreeMap<ReservationId, Reservation>,
    last_id: u64,
}

impl ReservationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a reservation if its court is free for the whole interval.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank client name, `Conflict` naming the first
    /// overlapping reservation on the same court. Nothing is stored on error.
    pub fn create(&mut self, new: NewReservation) -> Result<Reservation, ReservationError> {
        let client_name = new.client_name.trim();
        if client_name.is_empty() {
            return Err(ReservationError::InvalidInput("client name is required".into()));
        }
        if let Some(existing) = self.overlapping(&new.resource_id, &new.interval).next() {
            return Err(ReservationError::Conflict { resource_id: new.resource_id, existing: existing.id });
        }

        self.last_id += 1;
        let reservation = Reservation {
            id: ReservationId(self.last_id),
            resource_id: new.resource_id,
            interval: new.interval,
            client_name: client_name.to_owned(),
            deposit: new.deposit,
        };
        self.reservations.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    /// Remove a reservation and return it.
    ///
    /// # Errors
    ///
    /// `NotFound` if no reservation has this id; the store is unchanged.
    pub fn delete(&mut self, id: ReservationId) -> Result<Reservation, ReservationError> {
        self.reservations.remove(&id).ok_or(ReservationError::NotFound(id))
    }

    #[must_use]
    pub fn get(&self, id: ReservationId) -> Option<&Reservation> {
        self.reservations.get(&id)
    }

    /// All reservations in creation order.
    #[must_use]
    pub fn list(&self) -> Vec<&Reservation> {
        self.reservations.values().collect()
    }

    /// The reservation holding `resource_id` at `instant`, if any.
    #[must_use]
    pub fn active_at(&self, resource_id: &ElementId, instant: PrimitiveDateTime) -> Option<&Reservation> {
        self.reservations
            .values()
            .find(|r| r.resource_id == *resource_id && r.interval.contains(instant))
    }

    /// Every reservation of one court, earliest first.
    #[must_use]
    pub fn for_resource(&self, resource_id: &ElementId) -> Vec<&Reservation> {
        sorted_by_start(self.reservations.values().filter(|r| r.resource_id == *resource_id))
    }

    /// Reservations of one court that fall at least partly on `date`, earliest first.
    #[must_use]
    pub fn on_date(&self, resource_id: &ElementId, date: Date) -> Vec<&Reservation> {
        sorted_by_start(
            self.reservations
                .values()
                .filter(|r| r.resource_id == *resource_id && r.interval.touches_date(date)),
        )
    }

    /// Reservations of one court that overlap `interval`.
    pub fn overlapping<'a>(
        &'a self,
        resource_id: &'a ElementId,
        interval: &'a Interval,
    ) -> impl Iterator<Item = &'a Reservation> + 'a {
        self.reservations
            .values()
            .filter(move |r| r.resource_id == *resource_id && r.interval.overlaps(interval))
    }

    #[must_use]
    pub fn is_free(&self, resource_id: &ElementId, interval: &Interval) -> bool {
        self.overlapping(resource_id, interval).next().is_none()
    }

    /// Drop every reservation of one court, returning what was removed.
    pub fn remove_for_resource(&mut self, resource_id: &ElementId) -> Vec<Reservation> {
        let (removed, kept): (BTreeMap<_, _>, BTreeMap<_, _>) = std::mem::take(&mut self.reservations)
            .into_iter()
            .partition(|(_, r)| r.resource_id == *resource_id);
        self.reservations = kept;
        removed.into_values().collect()
    }

    /// Drop every reservation. Ids keep counting up.
    pub fn clear(&mut self) -> usize {
        let removed = self.reservations.len();
        self.reservations.clear();
        removed
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }
}

fn sorted_by_start<'a>(reservations: impl Iterator<Item = &'a Reservation>) -> Vec<&'a Reservation> {
    let mut found: Vec<_> = reservations.collect();
    found.sort_by_key(|r| (r.interval.start(), r.id));
    found
}
