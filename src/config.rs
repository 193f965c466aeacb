//! Planner configuration from environment variables.
//!
//! - `COURTPLAN_DURATIONS`: comma-separated booking lengths in minutes
//!   (default `60,90,120`)
//! - `COURTPLAN_OPEN_HOUR` / `COURTPLAN_CLOSE_HOUR`: the daily window searched
//!   for free slots (defaults 8 and 23; close may be 24)
//! - `COURTPLAN_SLOT_STEP_MINUTES`: spacing of free-slot starts (default 30)

use time::{Date, Duration};

use crate::reservation::{Interval, ReservationError};

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DURATIONS_VAR: &str = "COURTPLAN_DURATIONS";
pub const OPEN_HOUR_VAR: &str = "COURTPLAN_OPEN_HOUR";
pub const CLOSE_HOUR_VAR: &str = "COURTPLAN_CLOSE_HOUR";
pub const SLOT_STEP_VAR: &str = "COURTPLAN_SLOT_STEP_MINUTES";

pub const DEFAULT_DURATIONS: [u32; 3] = [60, 90, 120];
pub const DEFAULT_OPEN_HOUR: u8 = 8;
pub const DEFAULT_CLOSE_HOUR: u8 = 23;
pub const DEFAULT_SLOT_STEP_MINUTES: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Booking lengths offered to clients, in minutes.
    pub durations: Vec<u32>,
    pub open_hour: u8,
    pub close_hour: u8,
    pub slot_step_minutes: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            durations: DEFAULT_DURATIONS.to_vec(),
            open_hour: DEFAULT_OPEN_HOUR,
            close_hour: DEFAULT_CLOSE_HOUR,
            slot_step_minutes: DEFAULT_SLOT_STEP_MINUTES,
        }
    }
}

impl PlannerConfig {
    /// Build from `COURTPLAN_*` variables, falling back to defaults for unset ones.
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable does not parse or the hours do not
    /// form a window inside one day.
    pub fn from_env() -> Result<Self, ConfigError> {
        let durations = parse_durations(env(DURATIONS_VAR).as_deref())?;
        let open_hour = parse_hour(OPEN_HOUR_VAR, env(OPEN_HOUR_VAR).as_deref(), DEFAULT_OPEN_HOUR)?;
        let close_hour = parse_hour(CLOSE_HOUR_VAR, env(CLOSE_HOUR_VAR).as_deref(), DEFAULT_CLOSE_HOUR)?;
        let slot_step_minutes = parse_minutes(SLOT_STEP_VAR, env(SLOT_STEP_VAR).as_deref(), DEFAULT_SLOT_STEP_MINUTES)?;
        if open_hour >= close_hour {
            return Err(ConfigError::Invalid {
                var: CLOSE_HOUR_VAR,
                message: format!("closing hour {close_hour} must be after opening hour {open_hour}"),
            });
        }
        Ok(Self { durations, open_hour, close_hour, slot_step_minutes })
    }

    #[must_use]
    pub fn allows_duration(&self, minutes: i64) -> bool {
        self.durations.iter().any(|&d| i64::from(d) == minutes)
    }

    #[must_use]
    pub fn slot_step(&self) -> Duration {
        Duration::minutes(i64::from(self.slot_step_minutes))
    }

    /// Opening hours on `date`, the window searched for free slots.
    ///
    /// # Errors
    ///
    /// `InvalidInput` at the edge of the calendar, `InvalidInterval` if the
    /// hours were set up with open not before close.
    pub fn day_window(&self, date: Date) -> Result<Interval, ReservationError> {
        let midnight = date.midnight();
        let at = |hour: u8| {
            midnight
                .checked_add(Duration::hours(i64::from(hour)))
                .ok_or_else(|| ReservationError::InvalidInput(format!("{date} is out of range")))
        };
        Interval::new(at(self.open_hour)?, at(self.close_hour)?)
    }
}

fn env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_durations(raw: Option<&str>) -> Result<Vec<u32>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_DURATIONS.to_vec());
    };
    let mut durations = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let minutes = parse_minutes(DURATIONS_VAR, Some(part), 0)?;
        if !durations.contains(&minutes) {
            durations.push(minutes);
        }
    }
    if durations.is_empty() {
        return Err(ConfigError::Invalid { var: DURATIONS_VAR, message: "no durations listed".into() });
    }
    Ok(durations)
}

fn parse_hour(var: &'static str, raw: Option<&str>, default: u8) -> Result<u8, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<u8>() {
        Ok(hour) if hour <= 24 => Ok(hour),
        _ => Err(ConfigError::Invalid { var, message: format!("expected an hour 0-24, got {raw:?}") }),
    }
}

fn parse_minutes(var: &'static str, raw: Option<&str>, default: u32) -> Result<u32, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<u32>() {
        Ok(minutes) if minutes > 0 => Ok(minutes),
        _ => Err(ConfigError::Invalid { var, message: format!("expected positive minutes, got {raw:?}") }),
    }
}
