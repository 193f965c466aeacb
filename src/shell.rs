//! Line-oriented command shell over a [`Facility`].
//!
//! One command per line; blank lines and `#` comments are skipped. Each line
//! is parsed with clap, so `help` and `<command> --help` work as usual. A
//! failing command prints `error [CODE]: message` and the script carries on;
//! only I/O errors stop a run.

use std::io::{BufRead, Write};

use canvas::camera::Point;
use canvas::doc::{CourtColor, Element};
use canvas::hit::ResizeAnchor;
use clap::{Parser, Subcommand};
use time::macros::format_description;
use time::{Date, PrimitiveDateTime, Time};
use tracing::{info, warn};

use crate::availability;
use crate::config::PlannerConfig;
use crate::error::{ErrorCode, FacilityError};
use crate::facility::{ElementRef, Facility};
use crate::reservation::{Deposit, Interval, NewReservation, Reservation, ReservationError, ReservationId};

#[cfg(test)]
#[path = "shell_test.rs"]
mod shell_test;

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Facility(#[from] FacilityError),
    #[error("json encode failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ReservationError> for ShellError {
    fn from(e: ReservationError) -> Self {
        Self::Facility(e.into())
    }
}

impl ErrorCode for ShellError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "E_IO",
            Self::Usage(_) => "E_INVALID_INPUT",
            Self::Facility(e) => e.error_code(),
            Self::Json(_) => "E_INTERNAL",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "courtplan", no_binary_name = true, disable_version_flag = true)]
struct CommandLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Place a new court: blue, green, terracotta, purple or gray.
    Court { color: CourtColor },
    /// Place a new resizable zone.
    Zone,
    /// Show every element in placement order.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Toggle an element between 0 and 90 degrees.
    Rotate { element: ElementRef },
    /// Remove an element; a court takes its reservations with it.
    Delete { element: ElementRef },
    /// Remove every element and reservation.
    Clear,
    /// Set the view zoom used by move and resize.
    Zoom { factor: f64 },
    /// Drag an element by a screen-space offset.
    Move {
        element: ElementRef,
        #[arg(allow_negative_numbers = true)]
        dx: f64,
        #[arg(allow_negative_numbers = true)]
        dy: f64,
    },
    /// Drag a zone's resize handle (n, ne, e, se, s, sw, w, nw).
    Resize {
        element: ElementRef,
        handle: ResizeAnchor,
        #[arg(allow_negative_numbers = true)]
        dx: f64,
        #[arg(allow_negative_numbers = true)]
        dy: f64,
    },
    /// Book a court for a client.
    Book {
        court: ElementRef,
        #[arg(value_parser = parse_date)]
        date: Date,
        #[arg(value_parser = parse_time)]
        time: Time,
        minutes: i64,
        #[arg(required = true, num_args = 1..)]
        client: Vec<String>,
        #[arg(long)]
        deposit: Option<Deposit>,
    },
    /// Delete a reservation. Needs --yes.
    Cancel {
        id: ReservationId,
        #[arg(long)]
        yes: bool,
    },
    /// Who holds each court at a moment.
    Status {
        #[arg(value_parser = parse_date)]
        date: Date,
        #[arg(value_parser = parse_time)]
        time: Time,
    },
    /// Courts free for a whole slot.
    Available {
        #[arg(value_parser = parse_date)]
        date: Date,
        #[arg(value_parser = parse_time)]
        time: Time,
        minutes: i64,
    },
    /// Free slots of a given length on one court during opening hours.
    Slots {
        court: ElementRef,
        #[arg(value_parser = parse_date)]
        date: Date,
        minutes: i64,
    },
    /// Reservations of one court, optionally for one day.
    Bookings {
        court: ElementRef,
        #[arg(value_parser = parse_date)]
        date: Option<Date>,
        #[arg(long)]
        json: bool,
    },
}

fn parse_date(raw: &str) -> Result<Date, String> {
    Date::parse(raw, format_description!("[year]-[month]-[day]")).map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn parse_time(raw: &str) -> Result<Time, String> {
    Time::parse(raw, format_description!("[hour]:[minute]")).map_err(|e| format!("expected HH:MM: {e}"))
}

/// Counts from one [`Shell::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub executed: usize,
    pub failed: usize,
}

pub struct Shell {
    facility: Facility,
    config: PlannerConfig,
}

impl Shell {
    #[must_use]
    pub fn new(config: PlannerConfig) -> Self {
        Self { facility: Facility::new(), config }
    }

    #[must_use]
    pub fn facility(&self) -> &Facility {
        &self.facility
    }

    /// Execute every line of `input`, writing results to `out`.
    ///
    /// # Errors
    ///
    /// Only I/O failures; command failures are reported inline and counted.
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write, echo: bool) -> Result<RunSummary, std::io::Error> {
        let mut summary = RunSummary::default();
        for line in input.lines() {
            let line = line?;
            let command = line.trim();
            if command.is_empty() || command.starts_with('#') {
                continue;
            }
            if echo {
                writeln!(out, "> {command}")?;
            }
            summary.executed += 1;
            match self.execute(command, out) {
                Ok(()) => {}
                Err(ShellError::Io(e)) => return Err(e),
                Err(e) => {
                    summary.failed += 1;
                    warn!(command, code = e.error_code(), error = %e, "command failed");
                    writeln!(out, "error [{}]: {e}", e.error_code())?;
                }
            }
        }
        info!(executed = summary.executed, failed = summary.failed, "script finished");
        Ok(summary)
    }

    /// Execute one command line.
    ///
    /// # Errors
    ///
    /// `Usage` for lines that do not parse, otherwise the facility's error.
    pub fn execute(&mut self, line: &str, out: &mut impl Write) -> Result<(), ShellError> {
        let parsed = match CommandLine::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => parsed,
            Err(e) if matches!(e.kind(), clap::error::ErrorKind::DisplayHelp) => {
                write!(out, "{}", e.render())?;
                return Ok(());
            }
            Err(e) => return Err(ShellError::Usage(e.render().to_string().trim_end().to_owned())),
        };

        match parsed.command {
            Command::Court { color } => {
                let court = self.facility.create_court(color);
                writeln!(out, "created {} ({color}, {}) {}", describe(&court), court.surface().unwrap_or("-"), court.id)?;
            }
            Command::Zone => {
                let zone = self.facility.create_zone();
                writeln!(out, "created {}", describe(&zone))?;
            }
            Command::List { json } => self.list(json, out)?,
            Command::Rotate { element } => {
                let id = self.facility.resolve(&element)?.id;
                let rotated = self.facility.rotate_element(&id)?;
                writeln!(out, "{} rotated to {}", describe(rotated), rotated.rotation)?;
            }
            Command::Delete { element } => {
                let found = self.facility.resolve(&element)?.clone();
                let cascaded = self.facility.delete_element(&found.id)?;
                writeln!(out, "deleted {} ({} reservations cancelled)", describe(&found), cascaded.len())?;
            }
            Command::Clear => {
                let cascaded = self.facility.clear();
                writeln!(out, "cleared layout ({} reservations cancelled)", cascaded.len())?;
            }
            Command::Zoom { factor } => {
                let zoom = self.facility.set_zoom(factor);
                writeln!(out, "zoom {zoom}")?;
            }
            Command::Move { element, dx, dy } => {
                let id = self.facility.resolve(&element)?.id;
                let moved = self.facility.move_element(&id, Point::new(dx, dy))?;
                writeln!(out, "{}", placement(moved))?;
            }
            Command::Resize { element, handle, dx, dy } => {
                let id = self.facility.resolve(&element)?.id;
                let resized = self.facility.resize_element(&id, handle, Point::new(dx, dy))?;
                writeln!(out, "{}", placement(resized))?;
            }
            Command::Book { court, date, time, minutes, client, deposit } => {
                self.book(&court, PrimitiveDateTime::new(date, time), minutes, client.join(" "), deposit, out)?;
            }
            Command::Cancel { id, yes } => self.cancel(id, yes, out)?,
            Command::Status { date, time } => {
                for status in self.facility.status_at(PrimitiveDateTime::new(date, time)) {
                    match status.reservation {
                        Some(r) => writeln!(
                            out,
                            "{}: booked by {} until {} (#{})",
                            describe(status.court),
                            r.client_name,
                            clock(r.interval.end()),
                            r.id
                        )?,
                        None => writeln!(out, "{}: free", describe(status.court))?,
                    }
                }
            }
            Command::Available { date, time, minutes } => {
                let slot = availability::candidate(PrimitiveDateTime::new(date, time), minutes)?;
                let courts: Vec<_> = self.facility.available(&slot).into_iter().map(describe).collect();
                if courts.is_empty() {
                    writeln!(out, "no courts available for {}", span(&slot))?;
                } else {
                    writeln!(out, "available for {}: {}", span(&slot), courts.join(", "))?;
                }
            }
            Command::Slots { court, date, minutes } => {
                let court = self.facility.resolve_court(&court)?;
                let slots = self.facility.free_slots(&court.id, date, minutes, &self.config)?;
                if slots.is_empty() {
                    writeln!(out, "no free {minutes}-minute slots on {} for {date}", describe(court))?;
                }
                for slot in slots {
                    writeln!(out, "{}-{}", clock(slot.start()), clock(slot.end()))?;
                }
            }
            Command::Bookings { court, date, json } => {
                let court = self.facility.resolve_court(&court)?;
                let reservations = match date {
                    Some(date) => self.facility.reservations_on(&court.id, date)?,
                    None => self.facility.reservations_for(&court.id)?,
                };
                if json {
                    writeln!(out, "{}", serde_json::to_string_pretty(&reservations)?)?;
                } else if reservations.is_empty() {
                    writeln!(out, "no bookings for {}", describe(court))?;
                } else {
                    for r in reservations {
                        writeln!(out, "{}", booking_line(r))?;
                    }
                }
            }
        }
        Ok(())
    }

    fn list(&self, json: bool, out: &mut impl Write) -> Result<(), ShellError> {
        let elements = self.facility.elements();
        if json {
            writeln!(out, "{}", serde_json::to_string_pretty(&elements)?)?;
        } else if elements.is_empty() {
            writeln!(out, "no elements")?;
        } else {
            for element in elements {
                writeln!(out, "{}", placement(element))?;
            }
        }
        Ok(())
    }

    fn book(
        &mut self,
        court: &ElementRef,
        start: PrimitiveDateTime,
        minutes: i64,
        client_name: String,
        deposit: Option<Deposit>,
        out: &mut impl Write,
    ) -> Result<(), ShellError> {
        if !self.config.allows_duration(minutes) {
            let offered: Vec<_> = self.config.durations.iter().map(u32::to_string).collect();
            return Err(ReservationError::InvalidInput(format!(
                "{minutes} minutes is not a bookable duration (choose {})",
                offered.join(", ")
            ))
            .into());
        }
        let resource_id = self.facility.resolve_court(court)?.id;
        let interval = availability::candidate(start, minutes)?;
        let reservation = self.facility.book(NewReservation {
            resource_id,
            interval,
            client_name,
            deposit: deposit.unwrap_or_default(),
        })?;
        writeln!(out, "booked {}", booking_line(&reservation))?;
        Ok(())
    }

    fn cancel(&mut self, id: ReservationId, confirmed: bool, out: &mut impl Write) -> Result<(), ShellError> {
        if !confirmed {
            let pending = self.facility.reservations().get(id).ok_or(ReservationError::NotFound(id))?;
            writeln!(out, "cancel {}? re-run as `cancel {id} --yes` to confirm", booking_line(pending))?;
            return Ok(());
        }
        let cancelled = self.facility.cancel(id)?;
        writeln!(out, "cancelled {}", booking_line(&cancelled))?;
        Ok(())
    }
}

fn describe(element: &Element) -> String {
    match element.label() {
        Some(label) => format!("court {label}"),
        None => format!("zone {}", element.id),
    }
}

fn placement(element: &Element) -> String {
    format!(
        "{} at ({}, {}) size {}x{} rotation {}",
        describe(element),
        element.x,
        element.y,
        element.width,
        element.height,
        element.rotation
    )
}

fn clock(instant: PrimitiveDateTime) -> String {
    format!("{:02}:{:02}", instant.hour(), instant.minute())
}

fn span(interval: &Interval) -> String {
    format!("{} {}-{}", interval.start().date(), clock(interval.start()), clock(interval.end()))
}

fn booking_line(r: &Reservation) -> String {
    format!("#{} {} {} deposit {}", r.id, span(&r.interval), r.client_name, r.deposit)
}
