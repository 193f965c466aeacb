//! Court planner: a facility layout editor with court reservations.
//!
//! The layout side (elements, geometry, gestures) lives in the `canvas` crate.
//! This crate adds what turns a floor plan into a bookable facility:
//!
//! | Module         | Responsibility                                              |
//! |----------------|-------------------------------------------------------------|
//! | `reservation`  | Half-open intervals, the overlap rule, the reservation store |
//! | `availability` | Which courts are free for a slot, and free-slot search      |
//! | `facility`     | Editor + reservations kept consistent behind one API        |
//! | `config`       | Booking durations and opening hours from the environment    |
//! | `error`        | Stable error codes shared by every failure type             |
//! | `shell`        | Line-oriented command interpreter used by the binary        |

pub mod availability;
pub mod config;
pub mod error;
pub mod facility;
pub mod reservation;
pub mod shell;
