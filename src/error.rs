//! Error codes and the facility-level error type.
//!
//! Every failure surfaced to a caller implements [`ErrorCode`], which gives
//! it a stable machine-readable code next to its human message. Nothing in
//! the planner is retryable: a failed operation commits nothing, and trying
//! again with the same input fails the same way.

use canvas::doc::{ElementId, LayoutError};

use crate::reservation::ReservationError;

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Errors that carry a stable code for callers.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

impl ErrorCode for LayoutError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_NOT_FOUND",
            Self::UnsupportedField { .. } | Self::InvalidValue { .. } => "E_INVALID_INPUT",
        }
    }
}

impl ErrorCode for ReservationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInterval { .. } => "E_INVALID_INTERVAL",
            Self::InvalidInput(_) => "E_INVALID_INPUT",
            Self::Conflict { .. } => "E_CONFLICT",
            Self::NotFound(_) => "E_NOT_FOUND",
        }
    }
}

/// Failures of [`crate::facility::Facility`] operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FacilityError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Reservation(#[from] ReservationError),
    #[error("no court matches {0:?}")]
    UnknownCourt(String),
    #[error("element {0} is not a court")]
    NotACourt(ElementId),
}

impl ErrorCode for FacilityError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Layout(e) => e.error_code(),
            Self::Reservation(e) => e.error_code(),
            Self::UnknownCourt(_) => "E_NOT_FOUND",
            Self::NotACourt(_) => "E_INVALID_INPUT",
        }
    }
}
