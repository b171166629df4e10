//! Typed errors for scheduling, booking, and deletion.

use crate::domain::types::{EntityKind, ScreeningSeatId};
use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors surfaced by the core. Every variant aborts the enclosing store
/// transaction; none are retried internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Referenced entity id does not exist
    #[error("no {kind} found with id {id}")]
    NotFound { kind: EntityKind, id: u64 },

    /// Requested screening interval overlaps an existing screening.
    /// Back-to-back intervals count as overlapping.
    #[error("screening request overlaps screening in showroom {showroom_letter} running {conflict_start} to {conflict_end}")]
    ScheduleConflict {
        showroom_letter: char,
        conflict_start: NaiveDateTime,
        conflict_end: NaiveDateTime,
    },

    /// Seat race lost: the screening seat already has a ticket bound
    #[error("screening seat {seat} is already booked")]
    AlreadyBooked { seat: ScreeningSeatId },

    /// Clashes with an existing record (duplicate email, role, or letter)
    #[error("{0} already exists")]
    AlreadyExists(String),

    /// Internal invariant breach; fatal to the operation
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl CoreError {
    pub fn not_found(kind: EntityKind, id: u64) -> Self {
        CoreError::NotFound { kind, id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::NotFound {
            kind: EntityKind::Movie,
            id: 42,
        };
        assert_eq!(err.to_string(), "no movie found with id 42");

        let err = CoreError::AlreadyBooked {
            seat: ScreeningSeatId(7),
        };
        assert_eq!(err.to_string(), "screening seat 7 is already booked");
    }
}
