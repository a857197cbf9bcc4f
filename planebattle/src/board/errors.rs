//! Errors used by the `Board` and `FleetSetup`.

use enumflags2::BitFlags;
use thiserror::Error;

use crate::{
    board::Coordinate,
    planes::{PlaneId, Violation},
};

/// Reason why a plane could not be placed or moved.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CannotPlaceReason {
    /// Every plane of the fleet has already been placed.
    #[error("all planes have already been placed")]
    FleetFull,
    /// One or more cells of the plane would be off the board.
    #[error("the plane does not fit on the board")]
    OutOfBounds,
    /// One or more cells of the plane are already occupied by another plane.
    #[error("the plane overlaps another plane")]
    Overlap,
}

impl CannotPlaceReason {
    /// Pick the reason to report for a set of violations, preferring bounds problems.
    /// Returns `None` if there are no violations.
    pub fn from_violations(found: BitFlags<Violation>) -> Option<Self> {
        if found.contains(Violation::OutOfBounds) {
            Some(CannotPlaceReason::OutOfBounds)
        } else if found.contains(Violation::Overlap) {
            Some(CannotPlaceReason::Overlap)
        } else {
            None
        }
    }
}

/// Error caused when attempting to place a plane in an invalid position.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
#[error("could not place plane at {coord}: {reason}")]
pub struct PlaceError {
    #[source]
    reason: CannotPlaceReason,
    coord: Coordinate,
}

impl PlaceError {
    /// Construct a placement error from a reason and the requested head position.
    pub(crate) fn new(reason: CannotPlaceReason, coord: Coordinate) -> Self {
        Self { reason, coord }
    }

    /// Get the reason placement was aborted.
    pub fn reason(&self) -> CannotPlaceReason {
        self.reason
    }

    /// Get the head coordinate where placement was attempted.
    pub fn coord(&self) -> Coordinate {
        self.coord
    }
}

/// Error returned when an operation names a plane that does not exist.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
#[error("no plane with id {0}")]
pub struct UnknownPlane(pub PlaneId);

/// Reason why a particular tile could not be shot.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CannotShootReason {
    /// The cell selected was out of bounds on the board.
    #[error("the target coordinate is out of bounds")]
    OutOfBounds,

    /// A shot has already been fired at that cell.
    #[error("the target cell was already shot")]
    AlreadyShot,
}

/// Error returned when trying to shoot a cell.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
#[error("could not shoot cell {coord}: {reason}")]
pub struct ShotError {
    /// Reason why the cell could not be shot.
    #[source]
    reason: CannotShootReason,

    /// The coordinates of the cell.
    coord: Coordinate,
}

impl ShotError {
    /// Construct a shot error with the given reason for the specified cell.
    pub(crate) fn new(reason: CannotShootReason, coord: Coordinate) -> Self {
        Self { reason, coord }
    }

    /// Get the reason the shot failed.
    pub fn reason(&self) -> CannotShootReason {
        self.reason
    }

    /// Get the coordinate of the shot cell.
    pub fn coord(&self) -> Coordinate {
        self.coord
    }
}

/// Error returned when a fleet cannot be deployed onto the board.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum SetupError {
    /// Not every plane of the fleet has been placed yet.
    #[error("{placed} of {required} planes placed")]
    Incomplete { placed: usize, required: usize },
    /// A placed plane is off the board or overlaps another plane.
    #[error("plane {0} is not in a valid position")]
    InvalidPlane(PlaneId),
    /// No random arrangement of the fleet could be found.
    #[error("could not find room for the whole fleet")]
    NoArrangement,
}
