//! Types that make up the game board.

use tracing::debug;

use crate::planes::{Plane, PlaneId, PlaneList, PlanePart};

pub use self::{
    coordinate::{Coordinate, ParseCoordinateError},
    dimensions::Dimensions,
    errors::{
        CannotPlaceReason, CannotShootReason, PlaceError, SetupError, ShotError, UnknownPlane,
    },
    grid::{CellRef, CellStatus, Grid, GridCell, GridDataError},
    setup::FleetSetup,
};

mod coordinate;
mod dimensions;
mod errors;
mod grid;
pub mod setup;

/// Result of a shot on a single player's board.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShotOutcome {
    /// The shot did not hit anything.
    Miss,
    /// The shot hit a wing, body or tail of the plane with the given ID.
    Hit(PlaneId),
    /// The shot hit the head of the plane with the given ID, destroying it.
    Kill(PlaneId),
}

/// Represents a single player's deployed board, including their planes and their side
/// of the sky.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    /// Grid with every plane stamped onto it.
    grid: Grid,

    /// The deployed planes. Their positions are fixed; only the destroyed flag changes.
    planes: Vec<Plane>,
}

impl Board {
    /// Get the [`Dimensions`] of this [`Board`].
    pub fn dimensions(&self) -> &Dimensions {
        self.grid.dimensions()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The deployed planes.
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// Get the plane with the specified ID if it exists.
    pub fn get_plane(&self, id: PlaneId) -> Option<&Plane> {
        self.planes.get_plane(id)
    }

    /// Get a reference to the cell at the given coordinate. Returns None if the
    /// coordinate is out of bounds.
    pub fn get_coord(&self, coord: Coordinate) -> Option<CellRef> {
        self.grid.get_coord(coord)
    }

    /// Number of planes whose head has not been shot, counted from the planes
    /// themselves.
    pub fn alive_count(&self) -> usize {
        self.planes.iter().filter(|plane| !plane.destroyed()).count()
    }

    /// Returns true if all of this player's planes have been destroyed.
    pub fn defeated(&self) -> bool {
        self.alive_count() == 0
    }

    /// Fire a shot at this board, returning a result indicating why the shot was
    /// rejected or the result of the shot. A rejected shot leaves the board unchanged.
    pub fn strike(&mut self, coord: Coordinate) -> Result<ShotOutcome, ShotError> {
        let prior = self
            .grid
            .strike(coord)
            .map_err(|reason| ShotError::new(reason, coord))?;
        let outcome = match (prior.plane, prior.part) {
            (None, _) => ShotOutcome::Miss,
            (Some(id), Some(PlanePart::Head)) => {
                if let Some(plane) = self.planes.iter_mut().find(|plane| plane.id() == id) {
                    plane.destroy();
                }
                ShotOutcome::Kill(id)
            }
            (Some(id), _) => ShotOutcome::Hit(id),
        };
        debug!(%coord, ?outcome, alive = self.alive_count(), "board struck");
        Ok(outcome)
    }
}
