//! Defines the types that make up the grid. These are shared between the board's setup
//! and playing versions.

use std::{borrow::Borrow, ops::Index};

use thiserror::Error;

use crate::{
    board::{CannotShootReason, Coordinate, Dimensions},
    planes::{Plane, PlaneId, PlanePart},
};

/// Status of a single cell.
///
/// A cell only ever moves forward: `Empty` may become `Plane` (when the fleet is
/// deployed) or `Miss`, `Plane` may become `Hit` or `Dead`, and the struck states are
/// final.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellStatus {
    /// Open water, not yet shot.
    Empty,
    /// Covered by a plane, not yet shot. Hidden from the opponent.
    Plane,
    /// Shot and nothing was there.
    Miss,
    /// Shot and a wing, body or tail was there.
    Hit,
    /// Shot and a head was there.
    Dead,
}

impl CellStatus {
    /// Whether this cell has already been shot.
    pub fn struck(self) -> bool {
        match self {
            CellStatus::Miss | CellStatus::Hit | CellStatus::Dead => true,
            CellStatus::Empty | CellStatus::Plane => false,
        }
    }
}

/// A single cell in the player's grid.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCell {
    /// Current status of the cell.
    pub(super) status: CellStatus,

    /// The ID of the plane that occupies this cell, if any.
    pub(super) plane: Option<PlaneId>,

    /// Which part of the plane occupies this cell, if any.
    pub(super) part: Option<PlanePart>,
}

impl Default for GridCell {
    fn default() -> Self {
        Self {
            status: CellStatus::Empty,
            plane: None,
            part: None,
        }
    }
}

/// Reference to a particular cell in the grid.
#[derive(Debug, Copy, Clone)]
pub struct CellRef<'a> {
    /// Coordinate of this cell.
    coord: Coordinate,

    /// The cell itself.
    cell: &'a GridCell,
}

impl<'a> CellRef<'a> {
    /// The grid coordinate of this cell.
    pub fn coord(&self) -> Coordinate {
        self.coord
    }

    pub fn status(&self) -> CellStatus {
        self.cell.status
    }

    /// The id of the plane that occupies this cell, if any.
    pub fn plane(&self) -> Option<PlaneId> {
        self.cell.plane
    }

    /// The part of the plane that occupies this cell, if any.
    pub fn part(&self) -> Option<PlanePart> {
        self.cell.part
    }
}

/// Grid structure shared between [`FleetSetup`][crate::board::FleetSetup] and
/// [`Board`][crate::board::Board].
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "GridData")
)]
pub struct Grid {
    /// Dimensions of this board.
    dim: Dimensions,
    /// Cells that make up this board.
    cells: Box<[GridCell]>,
}

/// Reason a stored grid could not be rebuilt.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum GridDataError {
    #[error("grid side {0} is outside the supported range")]
    Size(usize),
    #[error("a grid of side {size} needs {expected} cells, found {found}")]
    CellCount {
        size: usize,
        expected: usize,
        found: usize,
    },
}

/// Unchecked form of a [`Grid`] as it is stored.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct GridData {
    dim: Dimensions,
    cells: Box<[GridCell]>,
}

#[cfg(feature = "serde")]
impl std::convert::TryFrom<GridData> for Grid {
    type Error = GridDataError;

    fn try_from(GridData { dim, cells }: GridData) -> Result<Self, Self::Error> {
        if Dimensions::try_new(dim.size()).is_none() {
            return Err(GridDataError::Size(dim.size()));
        }
        if cells.len() != dim.total_size() {
            return Err(GridDataError::CellCount {
                size: dim.size(),
                expected: dim.total_size(),
                found: cells.len(),
            });
        }
        Ok(Self { dim, cells })
    }
}

impl Grid {
    /// Create a grid where every cell is [`CellStatus::Empty`].
    pub fn new(dim: Dimensions) -> Self {
        let cells = (0..dim.total_size()).map(|_| Default::default()).collect();
        Self { dim, cells }
    }

    /// Get the [`Dimensions`] of this [`Grid`].
    pub fn dimensions(&self) -> &Dimensions {
        &self.dim
    }

    /// Get a reference to the cell at the given [`Coordinate`]. Returns `None` if the
    /// coordinate is out of bounds.
    pub fn get_coord(&self, coord: Coordinate) -> Option<CellRef> {
        self.get(coord).map(|cell| CellRef { coord, cell })
    }

    /// Get an iterator over the rows of this grid. Each row is an iterator over the cells
    /// of that row.
    pub fn iter_rows(&self) -> impl '_ + Iterator<Item = impl '_ + Iterator<Item = CellRef>> {
        self.dim
            .iter_coordinates()
            .map(move |row| row.map(move |coord| CellRef { coord, cell: &self[coord] }))
    }

    /// Get a reference to the cell at the given [`Coordinate`].
    pub(super) fn get<B: Borrow<Coordinate>>(&self, coord: B) -> Option<&GridCell> {
        self.dim
            .try_linearize(coord.borrow())
            .and_then(|i| self.cells.get(i))
    }

    /// Get a mutable reference to the cell at the given [`Coordinate`].
    pub(super) fn get_mut<B: Borrow<Coordinate>>(&mut self, coord: B) -> Option<&mut GridCell> {
        self.dim
            .try_linearize(coord.borrow())
            .and_then(move |i| self.cells.get_mut(i))
    }

    /// Mark every in-bounds cell of `plane` as occupied by it.
    pub(super) fn stamp(&mut self, plane: &Plane) {
        for cell in plane.cells() {
            if let Some(target) = self.get_mut(cell.coord) {
                target.status = CellStatus::Plane;
                target.plane = Some(plane.id());
                target.part = Some(cell.part);
            }
        }
    }

    /// Resolve a shot on the cell at `coord`, returning the cell as it was before the
    /// shot. The grid is left untouched if the shot is rejected.
    pub(super) fn strike(&mut self, coord: Coordinate) -> Result<GridCell, CannotShootReason> {
        let cell = self
            .get_mut(coord)
            .ok_or(CannotShootReason::OutOfBounds)?;
        let prior = *cell;
        cell.status = match (prior.status, prior.part) {
            (CellStatus::Empty, _) => CellStatus::Miss,
            (CellStatus::Plane, Some(PlanePart::Head)) => CellStatus::Dead,
            (CellStatus::Plane, _) => CellStatus::Hit,
            (CellStatus::Miss, _) | (CellStatus::Hit, _) | (CellStatus::Dead, _) => {
                return Err(CannotShootReason::AlreadyShot)
            }
        };
        Ok(prior)
    }
}

impl<B: Borrow<Coordinate>> Index<B> for Grid {
    type Output = GridCell;

    fn index(&self, coord: B) -> &Self::Output {
        self.get(coord).expect("coordinate out of bounds")
    }
}
