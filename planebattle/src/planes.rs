//! Types used for defining planes and their shapes.
use std::fmt;

use crate::board::{Coordinate, Dimensions};

pub use self::{
    shape::{PlaneShape, ShapeError, ShapeOffset},
    validity::{is_valid, violations, Violation},
};

mod shape;
mod validity;

/// Heading of a plane. The four headings form a cyclic group under [`Direction::next`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions, in clockwise order starting from [`Direction::Up`].
    pub const ALL: &'static [Direction] = &[
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// The direction a quarter turn clockwise from this one.
    pub fn next(self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// Rotate an offset defined for [`Direction::Up`] so that it points along this
    /// direction.
    pub fn rotate(self, dx: i32, dy: i32) -> (i32, i32) {
        match self {
            Direction::Up => (dx, dy),
            Direction::Right => (-dy, dx),
            Direction::Down => (-dx, -dy),
            Direction::Left => (dy, -dx),
        }
    }
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Up
    }
}

#[cfg(feature = "rng_gen")]
impl rand::distributions::Distribution<Direction> for rand::distributions::Standard {
    fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> Direction {
        Direction::ALL[rng.gen_range(0, Direction::ALL.len())]
    }
}

/// Role of a cell within a plane. Only the head is lethal.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlanePart {
    Head,
    Wing,
    Body,
    Tail,
}

/// A coordinate occupied by a plane, tagged with the part of the plane that covers it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaneCell {
    pub coord: Coordinate,
    pub part: PlanePart,
}

/// Projection of a plane shape onto the grid for a particular head and direction.
pub type ShapeProjection = Vec<PlaneCell>;

/// Identity of a plane. Unique within the list that owns the plane.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaneId(pub u32);

impl fmt::Display for PlaneId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A plane positioned on (or partly off) the grid.
///
/// The occupied cells are derived from the head and direction and are recomputed every
/// time the pose changes; there is no way to edit them independently.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plane {
    id: PlaneId,
    head: Coordinate,
    direction: Direction,
    destroyed: bool,
    cells: ShapeProjection,
}

impl Plane {
    /// Create a plane with its head at `head`, pointing along `direction`.
    pub fn new(id: PlaneId, head: Coordinate, direction: Direction, shape: &PlaneShape) -> Self {
        Self {
            id,
            head,
            direction,
            destroyed: false,
            cells: shape.project(head, direction),
        }
    }

    pub fn id(&self) -> PlaneId {
        self.id
    }

    pub fn head(&self) -> Coordinate {
        self.head
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the head of this plane has been shot.
    pub fn destroyed(&self) -> bool {
        self.destroyed
    }

    /// The cells covered by this plane, in shape-table order.
    pub fn cells(&self) -> &[PlaneCell] {
        &self.cells
    }

    /// Get an iterator over the coordinates covered by this plane.
    pub fn coords(&self) -> impl '_ + Iterator<Item = Coordinate> {
        self.cells.iter().map(|cell| cell.coord)
    }

    /// The part of this plane covering `coord`, if any.
    pub fn part_at(&self, coord: Coordinate) -> Option<PlanePart> {
        self.cells
            .iter()
            .find(|cell| cell.coord == coord)
            .map(|cell| cell.part)
    }

    /// Whether this plane covers `coord`.
    pub fn occupies(&self, coord: Coordinate) -> bool {
        self.part_at(coord).is_some()
    }

    /// Whether every cell of this plane lies inside `dim`.
    pub fn in_bounds(&self, dim: &Dimensions) -> bool {
        self.coords().all(|coord| dim.contains(coord))
    }

    /// Whether this plane shares at least one coordinate with `other`.
    pub fn overlaps(&self, other: &Plane) -> bool {
        self.coords().any(|coord| other.occupies(coord))
    }

    /// Move the plane to a new head and direction, re-deriving its cells.
    pub fn set_pose(&mut self, head: Coordinate, direction: Direction, shape: &PlaneShape) {
        self.head = head;
        self.direction = direction;
        self.cells = shape.project(head, direction);
    }

    /// Turn the plane a quarter turn clockwise about its head.
    pub fn rotate(&mut self, shape: &PlaneShape) {
        self.set_pose(self.head, self.direction.next(), shape);
    }

    pub(crate) fn destroy(&mut self) {
        self.destroyed = true;
    }
}

/// Lookup helpers for a list of planes.
pub trait PlaneList {
    /// Find a plane by id.
    fn get_plane(&self, id: PlaneId) -> Option<&Plane>;

    /// Find the first plane covering `coord`.
    fn plane_at(&self, coord: Coordinate) -> Option<&Plane>;

    /// Find a plane whose head is at `coord`.
    fn head_at(&self, coord: Coordinate) -> Option<&Plane>;
}

impl PlaneList for [Plane] {
    fn get_plane(&self, id: PlaneId) -> Option<&Plane> {
        self.iter().find(|plane| plane.id == id)
    }

    fn plane_at(&self, coord: Coordinate) -> Option<&Plane> {
        self.iter().find(|plane| plane.occupies(coord))
    }

    fn head_at(&self, coord: Coordinate) -> Option<&Plane> {
        self.iter().find(|plane| plane.head == coord)
    }
}
