//! Implements the setup phase of the board.
use enumflags2::BitFlags;
#[cfg(feature = "rng_gen")]
use rand::{distributions::Uniform, Rng};
use tracing::debug;

use crate::{
    board::{
        Board, CannotPlaceReason, Coordinate, Dimensions, Grid, PlaceError, SetupError,
        UnknownPlane,
    },
    planes::{self, Direction, Plane, PlaneId, PlaneList, PlaneShape, Violation},
};

/// Number of whole-fleet attempts made by [`FleetSetup::randomize`].
#[cfg(feature = "rng_gen")]
const FLEET_ATTEMPTS: usize = 100;

/// Number of random poses tried for each plane within one fleet attempt.
#[cfg(feature = "rng_gen")]
const PLANE_ATTEMPTS: usize = 100;

/// Setup phase for a [`Board`]. Allows placing and rearranging planes and does not
/// allow shooting.
///
/// New planes are only accepted in valid positions, but planes that are already placed
/// may be dragged or rotated into invalid ones. Those are flagged by
/// [`FleetSetup::violations`] and block [`FleetSetup::deploy`] until fixed.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FleetSetup {
    /// Grid the planes will be stamped onto. Stays empty during setup.
    grid: Grid,

    /// Planes placed so far, in placement order.
    planes: Vec<Plane>,

    /// Number of planes the fleet must have.
    capacity: usize,

    /// Id to give the next placed plane.
    next_id: u32,
}

impl FleetSetup {
    /// Begin setup of a fleet of `capacity` planes on a board with the given
    /// [`Dimensions`].
    pub fn new(dim: Dimensions, capacity: usize) -> Self {
        Self {
            grid: Grid::new(dim),
            planes: Vec::with_capacity(capacity),
            capacity,
            next_id: 0,
        }
    }

    /// Get the [`Dimensions`] of the board being set up.
    pub fn dimensions(&self) -> &Dimensions {
        self.grid.dimensions()
    }

    /// The (still empty) grid of the board being set up.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Planes placed so far.
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// Number of planes the fleet must have.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of planes still to be placed.
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.planes.len())
    }

    /// Place a new plane with its head at `head`. The plane is only added if the fleet
    /// is not full and the plane fits on the board without overlapping another plane.
    pub fn place(
        &mut self,
        head: Coordinate,
        direction: Direction,
        shape: &PlaneShape,
    ) -> Result<PlaneId, PlaceError> {
        if self.remaining() == 0 {
            return Err(PlaceError::new(CannotPlaceReason::FleetFull, head));
        }
        let id = PlaneId(self.next_id);
        let candidate = Plane::new(id, head, direction, shape);
        let found = planes::violations(&candidate, &self.planes, self.dimensions());
        if let Some(reason) = CannotPlaceReason::from_violations(found) {
            return Err(PlaceError::new(reason, head));
        }
        self.next_id += 1;
        self.planes.push(candidate);
        debug!(%id, %head, ?direction, "plane placed");
        Ok(id)
    }

    /// Move an existing plane to a new head and direction. The new position is not
    /// checked; see [`FleetSetup::violations`].
    pub fn move_plane(
        &mut self,
        id: PlaneId,
        head: Coordinate,
        direction: Direction,
        shape: &PlaneShape,
    ) -> Result<(), UnknownPlane> {
        let plane = self
            .planes
            .iter_mut()
            .find(|plane| plane.id() == id)
            .ok_or(UnknownPlane(id))?;
        plane.set_pose(head, direction, shape);
        debug!(%id, %head, ?direction, "plane moved");
        Ok(())
    }

    /// Turn an existing plane a quarter turn clockwise about its head. Like
    /// [`FleetSetup::move_plane`], the new position is not checked.
    pub fn rotate(&mut self, id: PlaneId, shape: &PlaneShape) -> Result<(), UnknownPlane> {
        let (head, direction) = self
            .planes
            .get_plane(id)
            .map(|plane| (plane.head(), plane.direction().next()))
            .ok_or(UnknownPlane(id))?;
        self.move_plane(id, head, direction, shape)
    }

    /// Everything wrong with the current position of the plane with the given id, or
    /// `None` if there is no such plane.
    pub fn violations(&self, id: PlaneId) -> Option<BitFlags<Violation>> {
        self.planes
            .get_plane(id)
            .map(|plane| planes::violations(plane, &self.planes, self.dimensions()))
    }

    /// Checks if this fleet is ready to deploy: every plane is placed and every plane is
    /// in a valid position.
    pub fn ready(&self) -> bool {
        self.check().is_ok()
    }

    /// Remove every placed plane.
    pub fn clear(&mut self) {
        self.planes.clear();
    }

    /// Replace the fleet with a random valid arrangement. Leaves the fleet untouched and
    /// returns an error if no arrangement could be found.
    #[cfg(feature = "rng_gen")]
    pub fn randomize<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        shape: &PlaneShape,
    ) -> Result<(), SetupError> {
        let size = self.dimensions().size() as i32;
        let range = Uniform::new(0, size);
        for _ in 0..FLEET_ATTEMPTS {
            let mut fleet: Vec<Plane> = Vec::with_capacity(self.capacity);
            for i in 0..self.capacity {
                let id = PlaneId(self.next_id + i as u32);
                let placed = (0..PLANE_ATTEMPTS)
                    .map(|_| {
                        let head = Coordinate::new(rng.sample(range), rng.sample(range));
                        Plane::new(id, head, rng.gen(), shape)
                    })
                    .find(|candidate| planes::is_valid(candidate, &fleet, self.dimensions()));
                match placed {
                    Some(plane) => fleet.push(plane),
                    None => break,
                }
            }
            if fleet.len() == self.capacity {
                self.next_id += self.capacity as u32;
                self.planes = fleet;
                debug!(planes = self.capacity, "fleet randomized");
                return Ok(());
            }
        }
        Err(SetupError::NoArrangement)
    }

    /// Check that the fleet is complete and every plane is valid against the whole set.
    pub fn check(&self) -> Result<(), SetupError> {
        if self.planes.len() != self.capacity {
            return Err(SetupError::Incomplete {
                placed: self.planes.len(),
                required: self.capacity,
            });
        }
        match self
            .planes
            .iter()
            .find(|plane| !planes::is_valid(plane, &self.planes, self.dimensions()))
        {
            Some(plane) => Err(SetupError::InvalidPlane(plane.id())),
            None => Ok(()),
        }
    }

    /// Stamp every plane onto a fresh grid and start the battle-phase [`Board`]. The
    /// setup itself is left unchanged.
    pub fn deploy(&self) -> Result<Board, SetupError> {
        self.check()?;
        let mut grid = self.grid.clone();
        for plane in &self.planes {
            grid.stamp(plane);
        }
        Ok(Board {
            grid,
            planes: self.planes.clone(),
        })
    }
}
