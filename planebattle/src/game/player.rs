//! Per-player state.
use tracing::debug;

use crate::{
    board::{Board, Coordinate, Dimensions, FleetSetup, Grid, UnknownPlane},
    game::Player,
    planes::{Direction, Plane, PlaneId, PlaneList, PlaneShape},
};

/// A player's planes, either still being arranged or deployed for battle.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Fleet {
    /// Planes are being arranged; nothing is on the grid yet.
    Setup(FleetSetup),
    /// Planes are stamped onto the board and can be shot.
    Deployed(Board),
}

impl Fleet {
    pub fn grid(&self) -> &Grid {
        match self {
            Fleet::Setup(setup) => setup.grid(),
            Fleet::Deployed(board) => board.grid(),
        }
    }

    pub fn planes(&self) -> &[Plane] {
        match self {
            Fleet::Setup(setup) => setup.planes(),
            Fleet::Deployed(board) => board.planes(),
        }
    }
}

/// Ghost planes a player sketches on the opponent's grid to reason about where the
/// opponent's planes might be. They have no effect on the game.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ghosts {
    planes: Vec<Plane>,
    next_id: u32,
}

impl Ghosts {
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// Add a ghost. Ghosts may overlap each other or hang off the grid.
    pub fn place(&mut self, head: Coordinate, direction: Direction, shape: &PlaneShape) -> PlaneId {
        let id = PlaneId(self.next_id);
        self.next_id += 1;
        self.planes.push(Plane::new(id, head, direction, shape));
        id
    }

    pub fn move_plane(
        &mut self,
        id: PlaneId,
        head: Coordinate,
        direction: Direction,
        shape: &PlaneShape,
    ) -> Result<(), UnknownPlane> {
        self.planes
            .iter_mut()
            .find(|plane| plane.id() == id)
            .ok_or(UnknownPlane(id))?
            .set_pose(head, direction, shape);
        Ok(())
    }

    pub fn rotate(&mut self, id: PlaneId, shape: &PlaneShape) -> Result<(), UnknownPlane> {
        self.planes
            .iter_mut()
            .find(|plane| plane.id() == id)
            .ok_or(UnknownPlane(id))?
            .rotate(shape);
        Ok(())
    }

    pub fn remove(&mut self, id: PlaneId) -> Result<Plane, UnknownPlane> {
        let idx = self
            .planes
            .iter()
            .position(|plane| plane.id() == id)
            .ok_or(UnknownPlane(id))?;
        Ok(self.planes.remove(idx))
    }

    /// The only check made on a ghost: whether it lies fully on the grid. Returns `None`
    /// if there is no such ghost.
    pub fn in_bounds(&self, id: PlaneId, dim: &Dimensions) -> Option<bool> {
        self.planes.get_plane(id).map(|plane| plane.in_bounds(dim))
    }
}

/// Everything that belongs to one player for the whole match.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerState {
    id: Player,
    name: String,
    pub(super) fleet: Fleet,
    pub(super) ghosts: Ghosts,
    pub(super) has_shot: bool,
}

impl PlayerState {
    pub(super) fn new(id: Player, name: String, dim: Dimensions, planes: usize) -> Self {
        Self {
            id,
            name,
            fleet: Fleet::Setup(FleetSetup::new(dim, planes)),
            ghosts: Ghosts::default(),
            has_shot: false,
        }
    }

    pub fn id(&self) -> Player {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// The player's own grid. Empty until the fleet is deployed.
    pub fn grid(&self) -> &Grid {
        self.fleet.grid()
    }

    /// The player's planes, placed or deployed.
    pub fn planes(&self) -> &[Plane] {
        self.fleet.planes()
    }

    pub fn ghosts(&self) -> &Ghosts {
        &self.ghosts
    }

    /// Whether the player has confirmed their setup.
    pub fn ready(&self) -> bool {
        match self.fleet {
            Fleet::Setup(_) => false,
            Fleet::Deployed(_) => true,
        }
    }

    /// Whether the player has fired during the current turn.
    pub fn has_shot(&self) -> bool {
        self.has_shot
    }

    /// Number of the player's planes still flying. Zero until the fleet is deployed.
    ///
    /// Always counted from the planes' destroyed flags, so it cannot drift from them.
    pub fn alive_count(&self) -> usize {
        match &self.fleet {
            Fleet::Setup(_) => 0,
            Fleet::Deployed(board) => board.alive_count(),
        }
    }

    pub(super) fn setup_mut(&mut self) -> Option<&mut FleetSetup> {
        match &mut self.fleet {
            Fleet::Setup(setup) => Some(setup),
            Fleet::Deployed(_) => None,
        }
    }

    pub(super) fn board_mut(&mut self) -> Option<&mut Board> {
        match &mut self.fleet {
            Fleet::Deployed(board) => Some(board),
            Fleet::Setup(_) => None,
        }
    }

    pub(super) fn deploy(&mut self) -> Result<(), crate::board::SetupError> {
        let board = match &self.fleet {
            Fleet::Setup(setup) => setup.deploy()?,
            Fleet::Deployed(_) => return Ok(()),
        };
        debug!(player = ?self.id, planes = board.planes().len(), "fleet deployed");
        self.fleet = Fleet::Deployed(board);
        Ok(())
    }
}
