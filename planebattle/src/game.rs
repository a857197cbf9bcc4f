//! The phase and turn controller.
//!
//! A [`Game`] owns the whole match: both players' state, the turn log and the gesture in
//! progress. Every action either succeeds completely or is rejected with a
//! [`GameError`] and leaves the game unchanged.
use std::{fmt, time::Duration};

use enumflags2::BitFlags;
#[cfg(feature = "rng_gen")]
use rand::Rng;
use tracing::{debug, info, instrument};

use crate::{
    board::{Coordinate, Dimensions, FleetSetup, UnknownPlane},
    config::{ConfigError, GameConfig},
    input::{Gesture, Intent, Layer, PointerEvent, Surface},
    planes::{Direction, Plane, PlaneId, PlaneList, PlaneShape, ShapeProjection, Violation},
};

pub use self::{
    errors::GameError,
    log::{AttackOutcome, TurnLog, TurnRecord},
    player::{Fleet, Ghosts, PlayerState},
};

mod errors;
mod log;
mod player;

/// One of the two players.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Player {
    P1,
    P2,
}

impl Player {
    /// The other player.
    pub fn opponent(self) -> Self {
        match self {
            Player::P1 => Player::P2,
            Player::P2 => Player::P1,
        }
    }

    /// Index of the player's state in two-element arrays.
    pub fn index(self) -> usize {
        match self {
            Player::P1 => 0,
            Player::P2 => 1,
        }
    }

    /// The player's number, 1 or 2.
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// Where play continues once a handoff is acknowledged.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Resume {
    /// The receiving player arranges their fleet.
    Setup,
    /// The receiving player takes a battle turn.
    Battle,
}

/// A pending pass of the device to the other player.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Handoff {
    /// Player who receives the device.
    pub to: Player,
    /// Phase entered when the handoff completes.
    pub resume: Resume,
    /// Automatic handoffs complete on a timer; the others wait for the players.
    pub automatic: bool,
}

/// Phase of the game.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// The active player is arranging their fleet.
    Setup,
    /// The device is being passed between players. Nothing can be done until
    /// [`Game::acknowledge_handoff`] is called.
    Transition(Handoff),
    /// The active player may fire one shot and then end their turn.
    Battle,
    /// The given player destroyed every enemy plane. Terminal until
    /// [`Game::restart`].
    GameOver(Player),
}

/// Tool used on the opponent's grid during battle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ToolMode {
    /// Taps shoot cells.
    Attack,
    /// Taps place and edit ghost planes.
    Deduce,
}

impl Default for ToolMode {
    fn default() -> Self {
        ToolMode::Attack
    }
}

/// Cells that would be covered by the plane under the pointer, for highlighting.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Preview {
    /// Layer the plane would be placed or moved in.
    pub layer: Layer,
    /// Cells of the plane, possibly off the grid.
    pub cells: ShapeProjection,
    /// Whether releasing the pointer here would give a valid plane.
    pub valid: bool,
}

/// The full game record.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Game {
    config: GameConfig,
    dim: Dimensions,
    phase: Phase,
    /// Player currently holding the device.
    active: Player,
    players: [PlayerState; 2],
    log: TurnLog,
    tool: ToolMode,
    /// Direction given to newly placed planes and ghosts.
    facing: Direction,
    selected_ghost: Option<PlaneId>,
    gesture: Gesture,
}

impl Default for Game {
    /// A game with the default [`GameConfig`].
    fn default() -> Self {
        Self::with_dimensions(GameConfig::default(), Dimensions::default())
    }
}

impl Game {
    /// Start a new game, with player 1 arranging their fleet.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let dim = config.validate()?;
        Ok(Self::with_dimensions(config, dim))
    }

    fn with_dimensions(config: GameConfig, dim: Dimensions) -> Self {
        let [first, second] = &config.player_names;
        let players = [
            PlayerState::new(Player::P1, first.clone(), dim, config.planes_per_player),
            PlayerState::new(Player::P2, second.clone(), dim, config.planes_per_player),
        ];
        info!(size = dim.size(), planes = config.planes_per_player, "new game");
        Self {
            config,
            dim,
            phase: Phase::Setup,
            active: Player::P1,
            players,
            log: TurnLog::default(),
            tool: ToolMode::default(),
            facing: Direction::default(),
            selected_ghost: None,
            gesture: Gesture::new(),
        }
    }

    /// Throw the whole game away and start over with the same configuration.
    pub fn restart(&mut self) {
        *self = Self::with_dimensions(self.config.clone(), self.dim);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dim
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The player holding the device. During a transition this is still the player
    /// who is handing it off.
    pub fn active(&self) -> Player {
        self.active
    }

    pub fn player(&self, player: Player) -> &PlayerState {
        &self.players[player.index()]
    }

    pub fn active_player(&self) -> &PlayerState {
        self.player(self.active)
    }

    /// State of the active player's opponent.
    pub fn opponent(&self) -> &PlayerState {
        self.player(self.active.opponent())
    }

    pub fn log(&self) -> &TurnLog {
        &self.log
    }

    /// The winner, once the game is over.
    pub fn winner(&self) -> Option<Player> {
        match self.phase {
            Phase::GameOver(winner) => Some(winner),
            _ => None,
        }
    }

    pub fn tool(&self) -> ToolMode {
        self.tool
    }

    /// Direction given to newly placed planes and ghosts.
    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn selected_ghost(&self) -> Option<PlaneId> {
        self.selected_ghost
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Number of the player's planes still flying.
    pub fn alive_count(&self, player: Player) -> usize {
        self.player(player).alive_count()
    }

    /// What pointer input currently means.
    pub fn surface(&self) -> Surface {
        Surface::of(&self.phase, self.tool)
    }

    fn require(&self, phase: Phase, action: &'static str) -> Result<(), GameError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(GameError::WrongPhase {
                action,
                phase: self.phase,
            })
        }
    }

    /// The active player's fleet setup along with the plane shape.
    fn setup_parts(
        &mut self,
        action: &'static str,
    ) -> Result<(&mut FleetSetup, &PlaneShape), GameError> {
        self.require(Phase::Setup, action)?;
        let phase = self.phase;
        let setup = self.players[self.active.index()]
            .setup_mut()
            .ok_or(GameError::WrongPhase { action, phase })?;
        Ok((setup, &self.config.shape))
    }

    /// The active player's ghosts along with the plane shape.
    fn ghost_parts(&mut self, action: &'static str) -> Result<(&mut Ghosts, &PlaneShape), GameError> {
        self.require(Phase::Battle, action)?;
        Ok((
            &mut self.players[self.active.index()].ghosts,
            &self.config.shape,
        ))
    }

    fn active_setup(&self) -> Option<&FleetSetup> {
        match (self.phase, self.active_player().fleet()) {
            (Phase::Setup, Fleet::Setup(setup)) => Some(setup),
            _ => None,
        }
    }

    /// Place a new plane for the active player, facing the current [`Game::facing`].
    #[instrument(skip(self))]
    pub fn place_plane(&mut self, head: Coordinate) -> Result<PlaneId, GameError> {
        let facing = self.facing;
        let (setup, shape) = self.setup_parts("place a plane")?;
        Ok(setup.place(head, facing, shape)?)
    }

    /// Move one of the active player's planes, keeping its direction. The new position
    /// is not checked until the setup is confirmed.
    #[instrument(skip(self))]
    pub fn move_plane(&mut self, id: PlaneId, head: Coordinate) -> Result<(), GameError> {
        let (setup, shape) = self.setup_parts("move a plane")?;
        let direction = setup
            .planes()
            .get_plane(id)
            .map(Plane::direction)
            .ok_or(UnknownPlane(id))?;
        Ok(setup.move_plane(id, head, direction, shape)?)
    }

    /// Turn one of the active player's planes a quarter turn about its head.
    #[instrument(skip(self))]
    pub fn rotate_plane(&mut self, id: PlaneId) -> Result<(), GameError> {
        let (setup, shape) = self.setup_parts("rotate a plane")?;
        Ok(setup.rotate(id, shape)?)
    }

    /// Turn the facing of new planes a quarter turn, returning the new facing.
    pub fn rotate_facing(&mut self) -> Direction {
        self.facing = self.facing.next();
        debug!(facing = ?self.facing, "facing rotated");
        self.facing
    }

    /// Remove every plane the active player has placed.
    #[instrument(skip(self))]
    pub fn clear_planes(&mut self) -> Result<(), GameError> {
        let (setup, _) = self.setup_parts("clear the fleet")?;
        setup.clear();
        debug!("fleet cleared");
        Ok(())
    }

    /// Replace the active player's fleet with a random valid arrangement.
    #[cfg(feature = "rng_gen")]
    #[instrument(skip(self, rng))]
    pub fn randomize_planes<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), GameError> {
        let (setup, shape) = self.setup_parts("randomize the fleet")?;
        Ok(setup.randomize(rng, shape)?)
    }

    /// Whether the active player's setup can be confirmed: every plane is placed and
    /// valid.
    pub fn setup_valid(&self) -> bool {
        self.active_setup().map_or(false, FleetSetup::ready)
    }

    /// Everything wrong with the position of one of the active player's planes during
    /// setup. `None` outside setup or if there is no such plane.
    pub fn plane_violations(&self, id: PlaneId) -> Option<BitFlags<Violation>> {
        self.active_setup()?.violations(id)
    }

    /// Lock in the active player's fleet and hand the device to the other player.
    #[instrument(skip(self))]
    pub fn confirm_setup(&mut self) -> Result<(), GameError> {
        self.require(Phase::Setup, "confirm setup")?;
        let active = self.active;
        self.players[active.index()].deploy()?;
        let next = active.opponent();
        let resume = if self.players[next.index()].ready() {
            Resume::Battle
        } else {
            Resume::Setup
        };
        self.gesture.reset();
        self.phase = Phase::Transition(Handoff {
            to: next,
            resume,
            automatic: true,
        });
        info!(player = ?active, ?resume, "setup confirmed");
        Ok(())
    }

    /// How long to wait before calling [`Game::acknowledge_handoff`] for an automatic
    /// handoff. `None` if there is no handoff pending or it waits for the players.
    pub fn handoff_delay(&self) -> Option<Duration> {
        match self.phase {
            Phase::Transition(Handoff {
                automatic: true, ..
            }) => Some(self.config.handoff_delay),
            _ => None,
        }
    }

    /// Complete a pending handoff, giving the device to the receiving player.
    #[instrument(skip(self))]
    pub fn acknowledge_handoff(&mut self) -> Result<(), GameError> {
        let handoff = match self.phase {
            Phase::Transition(handoff) => handoff,
            phase => {
                return Err(GameError::WrongPhase {
                    action: "acknowledge a handoff",
                    phase,
                })
            }
        };
        self.active = handoff.to;
        for player in self.players.iter_mut() {
            player.has_shot = false;
        }
        self.tool = ToolMode::Attack;
        self.selected_ghost = None;
        self.gesture.reset();
        self.phase = match handoff.resume {
            Resume::Setup => {
                self.facing = Direction::Up;
                Phase::Setup
            }
            Resume::Battle => Phase::Battle,
        };
        info!(player = ?self.active, phase = ?self.phase, "handoff complete");
        Ok(())
    }

    /// Switch the battle tool. Switching back to attacking drops the ghost selection.
    #[instrument(skip(self))]
    pub fn set_tool(&mut self, tool: ToolMode) -> Result<(), GameError> {
        self.require(Phase::Battle, "switch tools")?;
        if tool == ToolMode::Attack {
            self.selected_ghost = None;
        }
        if tool != self.tool {
            self.gesture.reset();
        }
        self.tool = tool;
        Ok(())
    }

    /// Fire the active player's shot for this turn at the opponent's grid. Ends the game
    /// if the shot destroys the opponent's last plane.
    #[instrument(skip(self))]
    pub fn attack(&mut self, coord: Coordinate) -> Result<AttackOutcome, GameError> {
        self.require(Phase::Battle, "attack")?;
        let active = self.active;
        if self.players[active.index()].has_shot {
            return Err(GameError::AlreadyFired);
        }
        let phase = self.phase;
        let board = self.players[active.opponent().index()]
            .board_mut()
            .ok_or(GameError::WrongPhase {
                action: "attack",
                phase,
            })?;
        let outcome = AttackOutcome::from(board.strike(coord)?);
        let defeated = board.defeated();

        let attacker = &mut self.players[active.index()];
        attacker.has_shot = true;
        let record = self.log.record(active, attacker.name(), coord, outcome);
        info!(turn = record.turn, %coord, %outcome, "shot fired");

        if defeated {
            self.phase = Phase::GameOver(active);
            self.gesture.reset();
            info!(winner = ?active, "game over");
        }
        Ok(outcome)
    }

    /// End the active player's battle turn and hand the device over. The player must
    /// have fired first.
    #[instrument(skip(self))]
    pub fn end_turn(&mut self) -> Result<(), GameError> {
        self.require(Phase::Battle, "end the turn")?;
        if !self.players[self.active.index()].has_shot {
            return Err(GameError::NotFired);
        }
        self.gesture.reset();
        self.phase = Phase::Transition(Handoff {
            to: self.active.opponent(),
            resume: Resume::Battle,
            automatic: false,
        });
        info!(player = ?self.active, "turn ended");
        Ok(())
    }

    /// Sketch a ghost plane on the opponent's grid, facing the current
    /// [`Game::facing`]. The new ghost becomes the selection.
    #[instrument(skip(self))]
    pub fn place_ghost(&mut self, head: Coordinate) -> Result<PlaneId, GameError> {
        let facing = self.facing;
        let (ghosts, shape) = self.ghost_parts("place a ghost")?;
        let id = ghosts.place(head, facing, shape);
        self.selected_ghost = Some(id);
        debug!(%id, "ghost placed");
        Ok(id)
    }

    /// Move a ghost plane, keeping its direction.
    #[instrument(skip(self))]
    pub fn move_ghost(&mut self, id: PlaneId, head: Coordinate) -> Result<(), GameError> {
        let (ghosts, shape) = self.ghost_parts("move a ghost")?;
        let direction = ghosts
            .planes()
            .get_plane(id)
            .map(Plane::direction)
            .ok_or(UnknownPlane(id))?;
        Ok(ghosts.move_plane(id, head, direction, shape)?)
    }

    /// Turn a ghost plane a quarter turn about its head.
    #[instrument(skip(self))]
    pub fn rotate_ghost(&mut self, id: PlaneId) -> Result<(), GameError> {
        let (ghosts, shape) = self.ghost_parts("rotate a ghost")?;
        Ok(ghosts.rotate(id, shape)?)
    }

    #[instrument(skip(self))]
    pub fn select_ghost(&mut self, id: PlaneId) -> Result<(), GameError> {
        self.require(Phase::Battle, "select a ghost")?;
        self.active_player()
            .ghosts()
            .planes()
            .get_plane(id)
            .ok_or(UnknownPlane(id))?;
        self.selected_ghost = Some(id);
        Ok(())
    }

    pub fn deselect_ghost(&mut self) {
        self.selected_ghost = None;
    }

    /// Turn the selected ghost a quarter turn.
    pub fn rotate_selected_ghost(&mut self) -> Result<(), GameError> {
        let id = self.selected_ghost.ok_or(GameError::NoSelection)?;
        self.rotate_ghost(id)
    }

    /// Remove the selected ghost.
    #[instrument(skip(self))]
    pub fn delete_selected_ghost(&mut self) -> Result<(), GameError> {
        let id = self.selected_ghost.ok_or(GameError::NoSelection)?;
        let (ghosts, _) = self.ghost_parts("delete a ghost")?;
        ghosts.remove(id)?;
        self.selected_ghost = None;
        debug!(%id, "ghost deleted");
        Ok(())
    }

    /// Whether one of the active player's ghosts lies fully on the grid. `None` if there
    /// is no such ghost.
    pub fn ghost_in_bounds(&self, id: PlaneId) -> Option<bool> {
        self.active_player().ghosts().in_bounds(id, &self.dim)
    }

    /// Feed a pointer event on the grid the active player is editing: their own grid
    /// during setup, the opponent's during battle.
    ///
    /// Returns the action the gesture resolved to if it was carried out. Actions that
    /// resolve but are rejected leave the game unchanged and return `None`.
    #[instrument(skip(self))]
    pub fn pointer(&mut self, event: PointerEvent) -> Option<Intent> {
        let surface = self.surface();
        let player = &self.players[self.active.index()];
        let targets: &[Plane] = match surface.layer() {
            Some(Layer::Fleet) => player.planes(),
            Some(Layer::Ghosts) => player.ghosts.planes(),
            None => &[],
        };
        let intent = self.gesture.handle(surface, event, targets)?;
        match self.apply(intent) {
            Ok(()) => Some(intent),
            Err(err) => {
                debug!(?intent, %err, "action rejected");
                None
            }
        }
    }

    fn apply(&mut self, intent: Intent) -> Result<(), GameError> {
        match intent {
            Intent::Place(coord) => self.place_plane(coord).map(drop),
            Intent::Rotate {
                layer: Layer::Fleet,
                id,
            } => self.rotate_plane(id),
            Intent::Rotate {
                layer: Layer::Ghosts,
                id,
            } => self.rotate_ghost(id),
            Intent::Move {
                layer: Layer::Fleet,
                id,
                head,
            } => self.move_plane(id, head),
            Intent::Move {
                layer: Layer::Ghosts,
                id,
                head,
            } => self.move_ghost(id, head),
            Intent::Select(id) => self.select_ghost(id),
            Intent::Deselect => {
                self.deselect_ghost();
                Ok(())
            }
            Intent::PlaceGhost(coord) => self.place_ghost(coord).map(drop),
            Intent::Attack(coord) => self.attack(coord).map(drop),
        }
    }

    /// The plane that releasing the pointer now would place or move, if any.
    ///
    /// While a plane is held this is that plane at the hovered cell. Otherwise it is a
    /// new plane with the current facing, unless the hovered cell is already covered.
    pub fn preview(&self) -> Option<Preview> {
        let layer = self.surface().layer()?;
        let player = self.active_player();
        let planes = match layer {
            Layer::Fleet => player.planes(),
            Layer::Ghosts => player.ghosts().planes(),
        };
        let (head, direction, held) = match self.gesture.grab() {
            Some(grab) => (grab.hover, grab.direction, Some(grab.target)),
            None => {
                let hover = self.gesture.hover()?;
                if planes.plane_at(hover).is_some() {
                    return None;
                }
                (hover, self.facing, None)
            }
        };
        let cells = self.config.shape.project(head, direction);
        let in_bounds = cells.iter().all(|cell| self.dim.contains(cell.coord));
        let valid = match layer {
            Layer::Ghosts => in_bounds,
            Layer::Fleet => {
                let room = held.is_some()
                    || self.active_setup().map_or(false, |setup| setup.remaining() > 0);
                let clear = planes
                    .iter()
                    .filter(|plane| Some(plane.id()) != held)
                    .all(|plane| cells.iter().all(|cell| !plane.occupies(cell.coord)));
                room && in_bounds && clear
            }
        };
        Some(Preview {
            layer,
            cells,
            valid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{CannotShootReason, CellStatus};

    fn c(x: i32, y: i32) -> Coordinate {
        Coordinate::new(x, y)
    }

    const FLEET: [(i32, i32); 3] = [(2, 0), (7, 0), (4, 5)];

    fn place_fleet(game: &mut Game) {
        for &(x, y) in FLEET.iter() {
            game.place_plane(c(x, y)).unwrap();
        }
    }

    /// A game where both players have deployed the same fleet and player 1 is to move.
    fn battle() -> Game {
        let mut game = Game::default();
        place_fleet(&mut game);
        game.confirm_setup().unwrap();
        game.acknowledge_handoff().unwrap();
        place_fleet(&mut game);
        game.confirm_setup().unwrap();
        game.acknowledge_handoff().unwrap();
        game
    }

    fn pass(game: &mut Game) {
        game.end_turn().unwrap();
        game.acknowledge_handoff().unwrap();
    }

    #[test]
    fn setup_hands_off_to_player_two_then_battle() {
        let mut game = Game::default();
        assert_eq!(game.phase(), Phase::Setup);
        assert!(!game.setup_valid());
        assert!(matches!(
            game.confirm_setup(),
            Err(GameError::Setup(crate::board::SetupError::Incomplete {
                placed: 0,
                required: 3
            }))
        ));

        place_fleet(&mut game);
        assert!(game.setup_valid());
        game.confirm_setup().unwrap();
        assert_eq!(
            game.phase(),
            Phase::Transition(Handoff {
                to: Player::P2,
                resume: Resume::Setup,
                automatic: true
            })
        );
        assert_eq!(game.handoff_delay(), Some(Duration::from_millis(100)));
        assert_eq!(game.alive_count(Player::P1), 3);
        assert!(game.place_plane(c(4, 4)).is_err());

        game.rotate_facing();
        game.acknowledge_handoff().unwrap();
        assert_eq!(game.phase(), Phase::Setup);
        assert_eq!(game.active(), Player::P2);
        assert_eq!(game.facing(), Direction::Up);

        place_fleet(&mut game);
        game.confirm_setup().unwrap();
        assert_eq!(
            game.phase(),
            Phase::Transition(Handoff {
                to: Player::P1,
                resume: Resume::Battle,
                automatic: true
            })
        );
        game.acknowledge_handoff().unwrap();
        assert_eq!(game.phase(), Phase::Battle);
        assert_eq!(game.active(), Player::P1);
        assert_eq!(game.handoff_delay(), None);
    }

    #[test]
    fn invalid_setup_blocks_confirmation() {
        let mut game = Game::default();
        let ids: Vec<PlaneId> = FLEET
            .iter()
            .map(|&(x, y)| game.place_plane(c(x, y)).unwrap())
            .collect();
        game.move_plane(ids[0], c(7, 1)).unwrap();
        assert_eq!(
            game.plane_violations(ids[0]),
            Some(BitFlags::from(Violation::Overlap))
        );
        assert!(!game.setup_valid());
        assert_eq!(
            game.confirm_setup(),
            Err(GameError::Setup(crate::board::SetupError::InvalidPlane(ids[0])))
        );
        assert_eq!(game.phase(), Phase::Setup);

        game.move_plane(ids[0], c(2, 0)).unwrap();
        assert!(game.setup_valid());
        game.clear_planes().unwrap();
        assert!(game.active_player().planes().is_empty());
    }

    #[test]
    fn one_shot_per_turn() {
        let mut game = battle();
        assert_eq!(game.end_turn(), Err(GameError::NotFired));
        assert_eq!(game.attack(c(9, 9)), Ok(AttackOutcome::Miss));
        assert!(game.active_player().has_shot());
        assert_eq!(game.attack(c(0, 9)), Err(GameError::AlreadyFired));
        let cell = game.opponent().grid().get_coord(c(0, 9)).map(|cell| cell.status());
        assert_eq!(cell, Some(CellStatus::Empty));

        pass(&mut game);
        assert_eq!(game.active(), Player::P2);
        assert!(!game.active_player().has_shot());
        assert!(!game.player(Player::P1).has_shot());
        assert_eq!(game.handoff_delay(), None);
    }

    #[test]
    fn restriking_a_cell_is_rejected() {
        let mut game = battle();
        game.attack(c(2, 0)).unwrap();
        pass(&mut game);
        game.attack(c(0, 0)).unwrap();
        pass(&mut game);
        match game.attack(c(2, 0)) {
            Err(GameError::Shot(err)) => assert_eq!(err.reason(), CannotShootReason::AlreadyShot),
            other => panic!("unexpected {:?}", other),
        }
        assert!(!game.active_player().has_shot());
        assert_eq!(game.log().len(), 2);
    }

    #[test]
    fn last_head_ends_the_game() {
        let mut game = battle();
        for (turn, &(x, y)) in FLEET.iter().enumerate() {
            let before = game.alive_count(Player::P2);
            assert_eq!(game.attack(c(x, y)), Ok(AttackOutcome::Kill));
            assert_eq!(game.alive_count(Player::P2), before - 1);
            if turn + 1 < FLEET.len() {
                assert_eq!(game.phase(), Phase::Battle);
                pass(&mut game);
                game.attack(c(9, 9 - turn as i32)).unwrap();
                pass(&mut game);
            }
        }
        assert_eq!(game.phase(), Phase::GameOver(Player::P1));
        assert_eq!(game.winner(), Some(Player::P1));
        assert!(matches!(
            game.end_turn(),
            Err(GameError::WrongPhase { .. })
        ));
        assert_eq!(game.pointer(PointerEvent::Down(c(0, 0))), None);

        game.restart();
        assert_eq!(game.phase(), Phase::Setup);
        assert!(game.log().is_empty());
        assert_eq!(game.alive_count(Player::P2), 0);
    }

    #[test]
    fn ghost_tools() {
        let mut game = battle();
        game.set_tool(ToolMode::Deduce).unwrap();
        let a = game.place_ghost(c(3, 3)).unwrap();
        assert_eq!(game.selected_ghost(), Some(a));
        let b = game.place_ghost(c(0, 0)).unwrap();
        assert_eq!(game.ghost_in_bounds(b), Some(false));
        game.rotate_selected_ghost().unwrap();
        assert_eq!(game.active_player().ghosts().planes()[1].direction(), Direction::Right);

        game.select_ghost(a).unwrap();
        game.delete_selected_ghost().unwrap();
        assert_eq!(game.selected_ghost(), None);
        assert_eq!(game.delete_selected_ghost(), Err(GameError::NoSelection));
        assert_eq!(
            game.select_ghost(a),
            Err(GameError::UnknownPlane(UnknownPlane(a)))
        );

        game.select_ghost(b).unwrap();
        game.set_tool(ToolMode::Attack).unwrap();
        assert_eq!(game.selected_ghost(), None);
        // Ghosts never touch the real board.
        assert!(game.opponent().grid().iter_rows().flatten().all(|cell| {
            cell.status() == CellStatus::Plane || cell.status() == CellStatus::Empty
        }));
    }

    #[test]
    fn handoff_resets_tools() {
        let mut game = battle();
        game.set_tool(ToolMode::Deduce).unwrap();
        game.place_ghost(c(5, 5)).unwrap();
        game.set_tool(ToolMode::Attack).unwrap();
        game.attack(c(9, 9)).unwrap();
        game.set_tool(ToolMode::Deduce).unwrap();
        game.select_ghost(PlaneId(0)).unwrap();
        pass(&mut game);
        assert_eq!(game.tool(), ToolMode::Attack);
        assert_eq!(game.selected_ghost(), None);
        // Ghosts belong to the player who drew them.
        assert!(game.active_player().ghosts().planes().is_empty());
        assert_eq!(game.player(Player::P1).ghosts().planes().len(), 1);
    }

    #[test]
    fn pointer_drives_setup() {
        use crate::input::PointerEvent::*;

        let mut game = Game::default();
        assert_eq!(game.pointer(Down(c(2, 0))), None);
        assert_eq!(game.pointer(Up(c(2, 0))), Some(Intent::Place(c(2, 0))));
        let id = game.active_player().planes()[0].id();

        // Tapping the head rotates.
        game.pointer(Down(c(2, 0)));
        assert_eq!(
            game.pointer(Up(c(2, 0))),
            Some(Intent::Rotate {
                layer: Layer::Fleet,
                id
            })
        );
        assert_eq!(game.active_player().planes()[0].direction(), Direction::Right);

        // Dragging the head moves, keeping the direction.
        game.pointer(Down(c(2, 0)));
        game.pointer(Move(c(5, 5)));
        let preview = game.preview().unwrap();
        assert!(preview.valid);
        assert_eq!(preview.cells[0].coord, c(5, 5));
        game.pointer(Up(c(5, 5)));
        let plane = &game.active_player().planes()[0];
        assert_eq!((plane.head(), plane.direction()), (c(5, 5), Direction::Right));

        // Taps that would give an invalid plane are ignored.
        game.pointer(Down(c(0, 0)));
        assert_eq!(game.pointer(Up(c(0, 0))), None);
        assert_eq!(game.active_player().planes().len(), 1);
    }

    #[test]
    fn far_off_board_pointer_leaves_game_untouched() {
        use crate::input::PointerEvent::*;

        let mut game = Game::default();
        let id = game.place_plane(c(2, 0)).unwrap();
        let before = game.clone();
        for &far in &[c(i32::MAX, 0), c(0, i32::MIN), c(i32::MIN, i32::MAX)] {
            game.pointer(Move(far));
            assert!(!game.preview().unwrap().valid);
            game.pointer(Down(far));
            assert_eq!(game.pointer(Up(far)), None);
            assert!(game.move_plane(id, far).is_err());
        }
        assert_eq!(game.active_player().planes(), before.active_player().planes());
    }

    #[test]
    fn preview_flags_invalid_positions() {
        use crate::input::PointerEvent::*;

        let mut game = Game::default();
        game.place_plane(c(4, 4)).unwrap();
        game.pointer(Move(c(0, 0)));
        let preview = game.preview().unwrap();
        assert_eq!(preview.layer, Layer::Fleet);
        assert!(!preview.valid);
        game.pointer(Move(c(4, 3)));
        assert!(!game.preview().unwrap().valid);
        game.pointer(Move(c(4, 6)));
        assert_eq!(game.preview(), None);
        game.pointer(Move(c(2, 0)));
        assert!(game.preview().unwrap().valid);
    }

    #[test]
    fn pointer_drives_battle() {
        use crate::input::PointerEvent::*;

        let mut game = battle();
        game.pointer(Down(c(2, 0)));
        assert_eq!(game.pointer(Up(c(2, 0))), Some(Intent::Attack(c(2, 0))));
        assert_eq!(game.alive_count(Player::P2), 2);
        game.pointer(Down(c(7, 0)));
        assert_eq!(game.pointer(Up(c(7, 0))), None);
        assert_eq!(game.alive_count(Player::P2), 2);

        game.set_tool(ToolMode::Deduce).unwrap();
        game.pointer(Down(c(5, 5)));
        assert_eq!(game.pointer(Up(c(5, 5))), Some(Intent::PlaceGhost(c(5, 5))));
        let id = game.selected_ghost().unwrap();
        assert_eq!(game.pointer(Down(c(0, 9))), Some(Intent::Deselect));
        assert_eq!(game.selected_ghost(), None);
        game.pointer(Cancel);
        assert_eq!(game.pointer(Down(c(5, 7))), Some(Intent::Select(id)));
        game.pointer(Cancel);
        assert_eq!(game.selected_ghost(), Some(id));
    }
}
