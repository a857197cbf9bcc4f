use thiserror::Error;

use crate::{
    board::{PlaceError, SetupError, ShotError, UnknownPlane},
    game::Phase,
};

/// Reason an action on the [`Game`][crate::game::Game] was rejected. A rejected action
/// never changes the game.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum GameError {
    /// The action is not available in the current phase.
    #[error("cannot {action} during {phase:?}")]
    WrongPhase { action: &'static str, phase: Phase },

    /// The active player already fired this turn.
    #[error("already fired this turn")]
    AlreadyFired,

    /// The active player tried to end the turn without firing.
    #[error("must fire before ending the turn")]
    NotFired,

    /// A ghost action needs a selected ghost.
    #[error("no ghost plane is selected")]
    NoSelection,

    #[error(transparent)]
    UnknownPlane(#[from] UnknownPlane),

    #[error(transparent)]
    Place(#[from] PlaceError),

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Shot(#[from] ShotError),
}
