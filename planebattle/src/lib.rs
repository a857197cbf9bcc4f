//! Rules engine for plane battle: a two player, pass-the-device variant of Battleship
//! where each player hides a few ten-cell planes on their grid and the first player to
//! shoot the head off every enemy plane wins.
//!
//! The engine is pure state transformation. A presentation layer feeds it pointer
//! events that have already been resolved to grid [`Coordinate`]s and timer callbacks,
//! and renders the [`Game`] record after every call.
//!
//! - [`planes`] defines the plane shape, its rotation and the placement validity check.
//! - [`board`] holds the grid, the setup-phase fleet and the battle-phase board.
//! - [`game`] is the phase and turn controller.
//! - [`input`] classifies pointer gestures into game actions.
//! - [`config`] holds the tunable constants.

pub mod board;
pub mod config;
pub mod game;
pub mod input;
pub mod planes;

pub use crate::{
    board::Coordinate,
    config::GameConfig,
    game::{Game, Phase, Player},
};
