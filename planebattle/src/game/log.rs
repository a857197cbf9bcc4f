//! History of shots fired.
use std::fmt;

use crate::{
    board::{Coordinate, ShotOutcome},
    game::Player,
};

/// What a shot did, as announced to both players.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackOutcome {
    Miss,
    Hit,
    Kill,
}

impl From<ShotOutcome> for AttackOutcome {
    fn from(outcome: ShotOutcome) -> Self {
        match outcome {
            ShotOutcome::Miss => AttackOutcome::Miss,
            ShotOutcome::Hit(_) => AttackOutcome::Hit,
            ShotOutcome::Kill(_) => AttackOutcome::Kill,
        }
    }
}

impl fmt::Display for AttackOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(match self {
            AttackOutcome::Miss => "MISS",
            AttackOutcome::Hit => "HIT",
            AttackOutcome::Kill => "KILL",
        })
    }
}

/// One entry of the turn log.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnRecord {
    /// 1-based sequence number of the shot within the game.
    pub turn: usize,
    /// Player who fired.
    pub player: Player,
    /// Display name of the player who fired, at the time of the shot.
    pub player_name: String,
    /// Cell that was shot.
    pub coord: Coordinate,
    pub outcome: AttackOutcome,
}

impl TurnRecord {
    /// Label of the cell that was shot, such as `"B5"`.
    pub fn label(&self) -> String {
        self.coord.label()
    }
}

impl fmt::Display for TurnRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "#{} {} {} {}",
            self.turn, self.player_name, self.coord, self.outcome
        )
    }
}

/// Append-only log of every shot in the game.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnLog {
    records: Vec<TurnRecord>,
}

impl TurnLog {
    /// Record a shot, numbering it after the previous ones.
    pub(crate) fn record(
        &mut self,
        player: Player,
        player_name: &str,
        coord: Coordinate,
        outcome: AttackOutcome,
    ) -> &TurnRecord {
        self.records.push(TurnRecord {
            turn: self.records.len() + 1,
            player,
            player_name: player_name.to_owned(),
            coord,
            outcome,
        });
        &self.records[self.records.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in the order the shots were fired.
    pub fn records(&self) -> &[TurnRecord] {
        &self.records
    }

    /// Records newest first.
    pub fn recent(&self) -> impl '_ + Iterator<Item = &TurnRecord> {
        self.records.iter().rev()
    }
}
