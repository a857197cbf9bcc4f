//! Tunable constants of a game.
use std::time::Duration;

use thiserror::Error;

use crate::{board::Dimensions, planes::PlaneShape};

/// Reason a [`GameConfig`] was rejected.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum ConfigError {
    #[error("grid size must be between 1 and {max}, got {0}", max = Dimensions::MAX_SIZE)]
    GridSize(usize),
    #[error("each player needs at least one plane")]
    NoPlanes,
}

/// Settings for a game.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Side length of each player's square grid.
    pub grid_size: usize,
    /// Number of planes each player must place.
    pub planes_per_player: usize,
    /// Shape shared by every plane.
    pub shape: PlaneShape,
    /// How long the presentation layer waits before finishing an automatic handoff
    /// between players.
    pub handoff_delay: Duration,
    /// Display names of player 1 and player 2.
    pub player_names: [String; 2],
}

impl GameConfig {
    /// Check the settings, returning the board dimensions they describe.
    pub fn validate(&self) -> Result<Dimensions, ConfigError> {
        let dim = Dimensions::try_new(self.grid_size).ok_or(ConfigError::GridSize(self.grid_size))?;
        if self.planes_per_player == 0 {
            return Err(ConfigError::NoPlanes);
        }
        Ok(dim)
    }
}

impl Default for GameConfig {
    /// The standard game: a 10x10 grid, three standard planes each.
    fn default() -> Self {
        Self {
            grid_size: 10,
            planes_per_player: 3,
            shape: PlaneShape::standard(),
            handoff_delay: Duration::from_millis(100),
            player_names: ["Player 1".to_owned(), "Player 2".to_owned()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(Dimensions::new(10)));
    }

    #[test]
    fn rejects_bad_values() {
        let config = GameConfig {
            grid_size: 27,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::GridSize(27)));
        let config = GameConfig {
            planes_per_player: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoPlanes));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn shape_tables_are_validated_when_loaded() {
        let json = r#"{ "grid_size": 8, "shape": [{ "dx": 1, "dy": 0, "part": "Head" }] }"#;
        assert!(serde_json::from_str::<GameConfig>(json).is_err());
        let json = r#"{ "grid_size": 8, "shape": [{ "dx": 0, "dy": 0, "part": "Head" }] }"#;
        let config: GameConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.grid_size, 8);
        assert_eq!(config.planes_per_player, 3);
        assert_eq!(config.shape.len(), 1);
    }
}
