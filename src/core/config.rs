//! Game configuration
//!
//! Collects the tunable rules of a match: faction count, economy rates,
//! the per-turn action pool, and the optional turn limit.

use serde::{Deserialize, Serialize};

use crate::core::types::Money;

/// Configuration for one match
///
/// Board dimensions are not part of the config; they arrive with the
/// generated board.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of factions contesting the board (2-4)
    pub factions: u8,

    /// Treasury each faction starts with
    pub starting_money: Money,

    /// Income credited to a faction when it ends its turn
    pub income_per_turn: Money,

    /// Action points available to the active faction each turn
    pub actions_per_turn: u32,

    /// Game ends by score once the turn counter passes this value
    pub turn_limit: Option<u32>,

    /// Seed for the deterministic game rng (combat rolls, AI dice)
    pub rng_seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            factions: 2,
            starting_money: 2000,
            income_per_turn: 500,
            actions_per_turn: 5,
            turn_limit: None,
            rng_seed: 0,
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if !(2..=4).contains(&self.factions) {
            return Err(format!(
                "faction count must be between 2 and 4, got {}",
                self.factions
            ));
        }

        if self.actions_per_turn == 0 {
            return Err("actions_per_turn must be positive".into());
        }

        if let Some(limit) = self.turn_limit {
            if limit == 0 {
                return Err("turn_limit must be positive when set".into());
            }
        }

        Ok(())
    }

    /// Parse a config from TOML text
    pub fn from_toml(text: &str) -> Result<Self, String> {
        let config: GameConfig = toml::from_str(text).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }
}
