use thiserror::Error;

use crate::core::types::Coord;

/// Recoverable command failures. Every variant leaves the game state
/// untouched; the message is suitable for the player-facing log.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Insufficient resources: {0}")]
    InsufficientResources(String),

    #[error("Cannot reach {0}")]
    IllegalDestination(Coord),

    #[error("Target tile {0} is occupied")]
    OccupiedTarget(Coord),

    #[error("Terrain at {0} cannot be captured")]
    NotCapturable(Coord),

    #[error("Command issued by a faction whose turn it is not")]
    OutOfTurn,

    #[error("The game is over")]
    GameOver,
}

pub type Result<T> = std::result::Result<T, EngineError>;
