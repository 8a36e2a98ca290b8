//! Error types for gridpath

use crate::grid::Coord;
use thiserror::Error;

/// Recoverable engine conditions. None of these halt the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("coordinate {coord} is outside the grid")]
    OutOfBounds { coord: Coord },

    #[error("invalid position for an obstacle or already occupied: {coord}")]
    InvalidObstaclePosition { coord: Coord },

    #[error("path not found from {start} to {goal}")]
    PathNotFound { start: Coord, goal: Coord },
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Action log save/load errors
#[derive(Error, Debug)]
pub enum ActionLogError {
    #[error("failed to access action log: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to (de)serialize action log: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
