pub mod action_log;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod obstacles;
pub mod pathfinding;

pub use config::Config;
pub use engine::{Diagnostic, Engine, GridParams};
pub use error::{EngineError, Result};
pub use grid::{CellState, Coord, Grid, ObstacleKind};
pub use obstacles::{AddOutcome, ObstacleRegistry, OverlayPolicy, RemovalPolicy};
pub use pathfinding::{find_path, format_path, SearchOutcome, SearchState};
