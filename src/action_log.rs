use crate::engine::Engine;
use crate::error::ActionLogError;
use crate::grid::Coord;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

/// Host operations on the engine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Resize and/or change obstacle probability
    SetGridParams { width: i32, height: i32, probability: f32 },
    SetStart { x: i32, y: i32 },
    SetGoal { x: i32, y: i32 },
    /// Place (or toggle off) a manual obstacle
    AddObstacle { x: i32, y: i32 },
    RemoveObstacle { x: i32, y: i32 },
    ClearObstacles,
    /// Move the obstacle cursor, placing an obstacle if it moved
    SetObstacleCursor { x: i32, y: i32 },
    Recompute,
}

/// Logged action with timestamp
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoggedAction {
    /// Milliseconds since start
    pub timestamp_ms: u64,
    pub action: Action,
}

/// Action logger
pub struct ActionLog {
    start_time: Instant,
    actions: Vec<LoggedAction>,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionLog {
    pub fn new() -> Self {
        ActionLog {
            start_time: Instant::now(),
            actions: Vec::new(),
        }
    }

    /// Log an action with current timestamp
    pub fn log(&mut self, action: Action) {
        let timestamp_ms = self.start_time.elapsed().as_millis() as u64;
        self.actions.push(LoggedAction {
            timestamp_ms,
            action,
        });
    }

    /// Log an action and apply it to the engine
    pub fn record(&mut self, action: Action, engine: &mut Engine) {
        apply(&action, engine);
        self.log(action);
    }

    pub fn actions(&self) -> &[LoggedAction] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Apply every logged action to the engine in order
    pub fn replay(&self, engine: &mut Engine) {
        info!("Replaying {} actions", self.actions.len());
        for logged in &self.actions {
            apply(&logged.action, engine);
        }
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ActionLogError> {
        let json = serde_json::to_string_pretty(&self.actions)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a log previously written by `save_to_file`
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ActionLogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ActionLogError> {
        let actions: Vec<LoggedAction> = serde_json::from_str(json)?;
        Ok(ActionLog {
            start_time: Instant::now(),
            actions,
        })
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let mut added = 0;
        let mut removed = 0;
        let mut clears = 0;
        let mut resizes = 0;
        let mut endpoint_moves = 0;

        for logged in &self.actions {
            match &logged.action {
                Action::AddObstacle { .. } | Action::SetObstacleCursor { .. } => added += 1,
                Action::RemoveObstacle { .. } => removed += 1,
                Action::ClearObstacles => clears += 1,
                Action::SetGridParams { .. } => resizes += 1,
                Action::SetStart { .. } | Action::SetGoal { .. } => endpoint_moves += 1,
                Action::Recompute => {}
            }
        }

        let duration = self.actions.last().map_or(0, |last| last.timestamp_ms);

        format!(
            "Session Duration: {}ms\n\
             Total Events: {}\n\
             Obstacle Edits: {} placed, {} removed, {} clears\n\
             Grid Changes: {} param updates, {} start/goal moves",
            duration,
            self.actions.len(),
            added,
            removed,
            clears,
            resizes,
            endpoint_moves
        )
    }
}

/// Apply a single action to the engine. Obstacle failures surface as
/// engine diagnostics.
pub fn apply(action: &Action, engine: &mut Engine) {
    debug!("Applying {:?}", action);
    match *action {
        Action::SetGridParams {
            width,
            height,
            probability,
        } => engine.set_grid_params(width, height, probability),
        Action::SetStart { x, y } => engine.set_start(Coord::new(x, y)),
        Action::SetGoal { x, y } => engine.set_goal(Coord::new(x, y)),
        Action::AddObstacle { x, y } => {
            let _ = engine.add_obstacle(Coord::new(x, y));
        }
        Action::RemoveObstacle { x, y } => {
            engine.remove_obstacle(Coord::new(x, y));
        }
        Action::ClearObstacles => engine.clear_obstacles(),
        Action::SetObstacleCursor { x, y } => {
            let _ = engine.set_obstacle_cursor(Coord::new(x, y));
        }
        Action::Recompute => engine.recompute(),
    }
}
