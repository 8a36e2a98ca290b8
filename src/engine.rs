//! Engine: owns the grid, manual obstacles and the current path, and keeps
//! them consistent.
//!
//! Every mutating call ends with [`Engine::recompute`], which
//! 1. regenerates the grid only if size or probability changed since the last generation,
//! 2. reconciles manual obstacles into the grid,
//! 3. reruns the breadth-first search and stores the result.

use crate::config::Config;
use crate::error::{EngineError, Result};
use crate::grid::{Coord, Grid};
use crate::obstacles::{AddOutcome, ObstacleRegistry, OverlayPolicy, RemovalPolicy};
use crate::pathfinding::{find_path, format_path, SearchOutcome, SearchState};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default cap for each grid axis
pub const DEFAULT_MAX_SIZE: i32 = 20;

/// Undrained diagnostics beyond this are dropped, oldest first
pub const MAX_DIAGNOSTICS: usize = 256;

/// Size and obstacle probability used to generate the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridParams {
    pub width: i32,
    pub height: i32,
    /// Percent chance (0-100) that a cell is blocked
    pub probability: f32,
}

impl GridParams {
    pub fn new(width: i32, height: i32, probability: f32) -> Self {
        GridParams {
            width,
            height,
            probability,
        }
    }

    /// Clamp each axis into [0, max_size] and probability into [0, 100].
    /// NaN probability becomes 0.
    pub fn clamped(self, max_size: i32) -> Self {
        let max_size = max_size.max(0);
        let probability = if self.probability.is_nan() {
            0.0
        } else {
            self.probability.clamp(0.0, 100.0)
        };
        GridParams {
            width: self.width.clamp(0, max_size),
            height: self.height.clamp(0, max_size),
            probability,
        }
    }
}

/// Non-fatal events for the host to surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Diagnostic {
    PathNotFound { start: Coord, goal: Coord },
    InvalidObstaclePosition { coord: Coord },
    ObstaclesCleared { count: usize },
    GridRegenerated { width: i32, height: i32, blocked: usize },
}

pub struct Engine {
    params: GridParams,
    max_size: i32,
    /// Params the current grid was generated from; `None` forces regeneration
    generated_for: Option<GridParams>,
    start: Coord,
    goal: Coord,
    grid: Grid,
    obstacles: ObstacleRegistry,
    cursor: Option<Coord>,
    outcome: SearchOutcome,
    rng: StdRng,
    diagnostics: VecDeque<Diagnostic>,
}

impl Engine {
    /// Engine seeded from OS entropy
    pub fn new(params: GridParams, start: Coord, goal: Coord) -> Self {
        Self::build(params, start, goal, StdRng::from_os_rng(), DEFAULT_MAX_SIZE)
    }

    /// Engine with reproducible grid generation
    pub fn with_seed(params: GridParams, start: Coord, goal: Coord, seed: u64) -> Self {
        Self::build(params, start, goal, StdRng::seed_from_u64(seed), DEFAULT_MAX_SIZE)
    }

    fn build(params: GridParams, start: Coord, goal: Coord, rng: StdRng, max_size: i32) -> Self {
        let max_size = max_size.max(0);
        let mut engine = Self::assemble(params.clamped(max_size), max_size, start, goal, rng);
        engine.recompute();
        engine
    }

    /// Engine over a fixed grid. The grid is kept until the grid params change.
    pub fn with_grid(grid: Grid, start: Coord, goal: Coord) -> Self {
        let params = GridParams::new(grid.width(), grid.height(), 0.0);
        let max_size = DEFAULT_MAX_SIZE.max(grid.width()).max(grid.height());
        let mut engine = Self::assemble(params, max_size, start, goal, StdRng::seed_from_u64(0));
        engine.generated_for = Some(params);
        engine.grid = grid;
        engine.recompute();
        engine
    }

    fn assemble(params: GridParams, max_size: i32, start: Coord, goal: Coord, rng: StdRng) -> Self {
        Engine {
            params,
            max_size,
            generated_for: None,
            start,
            goal,
            grid: Grid::default(),
            obstacles: ObstacleRegistry::default(),
            cursor: None,
            outcome: SearchOutcome {
                state: SearchState::Searching,
                path: Vec::new(),
                explored: 0,
            },
            rng,
            diagnostics: VecDeque::new(),
        }
    }

    /// Build an engine from configuration, including initial manual obstacles
    pub fn from_config(config: &Config) -> Self {
        let params = GridParams::new(
            config.grid.width,
            config.grid.height,
            config.grid.obstacle_probability,
        );
        let (start, goal) = (config.path.start, config.path.goal);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut engine = Self::build(params, start, goal, rng, config.grid.max_size);
        engine.obstacles = ObstacleRegistry::new(config.obstacles.overlay, config.obstacles.removal);
        for &coord in &config.obstacles.initial {
            if engine.obstacles.contains(coord) {
                debug!("Initial obstacle {} listed more than once", coord);
                continue;
            }
            // Failures are recorded as diagnostics
            let _ = engine.add_obstacle(coord);
        }
        engine
    }

    /// Change the per-axis cap and reclamp the current params
    pub fn set_max_size(&mut self, max_size: i32) {
        self.max_size = max_size.max(0);
        self.params = self.params.clamped(self.max_size);
        self.recompute();
    }

    /// Replace the overlay/removal policies. Existing entries are kept.
    pub fn set_policies(&mut self, overlay: OverlayPolicy, removal: RemovalPolicy) {
        self.obstacles.set_policies(overlay, removal, &mut self.grid);
        self.recompute();
    }

    pub fn set_grid_params(&mut self, width: i32, height: i32, probability: f32) {
        let requested = GridParams::new(width, height, probability);
        let clamped = requested.clamped(self.max_size);
        if clamped != requested {
            debug!("Grid params {:?} clamped to {:?}", requested, clamped);
        }
        self.params = clamped;
        self.recompute();
    }

    pub fn set_start(&mut self, coord: Coord) {
        self.start = coord;
        self.recompute();
    }

    pub fn set_goal(&mut self, coord: Coord) {
        self.goal = coord;
        self.recompute();
    }

    /// Place a manual obstacle, or remove it if it is already registered
    pub fn add_obstacle(&mut self, coord: Coord) -> Result<AddOutcome> {
        let result = self.obstacles.add(coord, &mut self.grid);
        if let Err(EngineError::InvalidObstaclePosition { coord }) = result {
            warn!("Invalid position for an obstacle or already occupied: {}", coord);
            self.emit(Diagnostic::InvalidObstaclePosition { coord });
        }
        self.recompute();
        result
    }

    /// Returns false if the coordinate was not registered
    pub fn remove_obstacle(&mut self, coord: Coord) -> bool {
        let removed = self.obstacles.remove(coord, &mut self.grid);
        self.recompute();
        removed
    }

    /// Remove every manual obstacle and regenerate the grid from scratch
    pub fn clear_obstacles(&mut self) {
        let count = self.obstacles.clear(&mut self.grid);
        self.emit(Diagnostic::ObstaclesCleared { count });
        self.generated_for = None;
        self.recompute();
    }

    /// Place an obstacle only when the cursor moves to a new coordinate.
    /// Returns `Ok(None)` if the cursor did not move.
    pub fn set_obstacle_cursor(&mut self, coord: Coord) -> Result<Option<AddOutcome>> {
        if self.cursor == Some(coord) {
            return Ok(None);
        }
        self.cursor = Some(coord);
        self.add_obstacle(coord).map(Some)
    }

    /// Bring grid, obstacles and path up to date
    pub fn recompute(&mut self) {
        if self.generated_for != Some(self.params) {
            self.regenerate();
        }
        self.obstacles.reconcile(&mut self.grid);

        self.outcome = find_path(&self.grid, self.start, self.goal);
        match self.outcome.state {
            SearchState::Found => {
                debug!("Path: {}", format_path(&self.outcome.path));
            }
            _ => {
                warn!("Path not found from {} to {}", self.start, self.goal);
                self.emit(Diagnostic::PathNotFound {
                    start: self.start,
                    goal: self.goal,
                });
            }
        }
    }

    fn regenerate(&mut self) {
        let GridParams {
            width,
            height,
            probability,
        } = self.params;
        self.grid = Grid::generate_with(width, height, probability, &mut self.rng);
        self.generated_for = Some(self.params);

        let blocked = self.grid.blocked_count();
        info!(
            "Generated {}x{} grid ({}% obstacles, {} blocked)",
            width, height, probability, blocked
        );
        self.emit(Diagnostic::GridRegenerated {
            width,
            height,
            blocked,
        });
    }

    pub fn path(&self) -> &[Coord] {
        &self.outcome.path
    }

    pub fn outcome(&self) -> &SearchOutcome {
        &self.outcome
    }

    pub fn search_state(&self) -> SearchState {
        self.outcome.state
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn obstacles(&self) -> &ObstacleRegistry {
        &self.obstacles
    }

    pub fn params(&self) -> GridParams {
        self.params
    }

    pub fn max_size(&self) -> i32 {
        self.max_size
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    pub fn goal(&self) -> Coord {
        self.goal
    }

    pub fn diagnostics(&self) -> &VecDeque<Diagnostic> {
        &self.diagnostics
    }

    /// Drain diagnostics emitted since the last call
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.drain(..).collect()
    }

    /// Buffer a diagnostic. A repeated path failure for the same endpoints
    /// is only kept once.
    fn emit(&mut self, diagnostic: Diagnostic) {
        if matches!(diagnostic, Diagnostic::PathNotFound { .. })
            && self.diagnostics.back() == Some(&diagnostic)
        {
            return;
        }
        if self.diagnostics.len() == MAX_DIAGNOSTICS {
            self.diagnostics.pop_front();
        }
        self.diagnostics.push_back(diagnostic);
    }
}
