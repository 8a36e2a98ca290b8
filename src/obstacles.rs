//! Manually placed obstacles and their reconciliation into the grid.

use crate::error::{EngineError, Result};
use crate::grid::{CellState, Coord, Grid, ObstacleKind};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How many manual obstacles the registry keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayPolicy {
    /// Every placed obstacle is kept until removed or cleared
    #[default]
    ManualList,
    /// Only the most recently placed obstacle is kept
    SingleSlot,
}

/// What happens to the grid cell when a manual obstacle is removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Only clear cells that are blocked by the registry itself
    #[default]
    PreserveProcedural,
    /// Always clear the cell, even if generation blocked it too
    AlwaysClear,
}

/// What an `add` call ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// The coordinate was already registered and has been removed
    Toggled,
}

/// Set of manually placed obstacles, kept separate from procedural ones
#[derive(Debug, Clone, Default)]
pub struct ObstacleRegistry {
    entries: BTreeSet<Coord>,
    /// Most recently added entry, kept when switching to single slot
    latest: Option<Coord>,
    overlay: OverlayPolicy,
    removal: RemovalPolicy,
}

impl ObstacleRegistry {
    pub fn new(overlay: OverlayPolicy, removal: RemovalPolicy) -> Self {
        ObstacleRegistry {
            entries: BTreeSet::new(),
            latest: None,
            overlay,
            removal,
        }
    }

    pub fn overlay(&self) -> OverlayPolicy {
        self.overlay
    }

    pub fn removal(&self) -> RemovalPolicy {
        self.removal
    }

    /// Switch policies, keeping the registered entries. Switching to single
    /// slot drops everything except the most recently added entry.
    pub fn set_policies(&mut self, overlay: OverlayPolicy, removal: RemovalPolicy, grid: &mut Grid) {
        self.overlay = overlay;
        self.removal = removal;
        if overlay == OverlayPolicy::SingleSlot && self.entries.len() > 1 {
            let keep = self.latest.or_else(|| self.entries.last().copied());
            let dropped: Vec<Coord> = self.iter().filter(|&c| Some(c) != keep).collect();
            for coord in dropped {
                self.remove(coord, grid);
            }
        }
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.entries.contains(&coord)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered coordinates in sorted order
    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.entries.iter().copied()
    }

    /// Register an obstacle. Adding a coordinate that is already registered
    /// toggles it off instead.
    pub fn add(&mut self, coord: Coord, grid: &mut Grid) -> Result<AddOutcome> {
        if self.contains(coord) {
            self.remove(coord, grid);
            return Ok(AddOutcome::Toggled);
        }
        if !grid.is_free(coord) {
            return Err(EngineError::InvalidObstaclePosition { coord });
        }

        if self.overlay == OverlayPolicy::SingleSlot {
            let previous: Vec<Coord> = self.iter().collect();
            for old in previous {
                self.remove(old, grid);
            }
        }

        grid.set_state(coord, CellState::Blocked(ObstacleKind::Manual));
        self.entries.insert(coord);
        self.latest = Some(coord);
        debug!("Registered obstacle at {}", coord);
        Ok(AddOutcome::Added)
    }

    /// Unregister an obstacle. Returns false if it was not registered.
    pub fn remove(&mut self, coord: Coord, grid: &mut Grid) -> bool {
        if !self.entries.remove(&coord) {
            return false;
        }
        if self.latest == Some(coord) {
            self.latest = None;
        }
        self.release_cell(coord, grid);
        debug!("Removed obstacle at {}", coord);
        true
    }

    /// Reapply every registered obstacle to a freshly generated grid.
    /// Returns how many cells were newly blocked.
    pub fn reconcile(&self, grid: &mut Grid) -> usize {
        let mut applied = 0;
        for &coord in &self.entries {
            if grid.is_free(coord) {
                grid.set_state(coord, CellState::Blocked(ObstacleKind::Manual));
                applied += 1;
            }
        }
        applied
    }

    /// Drop every entry and free the cells they blocked.
    /// Returns how many entries were removed.
    pub fn clear(&mut self, grid: &mut Grid) -> usize {
        let entries = std::mem::take(&mut self.entries);
        self.latest = None;
        for &coord in &entries {
            self.release_cell(coord, grid);
        }
        info!("Added obstacles erased ({} entries)", entries.len());
        entries.len()
    }

    fn release_cell(&self, coord: Coord, grid: &mut Grid) {
        match (self.removal, grid.state(coord)) {
            (_, None) | (_, Some(CellState::Free)) => {}
            (RemovalPolicy::AlwaysClear, Some(_)) => {
                grid.set_state(coord, CellState::Free);
            }
            (RemovalPolicy::PreserveProcedural, Some(CellState::Blocked(kind))) => {
                if kind == ObstacleKind::Manual {
                    grid.set_state(coord, CellState::Free);
                }
            }
        }
    }
}
