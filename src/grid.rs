use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// A cell coordinate on the grid: x is the column, y is the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// Manhattan distance, which is the BFS edge count on an empty grid
    pub fn manhattan(&self, other: &Coord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// True if the two coordinates differ by exactly one axis-aligned step
    pub fn is_adjacent(&self, other: &Coord) -> bool {
        self.manhattan(other) == 1
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Coord::new(x, y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Where a blocked cell came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Produced by random generation
    Procedural,
    /// Placed explicitly by the host
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Free,
    Blocked(ObstacleKind),
}

impl CellState {
    pub fn is_free(&self) -> bool {
        matches!(self, CellState::Free)
    }
}

/// Occupancy grid, stored row-major (`height` rows of `width` cells)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<CellState>,
    /// Incremented whenever a cell actually changes
    revision: u64,
}

impl Default for Grid {
    fn default() -> Self {
        Grid::new(0, 0)
    }
}

impl Grid {
    /// Create a grid with every cell free. Negative sizes are treated as zero.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Grid {
            width,
            height,
            cells: vec![CellState::Free; width as usize * height as usize],
            revision: 0,
        }
    }

    /// Create a grid with specific procedurally blocked cells
    pub fn with_blocked(width: i32, height: i32, blocked: &[Coord]) -> Self {
        let mut grid = Self::new(width, height);
        for &coord in blocked {
            grid.set_state(coord, CellState::Blocked(ObstacleKind::Procedural));
        }
        grid
    }

    /// Build a grid from rows of 0 (free) / non-zero (blocked) values.
    /// Short rows are padded with free cells up to the longest row.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Self {
        let height = rows.len() as i32;
        let width = rows.iter().map(|r| r.as_ref().len()).max().unwrap_or(0) as i32;
        let mut grid = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, &value) in row.as_ref().iter().enumerate() {
                if value != 0 {
                    grid.set_state(
                        Coord::new(x as i32, y as i32),
                        CellState::Blocked(ObstacleKind::Procedural),
                    );
                }
            }
        }
        grid
    }

    /// Generate a random grid using thread-local randomness
    pub fn generate(width: i32, height: i32, probability: f32) -> Self {
        Self::generate_with(width, height, probability, &mut rand::rng())
    }

    /// Generate a random grid: each cell draws a value in [0, 100) and is
    /// blocked when the value is below `probability`.
    pub fn generate_with<R: Rng>(
        width: i32,
        height: i32,
        probability: f32,
        rng: &mut R,
    ) -> Self {
        let mut grid = Self::new(width, height);
        for cell in grid.cells.iter_mut() {
            let roll: f32 = rng.random_range(0.0..100.0);
            if roll < probability {
                *cell = CellState::Blocked(ObstacleKind::Procedural);
            }
        }
        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    /// Out-of-bounds coordinates are never free
    pub fn is_free(&self, coord: Coord) -> bool {
        self.state(coord).is_some_and(|s| s.is_free())
    }

    /// Cell state, or `None` when out of bounds
    pub fn state(&self, coord: Coord) -> Option<CellState> {
        self.index(coord).map(|i| self.cells[i])
    }

    /// Mark a cell blocked (as a procedural obstacle) or free. No-op if out of bounds.
    pub fn set_blocked(&mut self, coord: Coord, blocked: bool) {
        let state = if blocked {
            CellState::Blocked(ObstacleKind::Procedural)
        } else {
            CellState::Free
        };
        self.set_state(coord, state);
    }

    /// Set the exact cell state. Returns true if the cell changed.
    pub fn set_state(&mut self, coord: Coord, state: CellState) -> bool {
        let Some(i) = self.index(coord) else {
            return false;
        };
        if self.cells[i] == state {
            return false;
        }
        self.cells[i] = state;
        self.revision += 1;
        true
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn blocked_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_free()).count()
    }

    /// Iterate every cell in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Coord, CellState)> + '_ {
        let width = self.width.max(1) as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &s)| (Coord::new((i % width) as i32, (i / width) as i32), s))
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if self.is_in_bounds(coord) {
            Some(coord.y as usize * self.width as usize + coord.x as usize)
        } else {
            None
        }
    }
}
