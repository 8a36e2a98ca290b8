use crate::grid::{Coord, Grid};
use log::{debug, trace};
use std::collections::{HashMap, VecDeque};

/// Neighbor visitation order: +x, -x, +y, -y.
/// This order decides which of several shortest paths is returned.
pub const DIRECTIONS: [Coord; 4] = [
    Coord::new(1, 0),
    Coord::new(-1, 0),
    Coord::new(0, 1),
    Coord::new(0, -1),
];

/// Breadth-first search state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Searching,
    Found,
    NotFound,
}

/// Result of one search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub state: SearchState,
    /// Start to goal inclusive, empty when no path exists
    pub path: Vec<Coord>,
    /// Number of cells dequeued from the frontier
    pub explored: usize,
}

impl SearchOutcome {
    fn not_found(explored: usize) -> Self {
        SearchOutcome {
            state: SearchState::NotFound,
            path: Vec::new(),
            explored,
        }
    }

    pub fn is_found(&self) -> bool {
        self.state == SearchState::Found
    }

    /// Path length in edges
    pub fn edges(&self) -> usize {
        path_edges(&self.path)
    }
}

/// Find a shortest 4-connected path from `start` to `goal` over free cells.
pub fn find_path(grid: &Grid, start: Coord, goal: Coord) -> SearchOutcome {
    if start == goal {
        return SearchOutcome {
            state: SearchState::Found,
            path: vec![start],
            explored: 0,
        };
    }

    if !grid.is_free(start) || !grid.is_free(goal) {
        debug!("[find_path] start {} or goal {} is not a free cell", start, goal);
        return SearchOutcome::not_found(0);
    }

    let mut frontier: VecDeque<Coord> = VecDeque::new();
    let mut came_from: HashMap<Coord, Coord> = HashMap::new();
    frontier.push_back(start);
    came_from.insert(start, start);

    let mut state = SearchState::Searching;
    let mut explored = 0;
    while let Some(current) = frontier.pop_front() {
        explored += 1;
        if current == goal {
            state = SearchState::Found;
            break;
        }

        for direction in DIRECTIONS {
            let next = current + direction;
            if grid.is_free(next) && !came_from.contains_key(&next) {
                trace!("[find_path] {} -> {}", current, next);
                frontier.push_back(next);
                came_from.insert(next, current);
            }
        }
    }

    if state != SearchState::Found {
        debug!(
            "[find_path] NO PATH from {} to {} after {} cells",
            start, goal, explored
        );
        return SearchOutcome::not_found(explored);
    }

    let path = trace_back(&came_from, start, goal);
    debug!(
        "[find_path] FOUND PATH: {} edges after {} cells",
        path_edges(&path),
        explored
    );
    SearchOutcome {
        state,
        path,
        explored,
    }
}

/// Walk predecessors from goal back to start, then reverse
fn trace_back(came_from: &HashMap<Coord, Coord>, start: Coord, goal: Coord) -> Vec<Coord> {
    let mut path = Vec::new();
    let mut step = goal;
    while step != start {
        path.push(step);
        step = came_from[&step];
    }
    path.push(start);
    path.reverse();
    path
}

/// Number of moves in a path
pub fn path_edges(path: &[Coord]) -> usize {
    path.len().saturating_sub(1)
}

/// Format path for display
pub fn format_path(path: &[Coord]) -> String {
    if path.is_empty() {
        return "No path".to_string();
    }

    path.iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
