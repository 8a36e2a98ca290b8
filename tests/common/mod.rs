use gridpath::{Coord, Grid};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Path fixture parsed from the text format in test_data/paths
///
/// Format:
/// - `# expect: found` or `# expect: none` header
/// - s: start, g: goal
/// - ■: blocked cell
/// - □: free cell
/// - *: free cell on the expected path
#[derive(Debug, Clone)]
pub struct PathFixture {
    pub name: String,
    pub grid: Grid,
    pub start: Coord,
    pub goal: Coord,
    pub expect_found: bool,
    /// Path cells excluding start and goal
    pub expected: HashSet<Coord>,
}

pub fn parse_path_fixture(path: &Path) -> Result<PathFixture, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    let mut expect_found = None;
    let mut grid_lines = Vec::new();
    for line in contents.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(header) = line.strip_prefix('#') {
            match header.trim() {
                "expect: found" => expect_found = Some(true),
                "expect: none" => expect_found = Some(false),
                _ => {}
            }
            continue;
        }
        grid_lines.push(line);
    }

    let expect_found = expect_found.ok_or("missing '# expect:' header")?;
    if grid_lines.is_empty() {
        return Err("No grid lines found in fixture".into());
    }

    let width = grid_lines[0].chars().count();
    let mut rows = Vec::new();
    let mut start = None;
    let mut goal = None;
    let mut expected = HashSet::new();

    for (y, line) in grid_lines.iter().enumerate() {
        if line.chars().count() != width {
            return Err(format!("row {} has a different width", y).into());
        }
        let mut row = Vec::with_capacity(width);
        for (x, ch) in line.chars().enumerate() {
            let coord = Coord::new(x as i32, y as i32);
            match ch {
                '■' => row.push(1u8),
                '□' => row.push(0),
                's' => {
                    start = Some(coord);
                    row.push(0);
                }
                'g' => {
                    goal = Some(coord);
                    row.push(0);
                }
                '*' => {
                    expected.insert(coord);
                    row.push(0);
                }
                other => return Err(format!("unexpected character '{}'", other).into()),
            }
        }
        rows.push(row);
    }

    Ok(PathFixture {
        name,
        grid: Grid::from_rows(&rows),
        start: start.ok_or("No start position 's' found")?,
        goal: goal.ok_or("No goal position 'g' found")?,
        expect_found,
        expected,
    })
}

fn mirror(c: Coord, grid: &Grid, flip_x: bool, flip_y: bool) -> Coord {
    Coord::new(
        if flip_x { grid.width() - 1 - c.x } else { c.x },
        if flip_y { grid.height() - 1 - c.y } else { c.y },
    )
}

/// Mirror a fixture horizontally and/or vertically
pub fn flip_fixture(fixture: &PathFixture, flip_x: bool, flip_y: bool) -> PathFixture {
    let grid = &fixture.grid;
    let blocked: Vec<Coord> = grid
        .iter()
        .filter(|(_, s)| !s.is_free())
        .map(|(c, _)| mirror(c, grid, flip_x, flip_y))
        .collect();

    let suffix = match (flip_x, flip_y) {
        (true, true) => "_hv_flip",
        (true, false) => "_h_flip",
        (false, true) => "_v_flip",
        (false, false) => "",
    };

    PathFixture {
        name: format!("{}{}", fixture.name, suffix),
        grid: Grid::with_blocked(grid.width(), grid.height(), &blocked),
        start: mirror(fixture.start, grid, flip_x, flip_y),
        goal: mirror(fixture.goal, grid, flip_x, flip_y),
        expect_found: fixture.expect_found,
        expected: fixture
            .expected
            .iter()
            .map(|&c| mirror(c, grid, flip_x, flip_y))
            .collect(),
    }
}

/// All fixtures under test_data/paths, sorted by file name
pub fn load_fixtures() -> Vec<PathFixture> {
    let mut entries: Vec<_> = fs::read_dir("./test_data/paths")
        .expect("test_data/paths should exist")
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("txt"))
        .collect();
    entries.sort();

    entries
        .iter()
        .map(|p| parse_path_fixture(p).unwrap_or_else(|e| panic!("{}: {}", p.display(), e)))
        .collect()
}

/// Shortest distance by repeated relaxation, independent of any visiting order
pub fn reference_distance(grid: &Grid, start: Coord, goal: Coord) -> Option<usize> {
    if start == goal {
        return Some(0);
    }
    if !grid.is_free(start) || !grid.is_free(goal) {
        return None;
    }

    let mut dist: HashMap<Coord, usize> = HashMap::new();
    dist.insert(start, 0);
    loop {
        let mut changed = false;
        for (cell, state) in grid.iter() {
            if !state.is_free() || cell == start {
                continue;
            }
            let best_neighbor = [(0, -1), (0, 1), (-1, 0), (1, 0)]
                .iter()
                .filter_map(|&(dx, dy)| dist.get(&Coord::new(cell.x + dx, cell.y + dy)))
                .min()
                .copied();
            if let Some(d) = best_neighbor {
                let candidate = d + 1;
                if dist.get(&cell).map_or(true, |&cur| candidate < cur) {
                    dist.insert(cell, candidate);
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
    dist.get(&goal).copied()
}

/// Check that a path is a chain of adjacent, in-bounds, free cells
pub fn assert_valid_path(grid: &Grid, path: &[Coord], start: Coord, goal: Coord) {
    assert_eq!(path.first(), Some(&start), "path must begin at start");
    assert_eq!(path.last(), Some(&goal), "path must end at goal");
    for window in path.windows(2) {
        assert!(
            window[0].is_adjacent(&window[1]),
            "{} and {} are not adjacent",
            window[0],
            window[1]
        );
    }
    if path.len() > 1 {
        for &c in path {
            assert!(grid.is_in_bounds(c), "{} out of bounds", c);
            assert!(grid.is_free(c), "{} is blocked", c);
        }
    }
}

/// Visualize a path on a grid, in the fixture format
pub fn visualize_path(grid: &Grid, path: &[Coord], start: Coord, goal: Coord) -> String {
    let on_path: HashSet<Coord> = path.iter().copied().collect();
    let mut result = String::new();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let c = Coord::new(x, y);
            let symbol = if c == start {
                's'
            } else if c == goal {
                'g'
            } else if on_path.contains(&c) {
                '*'
            } else if grid.is_free(c) {
                '□'
            } else {
                '■'
            };
            result.push(symbol);
        }
        result.push('\n');
    }
    result
}
