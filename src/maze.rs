//! Maze save files for the three save slots
//!
//! A slot holds one JSON maze save: a versioned, timestamped wall grid
//! with an entry and an exit. The builder writes them, the gameplay
//! section reads them back. Unreadable saves are a transient condition
//! (the slot is simply treated as unused), unlike shipped assets whose
//! absence is fatal.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current maze save file version.
pub const CURRENT_MAZE_VERSION: u32 = 1;

/// Rectangular wall grid with an entry and an exit cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeGrid {
    pub width: usize,
    pub height: usize,
    /// Row-major wall flags, `walls[row * width + col]`.
    pub walls: Vec<bool>,
    pub entry: (usize, usize),
    pub exit: (usize, usize),
}

impl MazeGrid {
    /// Creates an all-passage grid with the entry in the top-left and the
    /// exit in the bottom-right corner.
    pub fn open(width: usize, height: usize) -> Self {
        MazeGrid {
            width,
            height,
            walls: vec![false; width * height],
            entry: (0, 0),
            exit: (width.saturating_sub(1), height.saturating_sub(1)),
        }
    }

    pub fn is_wall(&self, col: usize, row: usize) -> bool {
        col < self.width && row < self.height && self.walls[row * self.width + col]
    }

    /// Flips a cell between wall and passage. Entry and exit stay
    /// passable. Returns whether the grid changed.
    pub fn toggle_wall(&mut self, col: usize, row: usize) -> bool {
        if col >= self.width || row >= self.height {
            return false;
        }
        if (col, row) == self.entry || (col, row) == self.exit {
            return false;
        }
        let index = row * self.width + col;
        self.walls[index] = !self.walls[index];
        true
    }

    /// Whether two cells share an edge.
    pub fn adjacent(a: (usize, usize), b: (usize, usize)) -> bool {
        let dc = a.0.abs_diff(b.0);
        let dr = a.1.abs_diff(b.1);
        dc + dr == 1
    }
}

/// The root save file structure for one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeSave {
    pub version: u32,
    /// Human-readable creation time.
    pub created: String,
    pub grid: MazeGrid,
}

impl MazeSave {
    pub fn new(grid: MazeGrid) -> Self {
        MazeSave {
            version: CURRENT_MAZE_VERSION,
            created: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            grid,
        }
    }
}

/// Error types for maze save/load operations.
#[derive(Debug)]
pub enum SaveError {
    IoError(std::io::Error),
    SerializationError(serde_json::Error),
    InvalidVersion(u32),
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::IoError(e) => write!(f, "IO error: {}", e),
            SaveError::SerializationError(e) => write!(f, "Serialization error: {}", e),
            SaveError::InvalidVersion(v) => write!(f, "Invalid maze save version: {}", v),
        }
    }
}

impl std::error::Error for SaveError {}

impl From<std::io::Error> for SaveError {
    fn from(err: std::io::Error) -> Self {
        SaveError::IoError(err)
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(err: serde_json::Error) -> Self {
        SaveError::SerializationError(err)
    }
}

/// Writes `grid` to the given slot (0-based) under `dir` and returns the
/// save-file name recorded in the settings slot.
pub fn store_slot(dir: &Path, grid: &MazeGrid, slot: usize) -> Result<String, SaveError> {
    fs::create_dir_all(dir)?;
    let filename = slot_filename(slot);
    let save = MazeSave::new(grid.clone());
    let json = serde_json::to_string_pretty(&save)?;
    let filepath = dir.join(&filename);
    fs::write(&filepath, json)?;
    println!("Maze: saved to {}", filepath.display());
    Ok(filename)
}

/// Reads a maze save by its file name from `dir`.
pub fn load_save(dir: &Path, name: &str) -> Result<MazeSave, SaveError> {
    let json = fs::read_to_string(dir.join(name))?;
    let save: MazeSave = serde_json::from_str(&json)?;
    if save.version > CURRENT_MAZE_VERSION {
        return Err(SaveError::InvalidVersion(save.version));
    }
    Ok(save)
}

/// Probes the three slot files under `dir` and returns, per slot, the
/// file name when a readable save is present. A missing or unreadable
/// file counts as an unused slot.
pub fn scan_slots(dir: &Path) -> [Option<String>; 3] {
    std::array::from_fn(|slot| {
        let name = slot_filename(slot);
        load_save(dir, &name).ok().map(|_| name)
    })
}

fn slot_filename(slot: usize) -> String {
    format!("slot_{}.maze", slot + 1)
}

/// Pixel layout of a maze grid inside the window: the grid occupies the
/// left 65% of the width and 80% of the height, below a 10% top margin.
#[derive(Debug, Clone, Copy)]
pub struct GridLayout {
    pub origin_x: i32,
    pub origin_y: i32,
    pub cell: i32,
}

impl GridLayout {
    pub fn new(grid: &MazeGrid, width: f32, height: f32) -> Self {
        let cell_w = (width * 0.65) / grid.width.max(1) as f32;
        let cell_h = (height * 0.80) / grid.height.max(1) as f32;
        GridLayout {
            origin_x: (width * 0.05) as i32,
            origin_y: (height * 0.10) as i32,
            cell: cell_w.min(cell_h).max(1.0) as i32,
        }
    }

    /// The cell under a pointer position, if any.
    pub fn cell_at(&self, grid: &MazeGrid, x: i32, y: i32) -> Option<(usize, usize)> {
        if x < self.origin_x || y < self.origin_y {
            return None;
        }
        let col = ((x - self.origin_x) / self.cell) as usize;
        let row = ((y - self.origin_y) / self.cell) as usize;
        if col < grid.width && row < grid.height {
            Some((col, row))
        } else {
            None
        }
    }

    pub fn cell_origin(&self, col: usize, row: usize) -> (i32, i32) {
        (
            self.origin_x + col as i32 * self.cell,
            self.origin_y + row as i32 * self.cell,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("maze_crawler_{}_{}", tag, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn toggle_respects_bounds_and_endpoints() {
        let mut grid = MazeGrid::open(4, 3);

        assert!(grid.toggle_wall(1, 1));
        assert!(grid.is_wall(1, 1));
        assert!(grid.toggle_wall(1, 1));
        assert!(!grid.is_wall(1, 1));

        // Entry, exit and out-of-range cells never become walls.
        assert!(!grid.toggle_wall(0, 0));
        assert!(!grid.toggle_wall(3, 2));
        assert!(!grid.toggle_wall(4, 0));
    }

    #[test]
    fn save_round_trips_through_slot_file() {
        let dir = temp_dir("roundtrip");
        let mut grid = MazeGrid::open(5, 4);
        grid.toggle_wall(2, 1);
        grid.toggle_wall(3, 3);

        let name = store_slot(&dir, &grid, 1).unwrap();
        assert_eq!(name, "slot_2.maze");
        let save = load_save(&dir, &name).unwrap();
        fs::remove_dir_all(&dir).ok();

        assert_eq!(save.version, CURRENT_MAZE_VERSION);
        assert_eq!(save.grid, grid);
    }

    #[test]
    fn newer_version_is_rejected() {
        let dir = temp_dir("version");
        let save = MazeSave {
            version: CURRENT_MAZE_VERSION + 1,
            created: String::new(),
            grid: MazeGrid::open(2, 2),
        };
        fs::write(dir.join("future.maze"), serde_json::to_string(&save).unwrap()).unwrap();

        let result = load_save(&dir, "future.maze");
        fs::remove_dir_all(&dir).ok();

        assert!(matches!(result, Err(SaveError::InvalidVersion(_))));
    }

    #[test]
    fn scan_reports_only_readable_slots() {
        let dir = temp_dir("scan");
        store_slot(&dir, &MazeGrid::open(3, 3), 0).unwrap();
        fs::write(dir.join("slot_3.maze"), "not a maze save").unwrap();

        let slots = scan_slots(&dir);
        fs::remove_dir_all(&dir).ok();

        assert_eq!(slots[0].as_deref(), Some("slot_1.maze"));
        assert_eq!(slots[1], None);
        assert_eq!(slots[2], None);
    }

    #[test]
    fn layout_maps_pointer_to_cells() {
        let grid = MazeGrid::open(15, 11);
        let layout = GridLayout::new(&grid, 800.0, 600.0);

        // 800x600: origin (40, 60), cell edge min(520/15, 480/11) = 34px.
        assert_eq!(layout.origin_x, 40);
        assert_eq!(layout.origin_y, 60);
        assert_eq!(layout.cell, 34);

        assert_eq!(layout.cell_at(&grid, 41, 61), Some((0, 0)));
        assert_eq!(layout.cell_at(&grid, 125, 111), Some((2, 1)));
        assert_eq!(layout.cell_at(&grid, 10, 61), None);
        assert_eq!(layout.cell_at(&grid, 790, 590), None);
    }
}
