//! Gameplay section for one save slot
//!
//! Loads the slot's maze save and lets the player walk it by clicking
//! adjacent passage cells. An unreadable save file is not fatal; the
//! section falls back to an empty maze and the slot behaves as unused.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use crate::hit_region::{hit_action, HitRegion};
use crate::maze::{self, GridLayout, MazeGrid};
use crate::platform::{CellKind, InputEvent, LoadError, Platform, TextureRole};
use crate::section::{Section, SectionIdentity};
use crate::settings::Settings;

const FALLBACK_COLS: usize = 15;
const FALLBACK_ROWS: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameplayAction {
    BackToMenu,
}

const GAMEPLAY_REGIONS: [HitRegion<GameplayAction>; 1] = [HitRegion {
    x0: 0.80,
    y0: 0.75,
    x1: 0.95,
    y1: 0.80,
    action: GameplayAction::BackToMenu,
}];

pub struct Gameplay {
    settings: Rc<RefCell<Settings>>,
    slot: usize,
    save_name: String,
    data_dir: PathBuf,
    maze: MazeGrid,
    player: (usize, usize),
    escaped: bool,
    requested: Option<SectionIdentity>,
    width: f32,
    height: f32,
    loaded: bool,
}

impl Gameplay {
    pub fn new(
        settings: Rc<RefCell<Settings>>,
        slot: usize,
        save_name: String,
        data_dir: PathBuf,
        width: u32,
        height: u32,
    ) -> Self {
        let maze = MazeGrid::open(FALLBACK_COLS, FALLBACK_ROWS);
        let player = maze.entry;
        Gameplay {
            settings,
            slot,
            save_name,
            data_dir,
            maze,
            player,
            escaped: false,
            requested: None,
            width: width as f32,
            height: height as f32,
            loaded: false,
        }
    }

    fn layout(&self) -> GridLayout {
        GridLayout::new(&self.maze, self.width, self.height)
    }

    fn pointer_pressed<P: Platform>(&mut self, platform: &mut P, x: i32, y: i32) {
        if let Some(GameplayAction::BackToMenu) =
            hit_action(&GAMEPLAY_REGIONS, x, y, self.width, self.height)
        {
            if self.settings.borrow().play_audio {
                platform.play_click();
            }
            self.requested = Some(SectionIdentity::Menu);
            return;
        }

        let Some(cell) = self.layout().cell_at(&self.maze, x, y) else {
            return;
        };
        if MazeGrid::adjacent(self.player, cell) && !self.maze.is_wall(cell.0, cell.1) {
            self.player = cell;
            if self.player == self.maze.exit && !self.escaped {
                self.escaped = true;
                println!("Gameplay: the exit has been reached");
            }
        }
    }
}

impl<P: Platform> Section<P> for Gameplay {
    fn load(&mut self, platform: &mut P) -> Result<(), LoadError> {
        if self.loaded {
            return Ok(());
        }
        platform.load_texture(TextureRole::GameplayBackground)?;
        platform.load_font()?;
        platform.load_click()?;
        if self.settings.borrow().play_music && !platform.music_playing() {
            platform.ensure_music()?;
        }

        if self.save_name.is_empty() {
            println!("Gameplay: slot {} has no save, using an empty maze", self.slot + 1);
        } else {
            match maze::load_save(&self.data_dir, &self.save_name) {
                Ok(save) => {
                    println!("Gameplay: loaded {} (created {})", self.save_name, save.created);
                    self.maze = save.grid;
                }
                Err(e) => {
                    // Transient: a broken save file means the slot is
                    // unused, not that the game cannot run.
                    eprintln!("Gameplay: unreadable save {}: {}", self.save_name, e);
                }
            }
        }
        self.player = self.maze.entry;
        self.loaded = true;
        Ok(())
    }

    fn update(&mut self, _platform: &mut P) {}

    fn handle_input(&mut self, platform: &mut P) {
        for event in platform.poll_events() {
            match event {
                InputEvent::Closed => {
                    println!("Gameplay: window close requested");
                    platform.close();
                }
                InputEvent::PointerPressed { x, y } => self.pointer_pressed(platform, x, y),
            }
        }
    }

    fn render(&self, platform: &mut P) -> Result<(), String> {
        platform.draw_background(TextureRole::GameplayBackground)?;

        // On easy difficulty the exit is shown; on hard it stays hidden
        // until the player finds it.
        let show_exit = self.settings.borrow().difficulty == 0 || self.escaped;

        let layout = self.layout();
        let cell = layout.cell as u32;
        for row in 0..self.maze.height {
            for col in 0..self.maze.width {
                let (x, y) = layout.cell_origin(col, row);
                let kind = if (col, row) == self.player {
                    CellKind::Player
                } else if self.maze.is_wall(col, row) {
                    CellKind::Wall
                } else if (col, row) == self.maze.exit && show_exit {
                    CellKind::Exit
                } else {
                    CellKind::Passage
                };
                platform.fill_cell(x, y, cell, kind)?;
            }
        }

        platform.draw_text("MENU", (self.width * 0.80) as i32, (self.height * 0.75) as i32)?;
        if self.escaped {
            platform.draw_text("YOU ESCAPED", (self.width * 0.05) as i32, (self.height * 0.92) as i32)?;
        }
        Ok(())
    }

    fn identity(&self) -> SectionIdentity {
        // Identity is fixed per instance by the slot it was built for.
        match self.slot {
            0 => SectionIdentity::SaveSlot1,
            1 => SectionIdentity::SaveSlot2,
            _ => SectionIdentity::SaveSlot3,
        }
    }

    fn requested_transition(&self) -> Option<SectionIdentity> {
        self.requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::fake::FakePlatform;
    use std::fs;
    use std::path::Path;

    fn gameplay_in(save_name: &str, dir: &Path) -> (Gameplay, FakePlatform) {
        let settings = Rc::new(RefCell::new(Settings::default()));
        let mut gameplay =
            Gameplay::new(settings, 1, save_name.to_string(), dir.to_path_buf(), 800, 600);
        let mut platform = FakePlatform::new();
        gameplay.load(&mut platform).unwrap();
        (gameplay, platform)
    }

    fn gameplay(save_name: &str) -> (Gameplay, FakePlatform) {
        gameplay_in(save_name, &std::env::temp_dir())
    }

    #[test]
    fn unreadable_save_falls_back_to_empty_maze() {
        let (gameplay, _platform) = gameplay("definitely_missing.maze");
        assert_eq!(gameplay.maze, MazeGrid::open(FALLBACK_COLS, FALLBACK_ROWS));
        assert_eq!(gameplay.player, gameplay.maze.entry);
    }

    #[test]
    fn player_moves_to_adjacent_passage_cells_only() {
        let (mut gameplay, mut platform) = gameplay("");

        // Adjacent cell (1, 0): origin (40, 60), 34px cells.
        platform.press(91, 77);
        gameplay.handle_input(&mut platform);
        assert_eq!(gameplay.player, (1, 0));

        // Non-adjacent cell (5, 5) is ignored.
        platform.press(40 + 5 * 34 + 17, 60 + 5 * 34 + 17);
        gameplay.handle_input(&mut platform);
        assert_eq!(gameplay.player, (1, 0));

        // Walls block movement.
        gameplay.maze.toggle_wall(2, 0);
        platform.press(40 + 2 * 34 + 17, 77);
        gameplay.handle_input(&mut platform);
        assert_eq!(gameplay.player, (1, 0));
    }

    #[test]
    fn reaching_the_exit_sets_escaped() {
        let (mut gameplay, mut platform) = gameplay("");
        gameplay.maze.exit = (1, 0);

        platform.press(91, 77);
        gameplay.handle_input(&mut platform);
        assert!(gameplay.escaped);
    }

    #[test]
    fn loads_saved_maze_for_its_slot() {
        let dir = std::env::temp_dir().join(format!("maze_crawler_gameplay_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let mut grid = MazeGrid::open(7, 5);
        grid.toggle_wall(3, 2);
        let name = maze::store_slot(&dir, &grid, 1).unwrap();

        let (gameplay, _platform) = gameplay_in(&name, &dir);
        fs::remove_dir_all(&dir).ok();

        assert_eq!(gameplay.maze, grid);
        assert_eq!(gameplay.player, grid.entry);
    }

    #[test]
    fn hard_difficulty_hides_the_exit_until_escape() {
        let (mut gameplay, mut platform) = gameplay("");
        gameplay.settings.borrow_mut().difficulty = 1;

        gameplay.render(&mut platform).unwrap();
        assert!(!platform.cells.iter().any(|&(_, _, kind)| kind == CellKind::Exit));

        platform.cells.clear();
        gameplay.escaped = true;
        gameplay.render(&mut platform).unwrap();
        assert!(platform.cells.iter().any(|&(_, _, kind)| kind == CellKind::Exit));
    }
}
