//! Maze builder section
//!
//! Click a cell to toggle it between wall and passage, then save the grid
//! to one of the three slots. Saving records the file name in the
//! matching settings slot so the play screen can offer it.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use crate::hit_region::{hit_action, HitRegion};
use crate::maze::{self, GridLayout, MazeGrid};
use crate::platform::{CellKind, InputEvent, LoadError, Platform, TextureRole};
use crate::section::{Section, SectionIdentity};
use crate::settings::Settings;

const GRID_COLS: usize = 15;
const GRID_ROWS: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuilderAction {
    SaveToSlot(usize),
    BackToMenu,
}

const BUILDER_REGIONS: [HitRegion<BuilderAction>; 4] = [
    HitRegion { x0: 0.80, y0: 0.25, x1: 0.95, y1: 0.30, action: BuilderAction::SaveToSlot(0) },
    HitRegion { x0: 0.80, y0: 0.35, x1: 0.95, y1: 0.40, action: BuilderAction::SaveToSlot(1) },
    HitRegion { x0: 0.80, y0: 0.45, x1: 0.95, y1: 0.50, action: BuilderAction::SaveToSlot(2) },
    HitRegion { x0: 0.80, y0: 0.75, x1: 0.95, y1: 0.80, action: BuilderAction::BackToMenu },
];

pub struct MazeBuilder {
    settings: Rc<RefCell<Settings>>,
    data_dir: PathBuf,
    grid: MazeGrid,
    requested: Option<SectionIdentity>,
    status: Option<String>,
    width: f32,
    height: f32,
    loaded: bool,
}

impl MazeBuilder {
    pub fn new(settings: Rc<RefCell<Settings>>, data_dir: PathBuf, width: u32, height: u32) -> Self {
        MazeBuilder {
            settings,
            data_dir,
            grid: MazeGrid::open(GRID_COLS, GRID_ROWS),
            requested: None,
            status: None,
            width: width as f32,
            height: height as f32,
            loaded: false,
        }
    }

    pub fn pending_transition(&self) -> Option<SectionIdentity> {
        self.requested
    }

    fn layout(&self) -> GridLayout {
        GridLayout::new(&self.grid, self.width, self.height)
    }

    fn save_to_slot(&mut self, slot: usize) {
        match maze::store_slot(&self.data_dir, &self.grid, slot) {
            Ok(filename) => {
                let mut settings = self.settings.borrow_mut();
                settings.save_slots[slot] = filename;
                if let Err(e) = settings.store() {
                    eprintln!("Builder: failed to store settings: {}", e);
                }
                self.status = Some(format!("SAVED TO SLOT {}", slot + 1));
                println!("Builder: maze saved to slot {}", slot + 1);
            }
            Err(e) => {
                eprintln!("Builder: failed to save maze: {}", e);
                self.status = Some("SAVE FAILED".to_string());
            }
        }
    }

    fn pointer_pressed<P: Platform>(&mut self, platform: &mut P, x: i32, y: i32) {
        if let Some(action) = hit_action(&BUILDER_REGIONS, x, y, self.width, self.height) {
            match action {
                BuilderAction::SaveToSlot(slot) => self.save_to_slot(slot),
                BuilderAction::BackToMenu => {
                    if self.settings.borrow().play_audio {
                        platform.play_click();
                    }
                    self.requested = Some(SectionIdentity::Menu);
                }
            }
            return;
        }

        if let Some((col, row)) = self.layout().cell_at(&self.grid, x, y) {
            if self.grid.toggle_wall(col, row) {
                self.status = None;
            }
        }
    }
}

impl<P: Platform> Section<P> for MazeBuilder {
    fn load(&mut self, platform: &mut P) -> Result<(), LoadError> {
        if self.loaded {
            return Ok(());
        }
        platform.load_texture(TextureRole::BuilderBackground)?;
        platform.load_font()?;
        platform.load_click()?;
        self.loaded = true;
        println!("Builder: assets loaded");
        Ok(())
    }

    fn update(&mut self, _platform: &mut P) {}

    fn handle_input(&mut self, platform: &mut P) {
        for event in platform.poll_events() {
            match event {
                InputEvent::Closed => {
                    println!("Builder: window close requested");
                    platform.close();
                }
                InputEvent::PointerPressed { x, y } => self.pointer_pressed(platform, x, y),
            }
        }
    }

    fn render(&self, platform: &mut P) -> Result<(), String> {
        platform.draw_background(TextureRole::BuilderBackground)?;

        let layout = self.layout();
        let cell = layout.cell as u32;
        for row in 0..self.grid.height {
            for col in 0..self.grid.width {
                let (x, y) = layout.cell_origin(col, row);
                let kind = if self.grid.is_wall(col, row) {
                    CellKind::Wall
                } else if (col, row) == self.grid.exit {
                    CellKind::Exit
                } else {
                    CellKind::Passage
                };
                platform.fill_cell(x, y, cell, kind)?;
            }
        }

        for (slot, region) in BUILDER_REGIONS.iter().take(3).enumerate() {
            platform.draw_text(
                &format!("SAVE {}", slot + 1),
                (self.width * region.x0) as i32,
                (self.height * region.y0) as i32,
            )?;
        }
        platform.draw_text("MENU", (self.width * 0.80) as i32, (self.height * 0.75) as i32)?;

        if let Some(status) = &self.status {
            platform.draw_text(status, (self.width * 0.05) as i32, (self.height * 0.92) as i32)?;
        }
        Ok(())
    }

    fn identity(&self) -> SectionIdentity {
        SectionIdentity::MazeBuilder
    }

    fn requested_transition(&self) -> Option<SectionIdentity> {
        self.pending_transition()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::fake::FakePlatform;

    fn builder() -> (MazeBuilder, FakePlatform) {
        let settings = Rc::new(RefCell::new(Settings::default()));
        let mut builder = MazeBuilder::new(settings, std::env::temp_dir(), 800, 600);
        let mut platform = FakePlatform::new();
        builder.load(&mut platform).unwrap();
        (builder, platform)
    }

    #[test]
    fn clicking_a_cell_toggles_a_wall() {
        let (mut builder, mut platform) = builder();

        // Cell (2, 1) at 800x600: origin (40, 60), 34px cells.
        platform.press(125, 111);
        builder.handle_input(&mut platform);
        assert!(builder.grid.is_wall(2, 1));

        platform.press(125, 111);
        builder.handle_input(&mut platform);
        assert!(!builder.grid.is_wall(2, 1));
    }

    #[test]
    fn menu_button_requests_transition() {
        let (mut builder, mut platform) = builder();
        platform.press(680, 465);
        builder.handle_input(&mut platform);
        assert_eq!(builder.pending_transition(), Some(SectionIdentity::Menu));
        assert_eq!(platform.clicks, 1);
    }
}
