//! Menu section: title screen, play screen and settings screen
//!
//! The three screens share one section; switching between them is local
//! state, not a section transition. Only launching a save slot (or the
//! builder, when the slot is empty) requests a real transition.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use crate::hit_region::{hit_action, HitRegion};
use crate::maze;
use crate::platform::{InputEvent, LoadError, Platform, TextureRole};
use crate::section::{Section, SectionIdentity};
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuScreen {
    Title,
    PlayScreen,
    SettingsScreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Play,
    Settings,
    Quit,
    Slot(usize),
    Back,
    MusicOn,
    MusicOff,
    AudioOn,
    AudioOff,
    EasyDifficulty,
    HardDifficulty,
    Fps30,
    Fps60,
    Fps120,
    ShowFpsOn,
    ShowFpsOff,
}

const TITLE_REGIONS: [HitRegion<MenuAction>; 3] = [
    HitRegion { x0: 0.10, y0: 0.25, x1: 0.25, y1: 0.30, action: MenuAction::Play },
    HitRegion { x0: 0.10, y0: 0.35, x1: 0.25, y1: 0.40, action: MenuAction::Settings },
    HitRegion { x0: 0.10, y0: 0.45, x1: 0.25, y1: 0.50, action: MenuAction::Quit },
];

const PLAY_REGIONS: [HitRegion<MenuAction>; 4] = [
    HitRegion { x0: 0.09, y0: 0.23, x1: 0.31, y1: 0.69, action: MenuAction::Slot(0) },
    HitRegion { x0: 0.39, y0: 0.23, x1: 0.61, y1: 0.69, action: MenuAction::Slot(1) },
    HitRegion { x0: 0.69, y0: 0.23, x1: 0.91, y1: 0.69, action: MenuAction::Slot(2) },
    HitRegion { x0: 0.10, y0: 0.75, x1: 0.17, y1: 0.80, action: MenuAction::Back },
];

const SETTINGS_REGIONS: [HitRegion<MenuAction>; 12] = [
    HitRegion { x0: 0.30, y0: 0.25, x1: 0.37, y1: 0.30, action: MenuAction::MusicOn },
    HitRegion { x0: 0.40, y0: 0.25, x1: 0.48, y1: 0.30, action: MenuAction::MusicOff },
    HitRegion { x0: 0.30, y0: 0.35, x1: 0.37, y1: 0.40, action: MenuAction::AudioOn },
    HitRegion { x0: 0.40, y0: 0.35, x1: 0.48, y1: 0.40, action: MenuAction::AudioOff },
    HitRegion { x0: 0.30, y0: 0.45, x1: 0.37, y1: 0.50, action: MenuAction::EasyDifficulty },
    HitRegion { x0: 0.40, y0: 0.45, x1: 0.48, y1: 0.50, action: MenuAction::HardDifficulty },
    HitRegion { x0: 0.30, y0: 0.55, x1: 0.37, y1: 0.60, action: MenuAction::Fps30 },
    HitRegion { x0: 0.40, y0: 0.55, x1: 0.48, y1: 0.60, action: MenuAction::Fps60 },
    HitRegion { x0: 0.50, y0: 0.55, x1: 0.56, y1: 0.60, action: MenuAction::Fps120 },
    HitRegion { x0: 0.30, y0: 0.65, x1: 0.37, y1: 0.70, action: MenuAction::ShowFpsOn },
    HitRegion { x0: 0.40, y0: 0.65, x1: 0.48, y1: 0.70, action: MenuAction::ShowFpsOff },
    HitRegion { x0: 0.10, y0: 0.75, x1: 0.16, y1: 0.80, action: MenuAction::Back },
];

pub struct Menu {
    settings: Rc<RefCell<Settings>>,
    data_dir: PathBuf,
    screen: MenuScreen,
    requested: Option<SectionIdentity>,
    /// Per-slot availability: the settings name a readable save file,
    /// established by the slot scan in `load`.
    available: [bool; 3],
    width: f32,
    height: f32,
    loaded: bool,
}

impl Menu {
    pub fn new(settings: Rc<RefCell<Settings>>, data_dir: PathBuf, width: u32, height: u32) -> Self {
        Menu {
            settings,
            data_dir,
            screen: MenuScreen::Title,
            requested: None,
            available: [false; 3],
            width: width as f32,
            height: height as f32,
            loaded: false,
        }
    }

    /// The pending transition request, readable without naming a
    /// platform type (the trait method delegates here).
    pub fn pending_transition(&self) -> Option<SectionIdentity> {
        self.requested
    }

    fn px(&self, fx: f32) -> i32 {
        (self.width * fx) as i32
    }

    fn py(&self, fy: f32) -> i32 {
        (self.height * fy) as i32
    }

    /// Plays the transition click when sound effects are enabled.
    fn click<P: Platform>(&self, platform: &mut P) {
        if self.settings.borrow().play_audio {
            platform.play_click();
            println!("Audio: playing click sound");
        }
    }

    fn pointer_pressed<P: Platform>(&mut self, platform: &mut P, x: i32, y: i32) {
        let table: &[HitRegion<MenuAction>] = match self.screen {
            MenuScreen::Title => &TITLE_REGIONS,
            MenuScreen::PlayScreen => &PLAY_REGIONS,
            MenuScreen::SettingsScreen => &SETTINGS_REGIONS,
        };
        let Some(action) = hit_action(table, x, y, self.width, self.height) else {
            return;
        };

        match action {
            MenuAction::Play => {
                println!("Menu: 'Play Game' button pressed");
                self.screen = MenuScreen::PlayScreen;
            }
            MenuAction::Settings => {
                println!("Menu: 'Settings' button pressed");
                self.screen = MenuScreen::SettingsScreen;
            }
            MenuAction::Quit => {
                println!("Menu: 'Quit' button pressed");
                platform.close();
            }
            MenuAction::Slot(slot) => {
                self.click(platform);
                if self.available[slot] {
                    println!("Menu: launching save slot {}", slot + 1);
                    self.requested = SectionIdentity::for_slot(slot);
                } else {
                    println!("Menu: save slot {} is unused, opening the builder", slot + 1);
                    self.requested = Some(SectionIdentity::MazeBuilder);
                }
            }
            MenuAction::Back => match self.screen {
                MenuScreen::SettingsScreen => self.leave_settings(platform),
                _ => self.screen = MenuScreen::Title,
            },
            MenuAction::MusicOn => self.settings.borrow_mut().play_music = true,
            MenuAction::MusicOff => self.settings.borrow_mut().play_music = false,
            MenuAction::AudioOn => self.settings.borrow_mut().play_audio = true,
            MenuAction::AudioOff => self.settings.borrow_mut().play_audio = false,
            MenuAction::EasyDifficulty => self.settings.borrow_mut().difficulty = 0,
            MenuAction::HardDifficulty => self.settings.borrow_mut().difficulty = 1,
            MenuAction::Fps30 => self.settings.borrow_mut().frame_rate = 30,
            MenuAction::Fps60 => self.settings.borrow_mut().frame_rate = 60,
            MenuAction::Fps120 => self.settings.borrow_mut().frame_rate = 120,
            MenuAction::ShowFpsOn => self.settings.borrow_mut().show_fps = true,
            MenuAction::ShowFpsOff => self.settings.borrow_mut().show_fps = false,
        }
    }

    /// Persists the settings and applies the ones the platform enforces,
    /// then returns to the title screen.
    fn leave_settings<P: Platform>(&mut self, platform: &mut P) {
        let (frame_rate, play_music) = {
            let settings = self.settings.borrow();
            if let Err(e) = settings.store() {
                eprintln!("Menu: failed to store settings: {}", e);
            }
            (settings.frame_rate, settings.play_music)
        };
        platform.set_framerate_limit(frame_rate);
        if !play_music {
            platform.stop_music();
            println!("Menu: stopped all music playback");
        } else if let Err(e) = platform.ensure_music() {
            eprintln!("Menu: failed to start music: {}", e);
        }
        self.screen = MenuScreen::Title;
    }

    fn render_title<P: Platform>(&self, platform: &mut P) -> Result<(), String> {
        platform.draw_text("PLAY GAME", self.px(0.10), self.py(0.25))?;
        platform.draw_text("SETTINGS", self.px(0.10), self.py(0.35))?;
        platform.draw_text("QUIT", self.px(0.10), self.py(0.45))
    }

    fn render_play_screen<P: Platform>(&self, platform: &mut P) -> Result<(), String> {
        let settings = self.settings.borrow();
        for (slot, region) in PLAY_REGIONS.iter().take(3).enumerate() {
            let x = (self.width * region.x0) as i32;
            let y = (self.height * region.y0) as i32;
            let w = (self.width * (region.x1 - region.x0)) as u32;
            let h = (self.height * (region.y1 - region.y0)) as u32;
            platform.draw_frame(x, y, w, h)?;
            platform.draw_text(&format!("SLOT {}", slot + 1), x + 10, y + 10)?;
            let name = &settings.save_slots[slot];
            let label = if self.available[slot] { name.as_str() } else { "EMPTY" };
            platform.draw_text(label, x + 10, y + 40)?;
        }
        platform.draw_text("BACK", self.px(0.10), self.py(0.75))
    }

    fn render_settings_screen<P: Platform>(&self, platform: &mut P) -> Result<(), String> {
        let settings = self.settings.borrow();

        platform.draw_text("MUSIC", self.px(0.05), self.py(0.25))?;
        platform.draw_text("ON", self.px(0.31), self.py(0.25))?;
        platform.draw_text("OFF", self.px(0.41), self.py(0.25))?;

        platform.draw_text("AUDIO", self.px(0.05), self.py(0.35))?;
        platform.draw_text("ON", self.px(0.31), self.py(0.35))?;
        platform.draw_text("OFF", self.px(0.41), self.py(0.35))?;

        platform.draw_text("DIFFICULTY", self.px(0.05), self.py(0.45))?;
        platform.draw_text("EASY", self.px(0.31), self.py(0.45))?;
        platform.draw_text("HARD", self.px(0.41), self.py(0.45))?;

        platform.draw_text("FRAME RATE", self.px(0.05), self.py(0.55))?;
        platform.draw_text("30", self.px(0.31), self.py(0.55))?;
        platform.draw_text("60", self.px(0.41), self.py(0.55))?;
        platform.draw_text("120", self.px(0.51), self.py(0.55))?;

        platform.draw_text("SHOW FPS", self.px(0.05), self.py(0.65))?;
        platform.draw_text("ON", self.px(0.31), self.py(0.65))?;
        platform.draw_text("OFF", self.px(0.41), self.py(0.65))?;

        platform.draw_text("BACK", self.px(0.10), self.py(0.75))?;

        // Outline the active option in every row.
        let frame_w = (self.width * 0.09) as u32;
        let frame_h = (self.height * 0.05) as u32;
        let frame = |platform: &mut P, fx: f32, fy: f32| {
            platform.draw_frame(self.px(fx), self.py(fy), frame_w, frame_h)
        };

        frame(platform, if settings.play_music { 0.3 } else { 0.4 }, 0.25)?;
        frame(platform, if settings.play_audio { 0.3 } else { 0.4 }, 0.35)?;
        frame(platform, if settings.difficulty == 0 { 0.3 } else { 0.4 }, 0.45)?;
        let fps_fx = match settings.frame_rate {
            30 => 0.3,
            60 => 0.4,
            _ => 0.5,
        };
        frame(platform, fps_fx, 0.55)?;
        frame(platform, if settings.show_fps { 0.3 } else { 0.4 }, 0.65)
    }
}

impl<P: Platform> Section<P> for Menu {
    fn load(&mut self, platform: &mut P) -> Result<(), LoadError> {
        if self.loaded {
            return Ok(());
        }
        platform.load_texture(TextureRole::TitleBackground)?;
        platform.load_texture(TextureRole::PlayBackground)?;
        platform.load_texture(TextureRole::SettingsBackground)?;
        platform.load_font()?;
        platform.load_click()?;
        if self.settings.borrow().play_music && !platform.music_playing() {
            println!("Menu: starting background music");
            platform.ensure_music()?;
        }

        // A slot is offered only when its settings entry names a save
        // file the scan could actually read.
        let scanned = maze::scan_slots(&self.data_dir);
        let settings = self.settings.borrow();
        for (slot, name) in settings.save_slots.iter().enumerate() {
            self.available[slot] = !name.is_empty() && scanned[slot].is_some();
            if !name.is_empty() && scanned[slot].is_none() {
                println!("Menu: save slot {} file {} is unreadable, treating as unused", slot + 1, name);
            }
        }
        drop(settings);

        self.loaded = true;
        println!("Menu: assets loaded");
        Ok(())
    }

    fn update(&mut self, _platform: &mut P) {}

    fn handle_input(&mut self, platform: &mut P) {
        for event in platform.poll_events() {
            match event {
                InputEvent::Closed => {
                    println!("Menu: window close requested");
                    platform.close();
                }
                InputEvent::PointerPressed { x, y } => self.pointer_pressed(platform, x, y),
            }
        }
    }

    fn render(&self, platform: &mut P) -> Result<(), String> {
        let background = match self.screen {
            MenuScreen::Title => TextureRole::TitleBackground,
            MenuScreen::PlayScreen => TextureRole::PlayBackground,
            MenuScreen::SettingsScreen => TextureRole::SettingsBackground,
        };
        platform.draw_background(background)?;

        match self.screen {
            MenuScreen::Title => self.render_title(platform),
            MenuScreen::PlayScreen => self.render_play_screen(platform),
            MenuScreen::SettingsScreen => self.render_settings_screen(platform),
        }
    }

    fn identity(&self) -> SectionIdentity {
        SectionIdentity::Menu
    }

    fn requested_transition(&self) -> Option<SectionIdentity> {
        self.pending_transition()
    }
}
