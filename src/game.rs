//! The section driver
//!
//! `Game` owns the platform, the shared settings and exactly one active
//! section. Each frame the external loop calls `handle_input`, `update`,
//! `clear`, `render` and `present`; `update` also evaluates the lazy
//! section-switch rule. A transition waits until the outgoing section's
//! click sound has finished, because cutting the sound off by dropping
//! the section early is audible.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use crate::platform::{LoadError, Platform, SoundStatus};
use crate::section::{Gameplay, MazeBuilder, Menu, Section, SectionIdentity};
use crate::settings::{user_data_dir, Settings};

pub struct Game<P: Platform> {
    platform: P,
    settings: Rc<RefCell<Settings>>,
    /// Directory holding the maze save files.
    data_dir: PathBuf,
    section: Box<dyn Section<P>>,
    /// Last identity a section was constructed for. Matches the active
    /// section's own identity at all times.
    identity: SectionIdentity,
    frame_count: u32,
    /// Instantaneous FPS, recomputed on every update.
    fps: u32,
    /// FPS value frozen for display, refreshed every quarter second.
    displayed_fps: u32,
    clock: Instant,
}

impl<P: Platform> Game<P> {
    /// Builds the driver with settings read from disk and the menu
    /// section active. A `LoadError` here means a shipped asset is
    /// missing and the process cannot continue.
    pub fn new(platform: P) -> Result<Self, LoadError> {
        Self::with_settings(platform, Settings::load())
    }

    pub fn with_settings(platform: P, settings: Settings) -> Result<Self, LoadError> {
        Self::with_settings_in(platform, settings, user_data_dir())
    }

    pub fn with_settings_in(
        mut platform: P,
        settings: Settings,
        data_dir: PathBuf,
    ) -> Result<Self, LoadError> {
        platform.set_framerate_limit(settings.frame_rate);
        let settings = Rc::new(RefCell::new(settings));
        let (width, height) = platform.size();
        let mut section: Box<dyn Section<P>> =
            Box::new(Menu::new(Rc::clone(&settings), data_dir.clone(), width, height));
        section.load(&mut platform)?;
        println!("Game: menu section loaded");

        Ok(Game {
            platform,
            settings,
            data_dir,
            section,
            identity: SectionIdentity::Menu,
            frame_count: 0,
            fps: 0,
            displayed_fps: 0,
            clock: Instant::now(),
        })
    }

    /// The only exit condition: the window has been closed.
    pub fn is_done(&self) -> bool {
        !self.platform.is_open()
    }

    #[cfg(test)]
    pub fn identity(&self) -> SectionIdentity {
        self.identity
    }

    #[cfg(test)]
    pub fn section_identity(&self) -> SectionIdentity {
        self.section.identity()
    }

    #[cfg(test)]
    pub fn platform(&self) -> &P {
        &self.platform
    }

    #[cfg(test)]
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn handle_input(&mut self) {
        self.section.handle_input(&mut self.platform);
    }

    /// Delegates to the active section, refreshes the FPS estimate and
    /// performs a pending section switch once its click sound is done.
    pub fn update(&mut self) -> Result<(), LoadError> {
        if self.is_done() {
            // The window is gone; no more state advances or transitions.
            return Ok(());
        }

        self.section.update(&mut self.platform);

        let elapsed = self.clock.elapsed().as_secs_f32();
        self.clock = Instant::now();
        if elapsed > 0.0 {
            self.fps = (1.0 / elapsed) as u32;
        }

        if let Some(next) = self.section.requested_transition() {
            let sound = self.section.sound_status(&self.platform);
            if next != self.identity && sound != SoundStatus::Playing {
                println!("Game: switching section {:?} -> {:?}", self.identity, next);
                self.identity = next;
                let mut section = self.build_section(next);
                section.load(&mut self.platform)?;
                self.section = section;
            }
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.platform.clear();
    }

    /// Renders the active section, then the FPS overlay. The displayed
    /// FPS value is frozen once every `frame_rate / 4` frames and never
    /// exceeds the configured cap.
    pub fn render(&mut self) -> Result<(), String> {
        self.section.render(&mut self.platform)?;

        let (show_fps, cap) = {
            let settings = self.settings.borrow();
            (settings.show_fps, settings.frame_rate)
        };
        if show_fps {
            // cap is normalized to 30/60/120 but a cadence of zero must
            // never reach the modulo below.
            let cadence = (cap / 4).max(1);
            if self.frame_count % cadence == 0 {
                self.displayed_fps = self.fps.min(cap);
            }
            self.platform.draw_text(&self.displayed_fps.to_string(), 15, 0)?;
        }
        self.frame_count = self.frame_count.wrapping_add(1);
        Ok(())
    }

    pub fn present(&mut self) {
        self.platform.present();
    }

    fn build_section(&self, identity: SectionIdentity) -> Box<dyn Section<P>> {
        let (width, height) = self.platform.size();
        let settings = Rc::clone(&self.settings);
        let data_dir = self.data_dir.clone();
        match identity {
            SectionIdentity::Menu => Box::new(Menu::new(settings, data_dir, width, height)),
            SectionIdentity::MazeBuilder => {
                Box::new(MazeBuilder::new(settings, data_dir, width, height))
            }
            SectionIdentity::SaveSlot1 => self.gameplay(0, width, height),
            SectionIdentity::SaveSlot2 => self.gameplay(1, width, height),
            SectionIdentity::SaveSlot3 => self.gameplay(2, width, height),
        }
    }

    fn gameplay(&self, slot: usize, width: u32, height: u32) -> Box<dyn Section<P>> {
        let save_name = self.settings.borrow().save_slots[slot].clone();
        Box::new(Gameplay::new(
            Rc::clone(&self.settings),
            slot,
            save_name,
            self.data_dir.clone(),
            width,
            height,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{self, MazeGrid};
    use crate::platform::fake::FakePlatform;
    use crate::platform::TextureRole;
    use std::fs;
    use std::path::Path;

    fn game_in(settings: Settings, dir: &Path) -> Game<FakePlatform> {
        Game::with_settings_in(FakePlatform::new(), settings, dir.to_path_buf()).unwrap()
    }

    fn game_with(settings: Settings) -> Game<FakePlatform> {
        game_in(settings, &std::env::temp_dir())
    }

    /// A driver whose second save slot is backed by a real save file.
    fn slot_two_game(tag: &str) -> (Game<FakePlatform>, std::path::PathBuf) {
        let dir = std::env::temp_dir().join(format!("maze_crawler_game_{}_{}", tag, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let name = maze::store_slot(&dir, &MazeGrid::open(3, 3), 1).unwrap();
        let mut settings = Settings::default();
        settings.save_slots[1] = name;
        (game_in(settings, &dir), dir)
    }

    #[test]
    fn cached_identity_matches_section_after_updates() {
        let mut game = game_with(Settings::default());
        for _ in 0..10 {
            game.handle_input();
            game.update().unwrap();
            assert_eq!(game.identity(), game.section_identity());
        }
        assert_eq!(game.identity(), SectionIdentity::Menu);
    }

    #[test]
    fn transition_waits_for_click_sound_to_finish() {
        let (mut game, dir) = slot_two_game("sound_guard");

        game.platform_mut().press(100, 165); // Play Game
        game.handle_input();
        game.update().unwrap();
        game.platform_mut().press(400, 300); // slot 2 -> click starts playing
        game.handle_input();
        assert_eq!(game.platform().effect, SoundStatus::Playing);

        // The request is pending but the sound still plays: no switch.
        game.update().unwrap();
        assert_eq!(game.identity(), SectionIdentity::Menu);
        assert_eq!(game.section_identity(), SectionIdentity::Menu);

        game.platform_mut().effect = SoundStatus::Stopped;
        game.update().unwrap();
        fs::remove_dir_all(&dir).ok();
        assert_eq!(game.identity(), SectionIdentity::SaveSlot2);
        assert_eq!(game.section_identity(), SectionIdentity::SaveSlot2);
    }

    #[test]
    fn play_slot_two_scenario_constructs_gameplay_for_slot_two() {
        let (mut game, dir) = slot_two_game("scenario");

        game.platform_mut().press(100, 165);
        game.handle_input();
        game.update().unwrap();
        game.platform_mut().press(400, 300);
        game.handle_input();

        // Enough frames for the click sound to finish.
        for frame in 0..5 {
            if frame == 2 {
                game.platform_mut().effect = SoundStatus::Stopped;
            }
            game.update().unwrap();
        }
        fs::remove_dir_all(&dir).ok();

        assert_eq!(game.identity(), SectionIdentity::SaveSlot2);
        assert_eq!(game.section_identity(), SectionIdentity::SaveSlot2);
        // The new section loaded its own assets on construction.
        assert!(game
            .platform()
            .texture_loads
            .contains(&TextureRole::GameplayBackground));
    }

    #[test]
    fn window_close_flips_is_done_and_stops_construction() {
        let (mut game, dir) = slot_two_game("close");
        assert!(!game.is_done());

        // Request a transition, then close before the switch can happen.
        game.platform_mut().press(100, 165);
        game.handle_input();
        game.update().unwrap();
        game.platform_mut().press(400, 300);
        game.platform_mut().push_close();
        game.handle_input();
        game.platform_mut().effect = SoundStatus::Stopped;
        game.update().unwrap();
        fs::remove_dir_all(&dir).ok();

        assert!(game.is_done());
        assert_eq!(game.section_identity(), SectionIdentity::Menu);
        assert!(!game
            .platform()
            .texture_loads
            .contains(&TextureRole::GameplayBackground));
    }

    #[test]
    fn displayed_fps_never_exceeds_the_cap() {
        let mut settings = Settings::default();
        settings.show_fps = true;
        settings.frame_rate = 60;
        let mut game = game_with(settings);

        game.fps = 4_000;
        game.render().unwrap();
        assert_eq!(game.displayed_fps, 60);
        assert!(game.platform().drawn_text.contains(&"60".to_string()));
    }

    #[test]
    fn displayed_fps_is_frozen_between_sampling_frames() {
        let mut settings = Settings::default();
        settings.show_fps = true;
        settings.frame_rate = 60;
        let mut game = game_with(settings);

        game.fps = 58;
        game.render().unwrap(); // frame 0: sampled
        assert_eq!(game.displayed_fps, 58);

        game.fps = 31;
        game.render().unwrap(); // frame 1: frozen
        assert_eq!(game.displayed_fps, 58);
    }

    #[test]
    fn zero_frame_rate_cadence_does_not_divide_by_zero() {
        let mut settings = Settings::default();
        settings.show_fps = true;
        let mut game = game_with(settings);

        // Settings normalization forbids this, but the sampling cadence
        // must stay defined even if the value is forced.
        game.settings.borrow_mut().frame_rate = 0;
        game.fps = 99;
        game.render().unwrap();
        assert_eq!(game.displayed_fps, 0);
    }

    #[test]
    fn missing_asset_is_a_fatal_load_error() {
        let mut platform = FakePlatform::new();
        platform.fail_texture = Some(TextureRole::TitleBackground);
        assert!(Game::with_settings(platform, Settings::default()).is_err());
    }

    #[test]
    fn frame_rate_limit_is_applied_at_construction() {
        let mut settings = Settings::default();
        settings.frame_rate = 120;
        let game = game_with(settings);
        assert_eq!(game.platform().framerate_limit, Some(120));
    }
}
