//! User settings and their on-disk form
//!
//! Settings live in a line-oriented `KEY, value` text file with a fixed
//! key order: `PLAY_MUSIC`, `PLAY_AUDIO`, `DIFFICULTY`, `FRAME_RATE`,
//! `SHOW_FPS`, then the three save-slot lines. The file is read once at
//! game construction and fully rewritten whenever the settings screen is
//! left. The record itself is shared between the driver and the active
//! section as `Rc<RefCell<Settings>>`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const ALLOWED_FRAME_RATES: [u32; 3] = [30, 60, 120];

/// Shared user-preference record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub play_music: bool,
    pub play_audio: bool,
    /// 0 = easy (exit shown on the radar), 1 = hard.
    pub difficulty: u8,
    /// One of 30, 60, 120.
    pub frame_rate: u32,
    pub show_fps: bool,
    /// Save-file names for the three slots; empty string = slot unused.
    pub save_slots: [String; 3],
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            play_music: true,
            play_audio: true,
            difficulty: 0,
            frame_rate: 60,
            show_fps: false,
            save_slots: [String::new(), String::new(), String::new()],
        }
    }
}

impl Settings {
    /// Reads settings from the default location. Any failure falls back
    /// to defaults; a missing settings file is the normal first-run case.
    pub fn load() -> Settings {
        Self::load_from(&settings_path())
    }

    /// Reads settings from `path`, normalizing out-of-range values.
    pub fn load_from(path: &Path) -> Settings {
        let mut settings = Settings::default();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                println!("Settings: no readable settings file ({}), using defaults", e);
                return settings;
            }
        };

        for line in text.lines() {
            let Some((key, value)) = line.split_once(',') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "PLAY_MUSIC" => settings.play_music = value == "1",
                "PLAY_AUDIO" => settings.play_audio = value == "1",
                "DIFFICULTY" => settings.difficulty = if value == "1" { 1 } else { 0 },
                "FRAME_RATE" => settings.frame_rate = value.parse().unwrap_or(60),
                "SHOW_FPS" => settings.show_fps = value == "1",
                "SAVE_SLOT_1" => settings.save_slots[0] = value.to_string(),
                "SAVE_SLOT_2" => settings.save_slots[1] = value.to_string(),
                "SAVE_SLOT_3" => settings.save_slots[2] = value.to_string(),
                other => println!("Settings: ignoring unknown key {}", other),
            }
        }

        settings.normalize();
        settings
    }

    /// Fully rewrites the settings file at the default location.
    pub fn store(&self) -> io::Result<()> {
        self.store_to(&settings_path())
    }

    pub fn store_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out = String::new();
        out.push_str(&format!("PLAY_MUSIC, {}\n", bool_flag(self.play_music)));
        out.push_str(&format!("PLAY_AUDIO, {}\n", bool_flag(self.play_audio)));
        out.push_str(&format!("DIFFICULTY, {}\n", self.difficulty));
        out.push_str(&format!("FRAME_RATE, {}\n", self.frame_rate));
        out.push_str(&format!("SHOW_FPS, {}\n", bool_flag(self.show_fps)));
        for (i, slot) in self.save_slots.iter().enumerate() {
            out.push_str(&format!("SAVE_SLOT_{}, {}\n", i + 1, slot));
        }

        fs::write(path, out)?;
        println!("Settings: stored to {}", path.display());
        Ok(())
    }

    /// Clamps fields to their allowed value sets.
    fn normalize(&mut self) {
        if self.difficulty > 1 {
            self.difficulty = 1;
        }
        if !ALLOWED_FRAME_RATES.contains(&self.frame_rate) {
            self.frame_rate = 60;
        }
    }
}

fn bool_flag(value: bool) -> u8 {
    if value {
        1
    } else {
        0
    }
}

/// Directory holding the settings file and the maze saves.
pub fn user_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|p| p.join(".maze_crawler/user_data"))
        .unwrap_or_else(|| PathBuf::from("user_data"))
}

fn settings_path() -> PathBuf {
    user_data_dir().join("settings.csv")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_settings_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "maze_crawler_settings_{}_{}.csv",
            tag,
            std::process::id()
        ))
    }

    #[test]
    fn round_trips_representative_configuration() {
        let settings = Settings {
            play_music: false,
            play_audio: true,
            difficulty: 1,
            frame_rate: 120,
            show_fps: true,
            save_slots: [String::new(), "save2.dat".to_string(), String::new()],
        };

        let path = temp_settings_path("roundtrip");
        settings.store_to(&path).unwrap();
        let loaded = Settings::load_from(&path);
        fs::remove_file(&path).ok();

        assert_eq!(loaded, settings);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = temp_settings_path("missing");
        fs::remove_file(&path).ok();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn out_of_range_values_are_normalized() {
        let path = temp_settings_path("normalize");
        fs::write(&path, "FRAME_RATE, 144\nDIFFICULTY, 7\n").unwrap();
        let loaded = Settings::load_from(&path);
        fs::remove_file(&path).ok();

        assert_eq!(loaded.frame_rate, 60);
        assert_eq!(loaded.difficulty, 1);
    }
}
