//! Platform surface the game core runs against
//!
//! The driver and the sections never touch SDL2 directly; they go through
//! the `Platform` trait, which exposes exactly the window, drawing, asset,
//! audio and input surface the game needs. The real implementation lives in
//! `src/sdl.rs`; tests run against `fake::FakePlatform`.

use std::fmt;

/// Events the core consumes, already translated from raw window events.
///
/// The queue is drained completely on every `poll_events` call so no
/// events pile up between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// The window close button was pressed.
    Closed,

    /// Left pointer button pressed at window coordinates (x, y).
    PointerPressed { x: i32, y: i32 },
}

/// Playback state of the transition click sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundStatus {
    Playing,
    Paused,
    Stopped,
}

/// Textures are loaded by role, not by path. The platform implementation
/// maps each role to its shipped asset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureRole {
    TitleBackground,
    PlayBackground,
    SettingsBackground,
    BuilderBackground,
    GameplayBackground,
}

impl TextureRole {
    pub fn asset_path(&self) -> &'static str {
        match self {
            TextureRole::TitleBackground => "assets/title_background.png",
            TextureRole::PlayBackground => "assets/play_background.png",
            TextureRole::SettingsBackground => "assets/settings_background.png",
            TextureRole::BuilderBackground => "assets/builder_background.png",
            TextureRole::GameplayBackground => "assets/gameplay_background.png",
        }
    }
}

/// Shading applied when filling a maze cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Wall,
    Passage,
    Player,
    Exit,
}

/// Fatal asset-acquisition failure.
///
/// Assets ship with the binary; a missing one is a packaging error. The
/// error is propagated to the owner instead of exiting in place so the
/// state machine stays testable, but the process cannot continue once one
/// of these surfaces.
#[derive(Debug)]
pub enum LoadError {
    /// A background texture failed to load.
    Asset { role: TextureRole, reason: String },

    /// The UI font failed to load.
    Font(String),

    /// The music track or the click sound failed to load.
    Audio { name: &'static str, reason: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Asset { role, reason } => {
                write!(f, "failed to load asset {:?}: {}", role, reason)
            }
            LoadError::Font(reason) => write!(f, "failed to load UI font: {}", reason),
            LoadError::Audio { name, reason } => {
                write!(f, "failed to load audio asset {}: {}", name, reason)
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// The collaborator surface of the render target, asset store, audio
/// output and input queue, bundled behind one seam.
pub trait Platform {
    // === Window ===
    fn size(&self) -> (u32, u32);
    fn is_open(&self) -> bool;
    fn close(&mut self);
    fn set_framerate_limit(&mut self, fps: u32);

    // === Frame ===
    fn clear(&mut self);
    fn present(&mut self);

    // === Drawing ===
    fn draw_background(&mut self, role: TextureRole) -> Result<(), String>;
    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), String>;
    fn draw_frame(&mut self, x: i32, y: i32, width: u32, height: u32) -> Result<(), String>;
    fn fill_cell(&mut self, x: i32, y: i32, size: u32, kind: CellKind) -> Result<(), String>;

    // === Assets ===
    fn load_texture(&mut self, role: TextureRole) -> Result<(), LoadError>;
    fn load_font(&mut self) -> Result<(), LoadError>;
    fn load_click(&mut self) -> Result<(), LoadError>;

    // === Audio ===
    /// Starts the shared background music if it is not already playing.
    /// The music handle is platform-owned so section switches never
    /// interrupt playback.
    fn ensure_music(&mut self) -> Result<(), LoadError>;
    fn stop_music(&mut self);
    fn music_playing(&self) -> bool;
    fn play_click(&mut self);
    fn effect_status(&self) -> SoundStatus;

    // === Input ===
    /// Drains every currently queued event. Non-blocking.
    fn poll_events(&mut self) -> Vec<InputEvent>;
}
