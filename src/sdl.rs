//! SDL2 implementation of the platform surface
//!
//! Textures are cached by role, text is rendered through the ttf font on
//! demand, and the shared background music plus the transition click live
//! here so sections can come and go without touching playback.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use sdl2::event::Event;
use sdl2::image::LoadTexture;
use sdl2::mixer::{Channel, Chunk, Music};
use sdl2::mouse::MouseButton;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::ttf::{Font, Sdl2TtfContext};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;

use crate::platform::{CellKind, InputEvent, LoadError, Platform, SoundStatus, TextureRole};

const FONT_PATH: &str = "assets/ui_font.ttf";
const FONT_POINT_SIZE: u16 = 28;
const CLICK_PATH: &str = "assets/click.wav";
const MUSIC_PATH: &str = "assets/menu_theme.ogg";
// ~20% of MIX_MAX_VOLUME, matching the quiet menu loop.
const MUSIC_VOLUME: i32 = 26;

const TEXT_COLOR: Color = Color::RGB(240, 240, 240);
const FRAME_COLOR: Color = Color::RGB(255, 255, 255);

pub struct SdlPlatform<'a> {
    canvas: &'a mut Canvas<Window>,
    texture_creator: &'a TextureCreator<WindowContext>,
    ttf: &'a Sdl2TtfContext,
    event_pump: &'a mut EventPump,
    textures: HashMap<TextureRole, Texture<'a>>,
    font: Option<Font<'a, 'static>>,
    music: Option<Music<'static>>,
    click: Option<Chunk>,
    click_channel: Option<Channel>,
    open: bool,
    frame_limit: Option<u32>,
    last_present: Instant,
}

impl<'a> SdlPlatform<'a> {
    pub fn new(
        canvas: &'a mut Canvas<Window>,
        texture_creator: &'a TextureCreator<WindowContext>,
        ttf: &'a Sdl2TtfContext,
        event_pump: &'a mut EventPump,
    ) -> Self {
        SdlPlatform {
            canvas,
            texture_creator,
            ttf,
            event_pump,
            textures: HashMap::new(),
            font: None,
            music: None,
            click: None,
            click_channel: None,
            open: true,
            frame_limit: None,
            last_present: Instant::now(),
        }
    }

    fn cell_color(kind: CellKind) -> Color {
        match kind {
            CellKind::Wall => Color::RGB(40, 40, 60),
            CellKind::Passage => Color::RGB(200, 200, 200),
            CellKind::Player => Color::RGB(80, 160, 255),
            CellKind::Exit => Color::RGB(90, 200, 90),
        }
    }
}

impl Platform for SdlPlatform<'_> {
    fn size(&self) -> (u32, u32) {
        self.canvas.window().size()
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn set_framerate_limit(&mut self, fps: u32) {
        self.frame_limit = Some(fps);
    }

    fn clear(&mut self) {
        self.canvas.set_draw_color(Color::RGB(0, 0, 0));
        self.canvas.clear();
    }

    /// Presents the frame, then sleeps out the rest of the frame slice
    /// when a frame-rate limit is set.
    fn present(&mut self) {
        self.canvas.present();
        if let Some(fps) = self.frame_limit {
            if fps > 0 {
                let target = Duration::from_secs(1) / fps;
                let elapsed = self.last_present.elapsed();
                if elapsed < target {
                    std::thread::sleep(target - elapsed);
                }
            }
        }
        self.last_present = Instant::now();
    }

    fn draw_background(&mut self, role: TextureRole) -> Result<(), String> {
        let texture = self
            .textures
            .get(&role)
            .ok_or_else(|| format!("background texture {:?} not loaded", role))?;
        self.canvas.copy(texture, None, None)
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), String> {
        let font = self.font.as_ref().ok_or_else(|| "UI font not loaded".to_string())?;
        let surface = font
            .render(text)
            .blended(TEXT_COLOR)
            .map_err(|e| e.to_string())?;
        let texture = self
            .texture_creator
            .create_texture_from_surface(&surface)
            .map_err(|e| e.to_string())?;
        let query = texture.query();
        self.canvas
            .copy(&texture, None, Rect::new(x, y, query.width, query.height))
    }

    fn draw_frame(&mut self, x: i32, y: i32, width: u32, height: u32) -> Result<(), String> {
        self.canvas.set_draw_color(FRAME_COLOR);
        self.canvas.draw_rect(Rect::new(x, y, width, height))?;
        if width > 4 && height > 4 {
            self.canvas
                .draw_rect(Rect::new(x + 1, y + 1, width - 2, height - 2))?;
        }
        Ok(())
    }

    fn fill_cell(&mut self, x: i32, y: i32, size: u32, kind: CellKind) -> Result<(), String> {
        self.canvas.set_draw_color(Self::cell_color(kind));
        // Leave a 1px gap so the grid lines stay visible.
        self.canvas
            .fill_rect(Rect::new(x, y, size.saturating_sub(1).max(1), size.saturating_sub(1).max(1)))
    }

    fn load_texture(&mut self, role: TextureRole) -> Result<(), LoadError> {
        if self.textures.contains_key(&role) {
            return Ok(());
        }
        let texture = self
            .texture_creator
            .load_texture(role.asset_path())
            .map_err(|reason| LoadError::Asset { role, reason })?;
        println!("Game: loaded asset {}", role.asset_path());
        self.textures.insert(role, texture);
        Ok(())
    }

    fn load_font(&mut self) -> Result<(), LoadError> {
        if self.font.is_none() {
            let font = self
                .ttf
                .load_font(FONT_PATH, FONT_POINT_SIZE)
                .map_err(LoadError::Font)?;
            println!("Game: loaded asset {}", FONT_PATH);
            self.font = Some(font);
        }
        Ok(())
    }

    fn load_click(&mut self) -> Result<(), LoadError> {
        if self.click.is_none() {
            let chunk = Chunk::from_file(CLICK_PATH).map_err(|reason| LoadError::Audio {
                name: "click sound",
                reason,
            })?;
            println!("Game: loaded asset {}", CLICK_PATH);
            self.click = Some(chunk);
        }
        Ok(())
    }

    fn ensure_music(&mut self) -> Result<(), LoadError> {
        if self.music.is_none() {
            let music = Music::from_file(MUSIC_PATH).map_err(|reason| LoadError::Audio {
                name: "background music",
                reason,
            })?;
            Music::set_volume(MUSIC_VOLUME);
            self.music = Some(music);
        }
        if !Music::is_playing() {
            if let Some(music) = &self.music {
                music.play(-1).map_err(|reason| LoadError::Audio {
                    name: "background music",
                    reason,
                })?;
                println!("Audio: background music playing");
            }
        }
        Ok(())
    }

    fn stop_music(&mut self) {
        Music::halt();
    }

    fn music_playing(&self) -> bool {
        Music::is_playing()
    }

    fn play_click(&mut self) {
        if let Some(chunk) = &self.click {
            match Channel::all().play(chunk, 0) {
                Ok(channel) => self.click_channel = Some(channel),
                Err(e) => eprintln!("Audio: failed to play click sound: {}", e),
            }
        }
    }

    fn effect_status(&self) -> SoundStatus {
        match self.click_channel {
            Some(channel) if channel.is_playing() => SoundStatus::Playing,
            Some(channel) if channel.is_paused() => SoundStatus::Paused,
            _ => SoundStatus::Stopped,
        }
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(InputEvent::Closed),
                Event::MouseButtonDown {
                    mouse_btn: MouseButton::Left,
                    x,
                    y,
                    ..
                } => events.push(InputEvent::PointerPressed { x, y }),
                _ => {}
            }
        }
        events
    }
}
