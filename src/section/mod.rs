//! The Section contract
//!
//! A section is one screen of the game (menu, maze builder, gameplay)
//! with its own assets and per-frame behavior. Exactly one section is
//! alive at a time; the driver in `src/game.rs` owns it and swaps it when
//! it requests a transition.

pub mod builder;
pub mod gameplay;
pub mod menu;

pub use builder::MazeBuilder;
pub use gameplay::Gameplay;
pub use menu::Menu;

use crate::platform::{LoadError, Platform, SoundStatus};

/// The closed set of section identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionIdentity {
    Menu,
    MazeBuilder,
    SaveSlot1,
    SaveSlot2,
    SaveSlot3,
}

impl SectionIdentity {
    /// Identity of the gameplay section for a 0-based slot index.
    pub fn for_slot(slot: usize) -> Option<SectionIdentity> {
        match slot {
            0 => Some(SectionIdentity::SaveSlot1),
            1 => Some(SectionIdentity::SaveSlot2),
            2 => Some(SectionIdentity::SaveSlot3),
            _ => None,
        }
    }
}

/// Per-frame capability set every section implements.
pub trait Section<P: Platform> {
    /// Acquires the section's assets. Called once right after
    /// construction; calling it again is a no-op. A failure is fatal to
    /// the process, decided by the owner.
    fn load(&mut self, platform: &mut P) -> Result<(), LoadError>;

    /// Advances animation/derived state. Never blocks.
    fn update(&mut self, platform: &mut P);

    /// Drains all pending input events and applies them.
    fn handle_input(&mut self, platform: &mut P);

    /// Draws the section. Must not mutate game state.
    fn render(&self, platform: &mut P) -> Result<(), String>;

    /// This section's own identity tag.
    fn identity(&self) -> SectionIdentity;

    /// The transition the user has requested, if any. The driver acts on
    /// it once the transition click sound has finished.
    fn requested_transition(&self) -> Option<SectionIdentity>;

    /// Whether this section's transition click sound is still audible.
    fn sound_status(&self, platform: &P) -> SoundStatus {
        platform.effect_status()
    }
}
