//! Reader settings and their persistence abstraction.

use crate::{hyphenator::MAX_CHUNK_LENGTH_DEFAULT, orp::ORP_OFFSET_DEFAULT};

pub const WPM_MIN: u16 = 200;
pub const WPM_MAX: u16 = 1000;
pub const WPM_DEFAULT: u16 = 400;
pub const WPM_STEP: u16 = 10;
pub const WPM_KEYBOARD_STEP: u16 = 50;
pub const WPM_PRESETS: [u16; 4] = [300, 450, 600, 800];

/// User-tunable settings consumed at tokenization time.
///
/// `base_wpm` is also the live playback speed until the caller adjusts it;
/// adjustments during playback go through the speed source, never through
/// re-tokenization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReaderSettings {
    pub base_wpm: u16,
    pub orp_offset: f64,
    pub dynamic_pacing: bool,
    pub max_chunk_length: usize,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            base_wpm: WPM_DEFAULT,
            orp_offset: ORP_OFFSET_DEFAULT,
            dynamic_pacing: true,
            max_chunk_length: MAX_CHUNK_LENGTH_DEFAULT,
        }
    }
}

impl ReaderSettings {
    /// Clamps a requested speed into the supported range.
    pub fn clamp_wpm(wpm: u16) -> u16 {
        wpm.clamp(WPM_MIN, WPM_MAX)
    }
}

/// Abstract settings persistence backend. Storage itself lives outside the
/// engine; only the interface ships here.
pub trait SettingsStore {
    type Error;

    fn load(&mut self) -> Result<Option<ReaderSettings>, Self::Error>;
    fn save(&mut self, settings: &ReaderSettings) -> Result<(), Self::Error>;
}

/// No-hardware settings backend used in tests and bring-up.
#[derive(Clone, Copy, Debug, Default)]
pub struct MemorySettingsStore {
    saved: Option<ReaderSettings>,
}

impl MemorySettingsStore {
    pub const fn new() -> Self {
        Self { saved: None }
    }
}

impl SettingsStore for MemorySettingsStore {
    type Error = core::convert::Infallible;

    fn load(&mut self) -> Result<Option<ReaderSettings>, Self::Error> {
        Ok(self.saved)
    }

    fn save(&mut self, settings: &ReaderSettings) -> Result<(), Self::Error> {
        self.saved = Some(*settings);
        Ok(())
    }
}
