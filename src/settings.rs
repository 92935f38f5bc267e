//! Game settings and preferences
//!
//! Persisted separately from scores under `cheddar_settings`.

use serde::{Deserialize, Serialize};

use crate::audio::MusicTrack;
use crate::error::StorageError;
use crate::persistence::{KeyValueStore, SETTINGS_KEY, load_json, save_json};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Which background track plays during a run
    pub music_track: MusicTrack,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume multiplier (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Visual Effects ===
    /// Screen shake on hits and dashes
    pub screen_shake: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, no full-screen flash)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_track: MusicTrack::One,
            music_volume: 0.5,
            sfx_volume: 1.0,
            muted: false,
            screen_shake: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Full-screen hit flash (respects reduced_motion)
    pub fn effective_hit_flash(&self) -> bool {
        !self.reduced_motion
    }

    /// Clamp volumes into range after loading hand-edited data
    fn sanitized(mut self) -> Self {
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }

    /// Load settings; missing or malformed data gives defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        match load_json::<Settings>(store, SETTINGS_KEY) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings.sanitized()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        save_json(store, SETTINGS_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
