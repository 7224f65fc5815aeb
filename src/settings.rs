//! Player preferences
//!
//! Persisted separately from the best score.

use serde::{Deserialize, Serialize};

use crate::error::GameResult;
use crate::persistence::KeyValueStore;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Sound effects on/off (the sound button)
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Visual Effects ===
    /// Particle bursts on pickups, growth and speed-ups
    pub particles: bool,
    /// Canvas glow flash on power-ups and hits
    pub glow_flash: bool,
    /// Background grid lines
    pub grid_lines: bool,

    // === Accessibility ===
    /// Reduced motion (no pulsing, no flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,

            particles: true,
            glow_flash: true,
            grid_lines: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "inverted_snake_settings";

    /// Effective glow flash (respects reduced_motion)
    pub fn effective_glow_flash(&self) -> bool {
        self.glow_flash && !self.reduced_motion
    }

    /// Whether collectibles pulse
    pub fn effective_pulse(&self) -> bool {
        !self.reduced_motion
    }

    /// Volume actually applied to sound effects
    pub fn effective_volume(&self) -> f32 {
        if self.sound_enabled {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Flip the sound toggle, returning the new state
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    /// Load settings, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Discarding unreadable settings: {e}");
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read settings: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> GameResult<()> {
        store.set(Self::STORAGE_KEY, &serde_json::to_string(self)?)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn save_and_load() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::default();
        assert!(!settings.toggle_sound());
        settings.reduced_motion = true;
        settings.save(&mut store).unwrap();
        let loaded = Settings::load(&store);
        assert_eq!(loaded, settings);
        assert_eq!(loaded.effective_volume(), 0.0);
        assert!(!loaded.effective_glow_flash());
    }

    #[test]
    fn partial_record_keeps_defaults() {
        let mut store = MemoryStore::new();
        store
            .set(Settings::STORAGE_KEY, r#"{"particles": false}"#)
            .unwrap();
        let loaded = Settings::load(&store);
        assert!(!loaded.particles);
        assert!(loaded.sound_enabled);
    }

    #[test]
    fn corrupt_record_falls_back() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "{").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn volume_is_master_times_sfx() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            ..Settings::default()
        };
        assert!((settings.effective_volume() - 0.25).abs() < 1e-6);
    }
}
