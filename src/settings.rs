//! Game settings and preferences
//!
//! Persisted as JSON next to the high score table. Gameplay tuning
//! knobs here feed directly into the simulation (energy rates); the
//! rest is frontend preference.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{ENERGY_BURN_RATE, ENERGY_RECHARGE_RATE};

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute all audio
    pub muted: bool,

    // === Visual effects ===
    /// Particle effects (explosions, sparks)
    pub particles: bool,
    /// Show FPS counter
    pub show_fps: bool,

    // === Gameplay tuning ===
    /// Boost energy drain, units per second
    pub energy_burn_rate: f32,
    /// Energy recovery while idle, units per second
    pub energy_recharge_rate: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            particles: true,
            show_fps: false,
            energy_burn_rate: ENERGY_BURN_RATE,
            energy_recharge_rate: ENERGY_RECHARGE_RATE,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("settings file is invalid, using defaults: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file. Failure is logged and ignored.
    pub fn save(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    log::warn!("failed to save settings: {}", e);
                }
            }
            Err(e) => log::warn!("failed to serialize settings: {}", e),
        }
    }

    /// Push the tuning knobs into a fresh game state
    pub fn apply(&self, state: &mut crate::sim::GameState) {
        state.player.energy_burn_rate = self.energy_burn_rate.max(0.0);
        state.player.energy_recharge_rate = self.energy_recharge_rate.max(0.0);
    }
}
