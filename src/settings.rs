//! Game settings and preferences
//!
//! Persisted separately from the best score in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_PARTICLES;
use crate::platform::storage;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 60,
            QualityPreset::Medium => 150,
            QualityPreset::High => MAX_PARTICLES,
        }
    }

    /// Number of background stars
    pub fn star_count(&self) -> usize {
        match self {
            QualityPreset::Low => 0,
            QualityPreset::Medium => 50,
            QualityPreset::High => 90,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Particle effects (explosions)
    pub particles: bool,

    // === Audio ===
    /// Sound effects play only when the user turned them on
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === Accessibility ===
    /// Reduced motion (static starfield, no engine flicker)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            // Off until the visitor opts in
            sound_enabled: false,
            master_volume: 0.3,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Background stars to draw
    pub fn star_count(&self) -> usize {
        self.quality.star_count()
    }

    /// Icon classes of the sound toggle button
    pub const SOUND_ON_ICON: &'static str = "fa-volume-up";
    pub const SOUND_OFF_ICON: &'static str = "fa-volume-mute";

    pub fn sound_icon(&self) -> &'static str {
        if self.sound_enabled {
            Self::SOUND_ON_ICON
        } else {
            Self::SOUND_OFF_ICON
        }
    }

    /// Flip the sound preference and persist it
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.save();
        self.sound_enabled
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "space_shooter_settings";

    pub fn load() -> Self {
        if let Some(json) = storage::get_item(Self::STORAGE_KEY) {
            if let Ok(settings) = serde_json::from_str(&json) {
                log::info!("Loaded settings from storage");
                return settings;
            }
            log::warn!("Stored settings unreadable, using defaults");
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            storage::set_item(Self::STORAGE_KEY, &json);
            log::info!("Settings saved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sound_off_by_default() {
        assert!(!Settings::default().sound_enabled);
    }

    #[test]
    fn test_particle_cap() {
        let mut settings = Settings::from_preset(QualityPreset::Low);
        assert_eq!(settings.max_particles(), 60);
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
        assert_eq!(Settings::from_preset(QualityPreset::High).max_particles(), MAX_PARTICLES);
    }

    #[test]
    fn test_sound_icon_follows_toggle() {
        let mut settings = Settings::default();
        assert_eq!(settings.sound_icon(), "fa-volume-mute");
        settings.toggle_sound();
        assert_eq!(settings.sound_icon(), "fa-volume-up");
    }

    #[test]
    fn test_toggle_sound_persists() {
        let mut settings = Settings::default();
        assert!(settings.toggle_sound());
        assert!(Settings::load().sound_enabled);
        assert!(!settings.toggle_sound());
        assert!(!Settings::load().sound_enabled);
    }
}
