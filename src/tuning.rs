//! Data-driven game balance
//!
//! Every gameplay constant lives here so variants (faster asteroids, round
//! hitboxes, more lives) are a JSON file away instead of a code change.
//! Speeds are pixels per second, times are milliseconds.

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Hitbox used for every enemy of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyHitbox {
    /// Square bounding box (size x size), AABB tests everywhere
    #[default]
    Box,
    /// Inscribed circle (radius size/2)
    Round,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    pub player_speed: f32,
    pub starting_lives: u32,

    // === Bullets ===
    pub bullet_width: f32,
    pub bullet_height: f32,
    pub bullet_speed: f32,
    /// Minimum time between two shots
    pub fire_cooldown_ms: f32,

    // === Enemies ===
    pub enemy_min_size: f32,
    pub enemy_max_size: f32,
    pub enemy_min_speed: f32,
    pub enemy_max_speed: f32,
    /// Extra fall speed per point scored
    pub enemy_speed_per_point: f32,
    /// Ceiling on the score-driven speed bonus
    pub enemy_speed_bonus_cap: f32,
    /// Max rotation speed in radians per second (either direction)
    pub enemy_max_spin: f32,
    pub enemy_hitbox: EnemyHitbox,
    pub points_per_kill: u64,

    // === Spawner ===
    pub spawn_base_interval_ms: f32,
    pub spawn_interval_per_point_ms: f32,
    pub spawn_min_interval_ms: f32,

    // === Particles ===
    pub particles_per_burst: usize,
    pub particle_max_speed: f32,
    /// Life lost per second (life starts at 1.0)
    pub particle_decay: f32,
    /// Downward acceleration in px/s² (0 disables)
    pub particle_gravity: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_width: 50.0,
            player_height: 40.0,
            player_speed: 480.0,
            starting_lives: 3,

            bullet_width: 6.0,
            bullet_height: 15.0,
            bullet_speed: 720.0,
            fire_cooldown_ms: 200.0,

            enemy_min_size: 30.0,
            enemy_max_size: 60.0,
            enemy_min_speed: 120.0,
            enemy_max_speed: 300.0,
            enemy_speed_per_point: 0.5,
            enemy_speed_bonus_cap: 240.0,
            enemy_max_spin: 3.0,
            enemy_hitbox: EnemyHitbox::Box,
            points_per_kill: 10,

            spawn_base_interval_ms: 2000.0,
            spawn_interval_per_point_ms: 10.0,
            spawn_min_interval_ms: 500.0,

            particles_per_burst: 15,
            particle_max_speed: 240.0,
            particle_decay: 1.2,
            particle_gravity: 0.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| GameError::InvalidTuning(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        serde_json::to_string_pretty(self).map_err(|e| GameError::InvalidTuning(e.to_string()))
    }

    /// Reject values that would break the simulation invariants
    pub fn validate(&self) -> Result<(), GameError> {
        let positive = [
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("player_speed", self.player_speed),
            ("bullet_width", self.bullet_width),
            ("bullet_height", self.bullet_height),
            ("bullet_speed", self.bullet_speed),
            ("enemy_min_size", self.enemy_min_size),
            ("enemy_min_speed", self.enemy_min_speed),
            ("spawn_min_interval_ms", self.spawn_min_interval_ms),
            ("particle_decay", self.particle_decay),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(GameError::InvalidTuning(format!("{name} must be positive")));
            }
        }

        let non_negative = [
            ("fire_cooldown_ms", self.fire_cooldown_ms),
            ("enemy_speed_per_point", self.enemy_speed_per_point),
            ("enemy_speed_bonus_cap", self.enemy_speed_bonus_cap),
            ("enemy_max_spin", self.enemy_max_spin),
            ("spawn_interval_per_point_ms", self.spawn_interval_per_point_ms),
            ("particle_max_speed", self.particle_max_speed),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(GameError::InvalidTuning(format!("{name} must not be negative")));
            }
        }
        if self.enemy_max_size < self.enemy_min_size {
            return Err(GameError::InvalidTuning(
                "enemy_max_size is below enemy_min_size".into(),
            ));
        }
        if self.enemy_max_speed < self.enemy_min_speed {
            return Err(GameError::InvalidTuning(
                "enemy_max_speed is below enemy_min_speed".into(),
            ));
        }
        if self.spawn_base_interval_ms < self.spawn_min_interval_ms {
            return Err(GameError::InvalidTuning(
                "spawn_base_interval_ms is below spawn_min_interval_ms".into(),
            ));
        }
        if self.starting_lives == 0 {
            return Err(GameError::InvalidTuning("starting_lives must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "starting_lives": 5, "enemy_hitbox": "Round" }"#)
            .expect("valid tuning");
        assert_eq!(tuning.starting_lives, 5);
        assert_eq!(tuning.enemy_hitbox, EnemyHitbox::Round);
        assert_eq!(tuning.fire_cooldown_ms, 200.0);
    }

    #[test]
    fn test_rejects_floor_above_base() {
        let err = Tuning::from_json(
            r#"{ "spawn_base_interval_ms": 300.0, "spawn_min_interval_ms": 400.0 }"#,
        )
        .unwrap_err();
        assert!(matches!(err, GameError::InvalidTuning(_)));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(Tuning::from_json("not json").is_err());
        assert!(Tuning::from_json(r#"{ "bullet_speed": -1.0 }"#).is_err());
    }

    #[test]
    fn test_json_survives_save_and_load() {
        let mut tuning = Tuning::default();
        tuning.particle_gravity = 90.0;
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }
}
