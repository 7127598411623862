//! Enemy spawner (interval-timer policy)
//!
//! The next spawn happens `max(min, base - per_point * score)` ms after the
//! previous one. The deadline lives in simulation time on the session, so a
//! stopped or finished session simply has nothing armed.

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, GameSession, OUTLINE_POINTS};
use crate::tuning::Tuning;

/// The single pending spawn deadline
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpawnTimer {
    deadline_ms: Option<f64>,
}

impl SpawnTimer {
    pub fn arm(&mut self, at_ms: f64) {
        self.deadline_ms = Some(at_ms);
    }

    pub fn disarm(&mut self) {
        self.deadline_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline_ms.is_some()
    }

    pub fn deadline_ms(&self) -> Option<f64> {
        self.deadline_ms
    }

    pub fn is_due(&self, now_ms: f64) -> bool {
        self.deadline_ms.is_some_and(|at| now_ms >= at)
    }
}

/// Delay before the next spawn; shrinks with score, never below the floor
pub fn next_spawn_interval_ms(score: u64, tuning: &Tuning) -> f32 {
    let shrink = score as f32 * tuning.spawn_interval_per_point_ms;
    (tuning.spawn_base_interval_ms - shrink).max(tuning.spawn_min_interval_ms)
}

/// Fall speed band for new enemies; rises with score up to a cap
pub fn enemy_speed_band(score: u64, tuning: &Tuning) -> (f32, f32) {
    let bonus = (score as f32 * tuning.enemy_speed_per_point).min(tuning.enemy_speed_bonus_cap);
    (tuning.enemy_min_speed + bonus, tuning.enemy_max_speed + bonus)
}

/// Spawn one enemy if the deadline has passed, then re-arm
pub fn run_spawner(state: &mut GameSession) {
    if !state.is_playing() || !state.spawner.is_due(state.elapsed_ms) {
        return;
    }

    spawn_enemy(state);

    let interval = next_spawn_interval_ms(state.score, &state.tuning);
    state.spawner.arm(state.elapsed_ms + interval as f64);
}

/// Place a new asteroid just above the top edge
pub fn spawn_enemy(state: &mut GameSession) {
    let tuning = &state.tuning;
    let rng = &mut state.rng;

    let size = rng.random_range(tuning.enemy_min_size..=tuning.enemy_max_size);
    let max_x = (state.playfield.width - size).max(0.0);
    let x = rng.random_range(0.0..=max_x);
    let (min_speed, max_speed) = enemy_speed_band(state.score, tuning);
    let speed = rng.random_range(min_speed..=max_speed);
    let spin = rng.random_range(-tuning.enemy_max_spin..=tuning.enemy_max_spin);

    let mut outline = [1.0; OUTLINE_POINTS];
    for point in outline.iter_mut() {
        *point = rng.random_range(0.7..=1.0);
    }

    let shape = Enemy::shape_for(size, tuning.enemy_hitbox);
    let id = state.next_entity_id();
    let mut enemy = Enemy::new(id, Vec2::new(x, -size), shape, speed);
    enemy.spin = spin;
    enemy.outline = outline;

    log::debug!("spawned enemy {} size {:.0} at x {:.0}", id, size, x);
    state.enemies.push(enemy);
}
