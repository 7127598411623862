//! Fixed timestep simulation tick
//!
//! One call advances the session by `dt_ms`. Order within a tick:
//! player, fire, bullets, enemies (with player contact), spawner,
//! bullet/enemy hits, particles.

use glam::Vec2;
use rand::Rng;

use super::collision::overlaps;
use super::shape::Shape;
use super::spawn::run_spawner;
use super::state::{Bullet, GameEvent, GamePhase, GameSession, Particle, ParticleColor};
use crate::ms_to_secs;

/// Held input for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
}

impl TickInput {
    /// Movement direction from held keys; opposite keys cancel out
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Advance the session by one fixed timestep
pub fn tick(state: &mut GameSession, input: &TickInput, dt_ms: f32) {
    state.events.clear();

    // Nothing moves outside of Playing; the renderer keeps the last frame
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;
    state.elapsed_ms += dt_ms as f64;
    let dt = ms_to_secs(dt_ms);

    move_player(state, input, dt);
    if input.fire {
        try_fire(state);
    }
    advance_bullets(state, dt);
    advance_enemies(state, dt);

    if state.phase == GamePhase::Playing {
        run_spawner(state);
        resolve_bullet_hits(state);
    }

    advance_particles(state, dt);
}

fn move_player(state: &mut GameSession, input: &TickInput, dt: f32) {
    let player = &mut state.player;
    player.pos += input.direction() * player.speed * dt;
    player.clamp_to(&state.playfield);
}

/// Fire from the ship's nose if the cooldown allows it
fn try_fire(state: &mut GameSession) {
    let now = state.elapsed_ms;
    if !state.player.can_fire(now, state.tuning.fire_cooldown_ms) {
        return;
    }

    let shape = Shape::rect(state.tuning.bullet_width, state.tuning.bullet_height);
    let muzzle = Vec2::new(
        state.player.pos.x + state.player.shape.width() / 2.0 - shape.width() / 2.0,
        state.player.pos.y,
    );
    let id = state.next_entity_id();
    state.bullets.push(Bullet {
        id,
        pos: muzzle,
        shape,
        speed: state.tuning.bullet_speed,
    });
    state.player.last_shot_ms = Some(now);
    state.events.push(GameEvent::Fired { at_ms: now });
}

fn advance_bullets(state: &mut GameSession, dt: f32) {
    state.bullets.retain_mut(|bullet| {
        bullet.pos.y -= bullet.speed * dt;
        bullet.pos.y + bullet.shape.height() > 0.0
    });
}

/// Move enemies down, drop escapees and resolve rams against the player
fn advance_enemies(state: &mut GameSession, dt: f32) {
    let player_box = state.player.hitbox();
    let floor = state.playfield.height;
    let mut escaped = 0usize;
    let mut rams: Vec<Vec2> = Vec::new();

    state.enemies.retain_mut(|enemy| {
        enemy.pos.y += enemy.speed * dt;
        enemy.rotation += enemy.spin * dt;

        if enemy.pos.y > floor {
            escaped += 1;
            return false;
        }
        if overlaps(&player_box, &enemy.hitbox()) {
            rams.push(enemy.center());
            return false;
        }
        true
    });

    for _ in 0..escaped {
        state.events.push(GameEvent::EnemyEscaped);
    }

    for center in rams {
        spawn_burst(state, center);
        if state.lives == 0 {
            continue;
        }
        state.lives -= 1;
        log::debug!("player hit, {} lives left", state.lives);
        state.events.push(GameEvent::PlayerHit {
            lives_left: state.lives,
        });
        if state.lives == 0 {
            log::info!("game over with score {}", state.score);
            state.end();
        }
    }
}

/// Each bullet takes out the first enemy it overlaps, in iteration order
fn resolve_bullet_hits(state: &mut GameSession) {
    let mut destroyed: Vec<Vec2> = Vec::new();

    let mut i = 0;
    while i < state.bullets.len() {
        let bullet_box = state.bullets[i].hitbox();
        let hit = state
            .enemies
            .iter()
            .position(|enemy| overlaps(&bullet_box, &enemy.hitbox()));

        match hit {
            Some(index) => {
                let enemy = state.enemies.remove(index);
                state.bullets.remove(i);
                destroyed.push(enemy.center());
            }
            None => i += 1,
        }
    }

    let points = state.tuning.points_per_kill;
    for center in destroyed {
        state.score += points;
        spawn_burst(state, center);
        state.events.push(GameEvent::EnemyDestroyed { center, points });
    }
}

fn advance_particles(state: &mut GameSession, dt: f32) {
    let gravity = state.tuning.particle_gravity;
    let decay = state.tuning.particle_decay;
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.vel.y += gravity * dt;
        particle.life -= decay * dt;
    }
    state.particles.retain(|p| p.life > 0.0);
}

/// Explosion particles at `center`, within the session's particle budget
pub fn spawn_burst(state: &mut GameSession, center: Vec2) {
    let room = state.particle_budget.saturating_sub(state.particles.len());
    let count = state.tuning.particles_per_burst.min(room);
    let max_speed = state.tuning.particle_max_speed;

    for _ in 0..count {
        let rng = &mut state.rng;
        let vel = Vec2::new(
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
        ) * max_speed;
        let size = rng.random_range(2.0..=6.0);
        let color = if rng.random_bool(0.5) {
            ParticleColor::Cream
        } else {
            ParticleColor::Ember
        };
        state.particles.push(Particle {
            pos: center,
            vel,
            life: 1.0,
            size,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::consts::SIM_DT_MS;
    use crate::sim::state::{Enemy, Playfield};
    use crate::tuning::Tuning;

    fn playing_session() -> GameSession {
        let mut state = GameSession::new(7, Playfield::new(600.0, 400.0), Tuning::default());
        state.begin();
        state.spawner.disarm();
        state
    }

    fn boxed_enemy(state: &mut GameSession, x: f32, y: f32, size: f32, speed: f32) {
        let id = state.next_entity_id();
        state
            .enemies
            .push(Enemy::new(id, Vec2::new(x, y), Shape::rect(size, size), speed));
    }

    fn fire() -> TickInput {
        TickInput {
            fire: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_idle_session_does_not_advance() {
        let mut state = GameSession::new(7, Playfield::default(), Tuning::default());
        tick(&mut state, &fire(), SIM_DT_MS);
        assert_eq!(state.time_ticks, 0);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_player_stops_at_left_wall() {
        let mut state = playing_session();
        let input = TickInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..200 {
            tick(&mut state, &input, SIM_DT_MS);
        }
        assert_eq!(state.player.pos.x, 0.0);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut state = playing_session();
        tick(&mut state, &fire(), SIM_DT_MS);
        assert_eq!(state.bullets.len(), 1);
        assert!(matches!(state.events[0], GameEvent::Fired { .. }));

        // 100ms later: still cooling down
        tick(&mut state, &fire(), 100.0);
        assert_eq!(state.bullets.len(), 1);

        // 220ms after the first shot
        tick(&mut state, &fire(), 120.0);
        assert_eq!(state.bullets.len(), 2);
    }

    #[test]
    fn test_bullet_spawns_at_muzzle() {
        let mut state = playing_session();
        let player_pos = state.player.pos;
        tick(&mut state, &fire(), SIM_DT_MS);
        let bullet = &state.bullets[0];
        assert_eq!(bullet.pos.x, player_pos.x + 25.0 - 3.0);
        // Already moved up by one tick of travel
        assert!(bullet.pos.y < player_pos.y);
    }

    #[test]
    fn test_bullet_leaves_through_top() {
        let mut state = playing_session();
        state.bullets.push(Bullet {
            id: 99,
            pos: Vec2::new(100.0, -10.0),
            shape: Shape::rect(6.0, 15.0),
            speed: 720.0,
        });
        tick(&mut state, &TickInput::default(), SIM_DT_MS);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_bullet_destroys_enemy() {
        let mut state = playing_session();
        boxed_enemy(&mut state, 100.0, 100.0, 30.0, 0.0);
        state.bullets.push(Bullet {
            id: 99,
            pos: Vec2::new(110.0, 120.0),
            shape: Shape::rect(6.0, 15.0),
            speed: 720.0,
        });

        tick(&mut state, &TickInput::default(), SIM_DT_MS);

        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(state.score, 10);
        assert_eq!(state.particles.len(), 15);
        assert_eq!(
            state.events,
            vec![GameEvent::EnemyDestroyed {
                center: Vec2::new(115.0, 115.0),
                points: 10
            }]
        );
    }

    #[test]
    fn test_bullet_only_takes_first_enemy() {
        let mut state = playing_session();
        boxed_enemy(&mut state, 100.0, 100.0, 30.0, 0.0);
        boxed_enemy(&mut state, 105.0, 100.0, 30.0, 0.0);
        let second = state.enemies[1].id;
        state.bullets.push(Bullet {
            id: 99,
            pos: Vec2::new(110.0, 120.0),
            shape: Shape::rect(6.0, 15.0),
            speed: 720.0,
        });

        tick(&mut state, &TickInput::default(), SIM_DT_MS);

        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].id, second);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_enemy_below_floor_is_removed_before_collisions() {
        let mut state = playing_session();
        boxed_enemy(&mut state, 100.0, 401.0, 30.0, 60.0);
        state.bullets.push(Bullet {
            id: 99,
            pos: Vec2::new(110.0, 410.0),
            shape: Shape::rect(6.0, 15.0),
            speed: 0.0,
        });

        tick(&mut state, &TickInput::default(), SIM_DT_MS);

        assert!(state.enemies.is_empty());
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.events, vec![GameEvent::EnemyEscaped]);
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_ram_costs_a_life() {
        let mut state = playing_session();
        let pos = state.player.pos;
        boxed_enemy(&mut state, pos.x, pos.y, 30.0, 0.0);

        tick(&mut state, &TickInput::default(), SIM_DT_MS);

        assert_eq!(state.lives, 2);
        assert!(state.enemies.is_empty());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.events, vec![GameEvent::PlayerHit { lives_left: 2 }]);
    }

    #[test]
    fn test_last_life_ends_the_game() {
        let mut state = playing_session();
        state.lives = 1;
        state.score = 40;
        let pos = state.player.pos;
        boxed_enemy(&mut state, pos.x, pos.y, 30.0, 0.0);
        boxed_enemy(&mut state, 10.0, 10.0, 30.0, 0.0);

        tick(&mut state, &TickInput::default(), SIM_DT_MS);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        assert!(!state.spawner.is_armed());
        assert!(state.events.contains(&GameEvent::GameOver { score: 40 }));

        // Frozen afterwards
        let enemy_y = state.enemies[0].pos.y;
        tick(&mut state, &TickInput::default(), SIM_DT_MS);
        assert_eq!(state.enemies[0].pos.y, enemy_y);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_particles_fade_out() {
        let mut state = playing_session();
        spawn_burst(&mut state, Vec2::new(50.0, 50.0));
        assert_eq!(state.particles.len(), 15);
        // Life decays 1.2/s, gone within one second
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), SIM_DT_MS);
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_particle_gravity_pulls_down() {
        let mut state = playing_session();
        state.tuning.particle_gravity = 600.0;
        spawn_burst(&mut state, Vec2::new(50.0, 50.0));
        let before: Vec<f32> = state.particles.iter().map(|p| p.vel.y).collect();
        tick(&mut state, &TickInput::default(), SIM_DT_MS);
        for (p, vy) in state.particles.iter().zip(before) {
            assert!(p.vel.y > vy);
        }
    }

    #[test]
    fn test_burst_respects_budget() {
        let mut state = playing_session();
        state.particle_budget = 20;
        spawn_burst(&mut state, Vec2::ZERO);
        spawn_burst(&mut state, Vec2::ZERO);
        assert_eq!(state.particles.len(), 20);
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed produce identical runs
        let mut a = GameSession::new(99999, Playfield::default(), Tuning::default());
        let mut b = GameSession::new(99999, Playfield::default(), Tuning::default());
        a.begin();
        b.begin();

        let inputs = [
            TickInput {
                left: true,
                fire: true,
                ..Default::default()
            },
            TickInput {
                right: true,
                ..Default::default()
            },
            fire(),
            TickInput::default(),
        ];
        for step in 0..600 {
            let input = &inputs[step % inputs.len()];
            tick(&mut a, input, SIM_DT_MS);
            tick(&mut b, input, SIM_DT_MS);
        }

        assert_eq!(a.score, b.score);
        assert_eq!(a.enemies, b.enemies);
        assert_eq!(a.player, b.player);
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(left, right, up, down, fire)| TickInput {
                left,
                right,
                up,
                down,
                fire,
            },
        )
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_bounds(
            seed in any::<u64>(),
            steps in prop::collection::vec((arb_input(), 1.0f32..120.0), 1..300),
        ) {
            let mut state = GameSession::new(seed, Playfield::new(480.0, 360.0), Tuning::default());
            state.begin();
            for (input, dt) in &steps {
                tick(&mut state, input, *dt);
                let p = &state.player;
                prop_assert!(p.pos.x >= 0.0 && p.pos.x <= 480.0 - p.shape.width());
                prop_assert!(p.pos.y >= 0.0 && p.pos.y <= 360.0 - p.shape.height());
            }
        }

        #[test]
        fn prop_shots_never_beat_cooldown(
            seed in any::<u64>(),
            steps in prop::collection::vec((any::<bool>(), 1.0f32..80.0), 1..400),
        ) {
            let mut state = GameSession::new(seed, Playfield::default(), Tuning::default());
            state.begin();
            let mut shots: Vec<f64> = Vec::new();
            for (fire, dt) in &steps {
                let input = TickInput { fire: *fire, ..Default::default() };
                tick(&mut state, &input, *dt);
                for event in &state.events {
                    if let GameEvent::Fired { at_ms } = event {
                        shots.push(*at_ms);
                    }
                }
            }
            for pair in shots.windows(2) {
                prop_assert!(pair[1] - pair[0] >= 200.0);
            }
        }

        #[test]
        fn prop_score_never_decreases_while_playing(
            seed in any::<u64>(),
            steps in prop::collection::vec(arb_input(), 1..400),
        ) {
            let mut state = GameSession::new(seed, Playfield::default(), Tuning::default());
            state.begin();
            let mut last = 0;
            for input in &steps {
                tick(&mut state, input, SIM_DT_MS);
                prop_assert!(state.score >= last);
                last = state.score;
            }
        }
    }
}
