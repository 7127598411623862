//! Game session and core simulation types
//!
//! A `GameSession` is an explicit value owned by whoever hosts the game.
//! Nothing in the simulation reaches for globals, so several sessions can
//! run side by side and tests can build one in a line.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::shape::Shape;
use super::spawn::SpawnTimer;
use crate::consts::*;
use crate::sim::collision::Hitbox;
use crate::tuning::{EnemyHitbox, Tuning};

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Game view closed or never started
    Idle,
    /// Update and spawner active
    Playing,
    /// Frozen with the overlay up, waiting for restart or exit
    GameOver,
}

/// Things that happened during a tick, for audio and score hooks
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Player fired a bullet at the given session time
    Fired { at_ms: f64 },
    /// A bullet destroyed an enemy
    EnemyDestroyed { center: Vec2, points: u64 },
    /// An enemy rammed the player
    PlayerHit { lives_left: u32 },
    /// An enemy fell past the bottom edge
    EnemyEscaped,
    /// Lives ran out
    GameOver { score: u64 },
}

/// Fixed-size drawable area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The player's ship
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub shape: Shape,
    /// Pixels per second
    pub speed: f32,
    /// Session time of the last shot (fire cooldown)
    pub last_shot_ms: Option<f64>,
}

impl Player {
    /// Create a player at its spawn point (bottom center)
    pub fn new(playfield: &Playfield, tuning: &Tuning) -> Self {
        let shape = Shape::rect(tuning.player_width, tuning.player_height);
        let mut player = Self {
            pos: Self::spawn_point(playfield, &shape),
            shape,
            speed: tuning.player_speed,
            last_shot_ms: None,
        };
        player.clamp_to(playfield);
        player
    }

    pub fn spawn_point(playfield: &Playfield, shape: &Shape) -> Vec2 {
        Vec2::new(
            playfield.width / 2.0 - shape.width() / 2.0,
            playfield.height - PLAYER_BOTTOM_OFFSET,
        )
    }

    /// Keep the whole ship inside the playfield
    pub fn clamp_to(&mut self, playfield: &Playfield) {
        let field = Vec2::new(playfield.width, playfield.height);
        let max = (field - self.shape.size()).max(Vec2::ZERO);
        self.pos = self.pos.clamp(Vec2::ZERO, max);
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.pos, self.shape)
    }

    /// Whether the cooldown has elapsed at session time `now_ms`
    pub fn can_fire(&self, now_ms: f64, cooldown_ms: f32) -> bool {
        match self.last_shot_ms {
            Some(last) => now_ms - last >= cooldown_ms as f64,
            None => true,
        }
    }
}

/// A player bullet
#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub shape: Shape,
    /// Upward speed, pixels per second
    pub speed: f32,
}

impl Bullet {
    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.pos, self.shape)
    }
}

/// Points on an asteroid outline
pub const OUTLINE_POINTS: usize = 8;

/// A falling asteroid
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub shape: Shape,
    /// Downward speed, pixels per second
    pub speed: f32,
    /// Cosmetic rotation (radians)
    pub rotation: f32,
    /// Radians per second
    pub spin: f32,
    /// Radius factor per outline point, fixed at spawn
    pub outline: [f32; OUTLINE_POINTS],
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, shape: Shape, speed: f32) -> Self {
        Self {
            id,
            pos,
            shape,
            speed,
            rotation: 0.0,
            spin: 0.0,
            outline: [1.0; OUTLINE_POINTS],
        }
    }

    /// Hitbox shape for a square asteroid of the given size
    pub fn shape_for(size: f32, hitbox: EnemyHitbox) -> Shape {
        match hitbox {
            EnemyHitbox::Box => Shape::rect(size, size),
            EnemyHitbox::Round => Shape::circle(size / 2.0),
        }
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.pos, self.shape)
    }

    pub fn center(&self) -> Vec2 {
        self.shape.center(self.pos)
    }
}

/// Particle tint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    Cream,
    Ember,
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32, // 0-1, decreases over time
    pub size: f32,
    pub color: ParticleColor,
}

/// Complete state of one game
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Seed the RNG started from
    pub seed: u64,
    pub tuning: Tuning,
    pub playfield: Playfield,
    pub phase: GamePhase,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub score: u64,
    pub lives: u32,
    /// Simulation time since the current run began
    pub elapsed_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub spawner: SpawnTimer,
    /// Particle cap for this session (quality dependent)
    pub particle_budget: usize,
    /// Events produced by the most recent tick
    pub events: Vec<GameEvent>,
    pub rng: Pcg32,
    next_id: u32,
}

impl GameSession {
    /// Create an idle session
    pub fn new(seed: u64, playfield: Playfield, tuning: Tuning) -> Self {
        let player = Player::new(&playfield, &tuning);
        let lives = tuning.starting_lives;
        Self {
            seed,
            tuning,
            playfield,
            phase: GamePhase::Idle,
            player,
            bullets: Vec::new(),
            enemies: Vec::new(),
            particles: Vec::new(),
            score: 0,
            lives,
            elapsed_ms: 0.0,
            time_ticks: 0,
            spawner: SpawnTimer::default(),
            particle_budget: MAX_PARTICLES,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Reset entities, score and lives, then enter Playing with the spawner armed
    pub fn begin(&mut self) {
        self.player = Player::new(&self.playfield, &self.tuning);
        self.bullets.clear();
        self.enemies.clear();
        self.particles.clear();
        self.events.clear();
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.elapsed_ms = 0.0;
        self.time_ticks = 0;
        self.spawner.arm(0.0);
        self.phase = GamePhase::Playing;
    }

    /// Freeze the run and raise the overlay
    pub fn end(&mut self) {
        self.spawner.disarm();
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver { score: self.score });
    }

    /// Return to Idle; nothing stays scheduled
    pub fn halt(&mut self) {
        self.spawner.disarm();
        self.phase = GamePhase::Idle;
    }

    /// Change the playfield (surface resize); keeps the player inside it
    pub fn set_playfield(&mut self, playfield: Playfield) {
        self.playfield = playfield;
        self.player.clamp_to(&playfield);
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }
}
