//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of each collection)
//! - No rendering or platform dependencies

pub mod collision;
pub mod shape;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Hitbox, aabb_overlap, overlaps};
pub use shape::Shape;
pub use spawn::{SpawnTimer, next_spawn_interval_ms};
pub use state::{
    Bullet, Enemy, GameEvent, GamePhase, GameSession, OUTLINE_POINTS, Particle, ParticleColor,
    Playfield, Player,
};
pub use tick::{TickInput, tick};
