//! Space Shooter - a canvas arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, collisions, game state)
//! - `renderer`: Drawing-surface abstraction and scene rendering
//! - `platform`: Browser/native platform abstraction (input, clock, storage)
//! - `game`: Lifecycle controller tying the clock, input and hooks together
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod best_score;
pub mod error;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use best_score::BestScore;
pub use error::GameError;
pub use game::{Game, KeyResponse};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz)
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame gap we try to catch up on (tab switches etc.)
    pub const MAX_FRAME_GAP_MS: f64 = 100.0;

    /// Default playfield size when no surface dictates one
    pub const DEFAULT_WIDTH: f32 = 600.0;
    pub const DEFAULT_HEIGHT: f32 = 400.0;

    /// Player spawns this far above the bottom edge
    pub const PLAYER_BOTTOM_OFFSET: f32 = 60.0;

    /// Hard cap on live particles regardless of settings
    pub const MAX_PARTICLES: usize = 256;
}

/// Milliseconds to seconds, for velocity integration
#[inline]
pub fn ms_to_secs(ms: f32) -> f32 {
    ms / 1000.0
}
