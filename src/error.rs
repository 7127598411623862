//! Error types for the game core

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameError {
    /// `start()` was called before a drawing surface was attached
    SurfaceUnavailable,
    /// The host refused to schedule a frame callback
    Scheduler(String),
    /// Tuning data failed to parse or holds out-of-range values
    InvalidTuning(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SurfaceUnavailable => {
                write!(f, "game not initialized: no drawing surface attached")
            }
            Self::Scheduler(reason) => write!(f, "frame scheduling failed: {reason}"),
            Self::InvalidTuning(reason) => write!(f, "invalid tuning: {reason}"),
        }
    }
}

impl std::error::Error for GameError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            GameError::SurfaceUnavailable.to_string(),
            "game not initialized: no drawing surface attached"
        );
        assert_eq!(
            GameError::InvalidTuning("bullet_speed must be positive".into()).to_string(),
            "invalid tuning: bullet_speed must be positive"
        );
    }
}
