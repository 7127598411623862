//! Palette for game elements

use crate::sim::ParticleColor;

/// Linear RGBA, each channel 0-1
pub type Rgba = [f32; 4];

pub const BACKGROUND: Rgba = [0.04, 0.04, 0.1, 1.0];
pub const STAR: Rgba = [0.99, 0.98, 0.83, 0.5];
pub const PLAYER: Rgba = [0.99, 0.98, 0.83, 1.0]; // Cream
pub const ENGINE: Rgba = [0.29, 0.14, 0.0, 1.0]; // Brown
pub const BULLET: Rgba = [0.29, 0.14, 0.0, 1.0];
pub const ENEMY: Rgba = [0.0, 0.24, 0.48, 1.0]; // Deep blue
pub const HUD_TEXT: Rgba = [0.99, 0.98, 0.83, 1.0];
pub const OVERLAY: Rgba = [0.0, 0.0, 0.0, 0.7];
pub const PROMPT: Rgba = [0.29, 0.14, 0.0, 1.0];

pub fn particle(color: ParticleColor) -> Rgba {
    match color {
        ParticleColor::Cream => PLAYER,
        ParticleColor::Ember => ENGINE,
    }
}

/// CSS `rgba()` string for canvas fill styles
pub fn css(color: Rgba) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css() {
        assert_eq!(css([1.0, 0.0, 0.5, 1.0]), "rgba(255, 0, 128, 1)");
        assert_eq!(css(OVERLAY), "rgba(0, 0, 0, 0.7)");
    }
}
