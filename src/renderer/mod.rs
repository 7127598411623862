//! Rendering module
//!
//! The scene is drawn through the small `Surface` trait so the simulation
//! never touches a UI toolkit. The browser uses a canvas 2D context; tests
//! and headless runs record draw commands instead.

pub mod colors;
pub mod recording;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use colors::Rgba;
pub use recording::{CommandRecorder, DrawCommand};
pub use scene::{RenderOptions, render};

use glam::Vec2;

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_css(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size_px: f32,
    pub bold: bool,
    pub align: TextAlign,
    pub color: Rgba,
}

impl TextStyle {
    /// CSS font shorthand
    pub fn font(&self) -> String {
        let weight = if self.bold { "bold " } else { "" };
        format!("{}{}px Inter, sans-serif", weight, self.size_px)
    }
}

/// Minimal 2D drawing surface
pub trait Surface {
    /// Pixel dimensions
    fn size(&self) -> (f32, f32);
    /// Fill the whole surface
    fn clear(&mut self, color: Rgba);
    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Rgba);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba);
    fn fill_text(&mut self, text: &str, pos: Vec2, style: &TextStyle);
    /// Global alpha for the following draws
    fn set_alpha(&mut self, alpha: f32);
}
