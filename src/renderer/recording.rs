//! Surface that records draw calls instead of painting

use glam::Vec2;

use super::colors::Rgba;
use super::{Surface, TextStyle};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rgba),
    Rect { pos: Vec2, size: Vec2, color: Rgba },
    Circle { center: Vec2, radius: f32, color: Rgba },
    Polygon { points: Vec<Vec2>, color: Rgba },
    Text { text: String, pos: Vec2, style: TextStyle },
    Alpha(f32),
}

/// Headless surface of fixed size
#[derive(Debug, Clone)]
pub struct CommandRecorder {
    width: f32,
    height: f32,
    pub commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Drop recorded commands (start of a new frame)
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// All text drawn, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Index of the first command drawn in `color`
    pub fn first_with_color(&self, wanted: Rgba) -> Option<usize> {
        self.commands.iter().position(|c| match c {
            DrawCommand::Rect { color, .. }
            | DrawCommand::Circle { color, .. }
            | DrawCommand::Polygon { color, .. } => *color == wanted,
            _ => false,
        })
    }
}

impl Surface for CommandRecorder {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Rgba) {
        self.commands.push(DrawCommand::Rect { pos, size, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            style: *style,
        });
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCommand::Alpha(alpha));
    }
}
