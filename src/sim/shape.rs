//! Entity hitbox shapes
//!
//! Every entity is positioned by the top-left corner of its bounding box.
//! A circle sits centered inside that box.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect { w: f32, h: f32 },
    Circle { r: f32 },
}

impl Shape {
    pub fn rect(w: f32, h: f32) -> Self {
        Shape::Rect { w, h }
    }

    pub fn circle(r: f32) -> Self {
        Shape::Circle { r }
    }

    /// Bounding box size
    pub fn size(&self) -> Vec2 {
        match *self {
            Shape::Rect { w, h } => Vec2::new(w, h),
            Shape::Circle { r } => Vec2::splat(r * 2.0),
        }
    }

    pub fn width(&self) -> f32 {
        self.size().x
    }

    pub fn height(&self) -> f32 {
        self.size().y
    }

    /// Center point for a shape whose box starts at `pos`
    pub fn center(&self, pos: Vec2) -> Vec2 {
        pos + self.size() * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_box_is_diameter() {
        let shape = Shape::circle(15.0);
        assert_eq!(shape.size(), Vec2::new(30.0, 30.0));
        assert_eq!(shape.center(Vec2::new(10.0, 20.0)), Vec2::new(25.0, 35.0));
    }

    #[test]
    fn test_rect_center() {
        let shape = Shape::rect(6.0, 15.0);
        assert_eq!(shape.center(Vec2::ZERO), Vec2::new(3.0, 7.5));
        assert_eq!(shape.width(), 6.0);
        assert_eq!(shape.height(), 15.0);
    }
}
