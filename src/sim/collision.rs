//! Collision detection between tagged shapes
//!
//! Dispatch is explicit on the shape pair:
//! - Rect x Rect: axis-aligned bounding box overlap
//! - Circle x Circle: center distance against summed radii
//! - Rect x Circle: closest point on the rectangle to the circle center
//!
//! Touching edges do not count as a hit.

use glam::Vec2;

use super::shape::Shape;

/// An entity's hitbox placed in the playfield
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    pub shape: Shape,
}

impl Hitbox {
    pub fn new(pos: Vec2, shape: Shape) -> Self {
        Self { pos, shape }
    }
}

/// Check whether two hitboxes overlap
pub fn overlaps(a: &Hitbox, b: &Hitbox) -> bool {
    match (a.shape, b.shape) {
        (Shape::Rect { w: w1, h: h1 }, Shape::Rect { w: w2, h: h2 }) => {
            aabb_overlap(a.pos, Vec2::new(w1, h1), b.pos, Vec2::new(w2, h2))
        }
        (Shape::Circle { r: r1 }, Shape::Circle { r: r2 }) => {
            circle_overlap(a.shape.center(a.pos), r1, b.shape.center(b.pos), r2)
        }
        (Shape::Rect { w, h }, Shape::Circle { r }) => {
            rect_circle_overlap(a.pos, Vec2::new(w, h), b.shape.center(b.pos), r)
        }
        (Shape::Circle { r }, Shape::Rect { w, h }) => {
            rect_circle_overlap(b.pos, Vec2::new(w, h), a.shape.center(a.pos), r)
        }
    }
}

/// Axis-aligned rectangle overlap
#[inline]
pub fn aabb_overlap(p1: Vec2, s1: Vec2, p2: Vec2, s2: Vec2) -> bool {
    p1.x < p2.x + s2.x && p1.x + s1.x > p2.x && p1.y < p2.y + s2.y && p1.y + s1.y > p2.y
}

/// Circle overlap (compares squared distances)
#[inline]
pub fn circle_overlap(c1: Vec2, r1: f32, c2: Vec2, r2: f32) -> bool {
    let reach = r1 + r2;
    c1.distance_squared(c2) < reach * reach
}

/// Rectangle vs circle using the closest point on the rectangle
pub fn rect_circle_overlap(rect_pos: Vec2, rect_size: Vec2, center: Vec2, radius: f32) -> bool {
    let closest = center.clamp(rect_pos, rect_pos + rect_size);
    closest.distance_squared(center) < radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Hitbox {
        Hitbox::new(Vec2::new(x, y), Shape::rect(w, h))
    }

    #[test]
    fn test_bullet_hits_asteroid_box() {
        let bullet = rect(100.0, 50.0, 4.0, 15.0);
        let enemy = rect(95.0, 55.0, 30.0, 30.0);
        assert!(overlaps(&bullet, &enemy));
        assert!(overlaps(&enemy, &bullet));
    }

    #[test]
    fn test_bullet_misses_when_shifted() {
        let bullet = rect(200.0, 50.0, 4.0, 15.0);
        let enemy = rect(95.0, 55.0, 30.0, 30.0);
        assert!(!overlaps(&bullet, &enemy));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(10.0, 0.0, 10.0, 10.0);
        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn test_circle_circle() {
        let a = Hitbox::new(Vec2::ZERO, Shape::circle(10.0));
        let near = Hitbox::new(Vec2::new(15.0, 0.0), Shape::circle(10.0));
        let far = Hitbox::new(Vec2::new(25.0, 0.0), Shape::circle(2.0));
        assert!(overlaps(&a, &near));
        assert!(!overlaps(&a, &far));
    }

    #[test]
    fn test_rect_circle_corner_miss() {
        // Circle box overlaps the rect's box at the corner, the circle itself does not
        let r = rect(0.0, 0.0, 10.0, 10.0);
        let c = Hitbox::new(Vec2::new(8.0, 8.0), Shape::circle(5.0));
        // Center at (13, 13), closest rect point (10, 10), distance ~4.24 < 5
        assert!(overlaps(&r, &c));

        let c = Hitbox::new(Vec2::new(9.0, 9.0), Shape::circle(5.0));
        // Center at (14, 14), distance ~5.66 > 5
        assert!(!overlaps(&r, &c));
        assert!(!overlaps(&c, &r));
    }
}
