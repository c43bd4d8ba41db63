use serde::{Deserialize, Serialize};

/// A point or displacement in world units. `y` grows downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned bounding box stored by its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a box of the given size centered on `center`.
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict overlap test. Boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        !(self.right() <= other.left()
            || self.left() >= other.right()
            || self.bottom() <= other.top()
            || self.top() >= other.bottom())
    }

    /// Inclusive point containment (edges count as inside).
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_center_round_trips_center() {
        let b = Aabb::from_center(Vec2::new(400.0, 640.0), 200.0, 20.0);
        assert_eq!(b.left(), 300.0);
        assert_eq!(b.right(), 500.0);
        assert_eq!(b.top(), 630.0);
        assert_eq!(b.bottom(), 650.0);
        assert_eq!(b.center(), Vec2::new(400.0, 640.0));
    }

    #[test]
    fn overlapping_boxes_intersect() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn containment_includes_edges() {
        let b = Aabb::new(300.0, 630.0, 200.0, 20.0);
        assert!(b.contains_point(Vec2::new(300.0, 630.0)));
        assert!(b.contains_point(Vec2::new(500.0, 650.0)));
        assert!(!b.contains_point(Vec2::new(500.1, 640.0)));
        assert!(!b.contains_point(Vec2::new(400.0, 629.9)));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn intersection_is_symmetric(
                ax in -500.0f32..500.0, ay in -500.0f32..500.0,
                bx in -500.0f32..500.0, by in -500.0f32..500.0,
                w in 1.0f32..200.0, h in 1.0f32..200.0,
            ) {
                let a = Aabb::new(ax, ay, w, h);
                let b = Aabb::new(bx, by, h, w);
                prop_assert_eq!(a.intersects(&b), b.intersects(&a));
            }

            #[test]
            fn box_contains_its_center(
                x in -1000.0f32..1000.0, y in -1000.0f32..1000.0,
                w in 0.0f32..300.0, h in 0.0f32..300.0,
            ) {
                let b = Aabb::from_center(Vec2::new(x, y), w, h);
                prop_assert!(b.contains_point(b.center()));
            }
        }
    }
}
