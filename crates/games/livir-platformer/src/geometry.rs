use serde::{Deserialize, Serialize};

use livir_core::geom::{Aabb, Vec2};

use crate::config::SUPPORT_TOLERANCE;
use crate::level::LevelId;

/// A one-way ledge: entities stand on its top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
}

impl Platform {
    pub const fn new(x: f32, y: f32, width: f32) -> Self {
        Self { x, y, width }
    }

    fn spans(&self, x: f32) -> bool {
        x >= self.x && x <= self.x + self.width
    }
}

/// Zone that sends the player to another level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Teleporter {
    pub zone: Aabb,
    pub destination: LevelId,
    pub destination_spawn: Vec2,
}

/// Static collision data for one level. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelGeometry {
    pub width: f32,
    pub height: f32,
    pub platforms: Vec<Platform>,
    pub teleporter: Teleporter,
    pub spawn: Vec2,
    pub support_tolerance: f32,
}

impl LevelGeometry {
    pub fn new(
        width: f32,
        height: f32,
        platforms: Vec<Platform>,
        teleporter: Teleporter,
        spawn: Vec2,
    ) -> Self {
        Self {
            width,
            height,
            platforms,
            teleporter,
            spawn,
            support_tolerance: SUPPORT_TOLERANCE,
        }
    }

    pub fn with_support_tolerance(mut self, tolerance: f32) -> Self {
        self.support_tolerance = tolerance;
        self
    }

    /// Whether an entity centered at `center` with the given half height is
    /// standing on a platform: its foot line is within the tolerance band of
    /// the platform top and its x lies over the platform.
    ///
    /// On success the entity is snapped so its feet rest exactly on the
    /// platform (`center.y = platform.y - half_height`).
    pub fn snap_to_support(&self, center: &mut Vec2, half_height: f32) -> bool {
        let feet = center.y + half_height;
        let tol = self.support_tolerance;
        let Some(platform) = self
            .platforms
            .iter()
            .find(|p| feet >= p.y - tol && feet <= p.y + tol && p.spans(center.x))
        else {
            return false;
        };
        center.y = platform.y - half_height;
        true
    }

    /// Point-in-rectangle test against the teleporter zone.
    pub fn is_on_teleporter(&self, point: Vec2) -> bool {
        self.teleporter.zone.contains_point(point)
    }

    /// Designated player entry point.
    pub fn spawn_point(&self) -> Vec2 {
        self.spawn
    }

    pub fn clamp_x(&self, x: f32) -> f32 {
        x.clamp(0.0, self.width)
    }

    /// Region the camera may show while following the player.
    pub fn camera_bounds(&self) -> Aabb {
        Aabb::new(0.0, -100.0, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> LevelGeometry {
        LevelGeometry::new(
            2000.0,
            1024.0,
            vec![Platform::new(400.0, 550.0, 200.0)],
            Teleporter {
                zone: Aabb::from_center(Vec2::new(400.0, 640.0), 200.0, 20.0),
                destination: LevelId::B,
                destination_spawn: Vec2::new(1500.0, 600.0),
            },
            Vec2::new(600.0, 600.0),
        )
    }

    #[test]
    fn feet_inside_band_snap_to_platform_top() {
        let geo = geometry();
        let mut center = Vec2::new(450.0, 514.0); // feet at 554
        assert!(geo.snap_to_support(&mut center, 40.0));
        assert_eq!(center.y, 510.0);
    }

    #[test]
    fn band_edges_are_inclusive() {
        let geo = geometry();
        let mut above = Vec2::new(500.0, 505.0); // feet at 545
        let mut below = Vec2::new(500.0, 515.0); // feet at 555
        assert!(geo.snap_to_support(&mut above, 40.0));
        assert!(geo.snap_to_support(&mut below, 40.0));
    }

    #[test]
    fn outside_band_is_unsupported_and_untouched() {
        let geo = geometry();
        let mut center = Vec2::new(450.0, 500.0); // feet at 540
        assert!(!geo.snap_to_support(&mut center, 40.0));
        assert_eq!(center.y, 500.0);
    }

    #[test]
    fn off_the_ledge_is_unsupported() {
        let geo = geometry();
        let mut center = Vec2::new(600.5, 510.0);
        assert!(!geo.snap_to_support(&mut center, 40.0));
        let mut on_edge = Vec2::new(600.0, 510.0);
        assert!(geo.snap_to_support(&mut on_edge, 40.0));
    }

    #[test]
    fn teleporter_contains_feet_on_ground() {
        let geo = geometry();
        assert!(geo.is_on_teleporter(Vec2::new(400.0, 640.0)));
        assert!(geo.is_on_teleporter(Vec2::new(300.0, 630.0)));
        assert!(!geo.is_on_teleporter(Vec2::new(299.0, 640.0)));
        assert!(!geo.is_on_teleporter(Vec2::new(400.0, 600.0)));
    }

    #[test]
    fn clamp_keeps_x_in_level() {
        let geo = geometry();
        assert_eq!(geo.clamp_x(-20.0), 0.0);
        assert_eq!(geo.clamp_x(2500.0), 2000.0);
        assert_eq!(geo.clamp_x(700.0), 700.0);
    }

    #[test]
    fn camera_bounds_start_above_top() {
        let cam = geometry().camera_bounds();
        assert_eq!((cam.x, cam.y, cam.width, cam.height), (0.0, -100.0, 2000.0, 1024.0));
    }
}
