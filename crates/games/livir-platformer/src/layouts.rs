use livir_core::geom::{Aabb, Vec2};

use crate::geometry::{LevelGeometry, Platform, Teleporter};
use crate::level::LevelId;

/// Level width shared by all hand-authored layouts.
pub const LEVEL_WIDTH: f32 = 2000.0;
/// Level height shared by all hand-authored layouts.
pub const LEVEL_HEIGHT: f32 = 1024.0;
/// Teleporter pad size.
const TELEPORTER_WIDTH: f32 = 200.0;
const TELEPORTER_HEIGHT: f32 = 20.0;
/// Teleporter pads sit on the floor strip below the ground line.
const TELEPORTER_Y: f32 = 640.0;

/// Static description of a hand-authored level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelLayout {
    pub width: f32,
    pub height: f32,
    pub platforms: Vec<Platform>,
    pub teleporter: Teleporter,
    pub player_spawn: Vec2,
    pub monster_spawns: Vec<Vec2>,
    /// Auxiliary markers authored with the map; not used for placement.
    pub markers: Vec<Vec2>,
}

fn markers() -> Vec<Vec2> {
    vec![
        Vec2::new(300.0, 700.0),
        Vec2::new(800.0, 450.0),
        Vec2::new(1200.0, 620.0),
    ]
}

fn teleporter(center_x: f32, destination: LevelId, destination_spawn: Vec2) -> Teleporter {
    Teleporter {
        zone: Aabb::from_center(
            Vec2::new(center_x, TELEPORTER_Y),
            TELEPORTER_WIDTH,
            TELEPORTER_HEIGHT,
        ),
        destination,
        destination_spawn,
    }
}

/// Build the layout for `id`.
pub fn layout(id: LevelId) -> LevelLayout {
    match id {
        LevelId::A => LevelLayout {
            width: LEVEL_WIDTH,
            height: LEVEL_HEIGHT,
            platforms: vec![
                Platform::new(400.0, 550.0, 200.0),
                Platform::new(450.0, 450.0, 200.0),
                Platform::new(1200.0, 550.0, 200.0),
            ],
            teleporter: teleporter(400.0, LevelId::B, Vec2::new(1500.0, 600.0)),
            player_spawn: Vec2::new(600.0, 600.0),
            monster_spawns: Vec::new(),
            markers: markers(),
        },
        LevelId::B => LevelLayout {
            width: LEVEL_WIDTH,
            height: LEVEL_HEIGHT,
            platforms: vec![
                Platform::new(600.0, 500.0, 200.0),
                Platform::new(800.0, 400.0, 200.0),
                Platform::new(1400.0, 500.0, 200.0),
            ],
            teleporter: teleporter(100.0, LevelId::A, Vec2::new(100.0, 600.0)),
            player_spawn: Vec2::new(1500.0, 600.0),
            monster_spawns: vec![
                Vec2::new(1000.0, 350.0),
                Vec2::new(1300.0, 350.0),
                Vec2::new(1600.0, 350.0),
            ],
            markers: markers(),
        },
    }
}

impl From<&LevelLayout> for LevelGeometry {
    fn from(layout: &LevelLayout) -> Self {
        LevelGeometry::new(
            layout.width,
            layout.height,
            layout.platforms.clone(),
            layout.teleporter,
            layout.player_spawn,
        )
    }
}
