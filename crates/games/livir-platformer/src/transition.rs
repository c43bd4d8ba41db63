use serde::{Deserialize, Serialize};

use livir_core::geom::Vec2;

use crate::geometry::LevelGeometry;
use crate::level::LevelId;

/// Request to replace the current level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelSwitch {
    pub target: LevelId,
    /// Where to place the player; `None` uses the target level's spawn.
    pub spawn: Option<Vec2>,
}

/// Teleporter check, run once per frame after movement.
///
/// Fires only while `down` is held and the player's feet are inside the
/// teleporter zone. Jump and attack state do not matter.
pub fn check_teleporter(down: bool, feet: Vec2, geometry: &LevelGeometry) -> Option<LevelSwitch> {
    if !down || !geometry.is_on_teleporter(feet) {
        return None;
    }
    let teleporter = &geometry.teleporter;
    tracing::debug!(
        destination = teleporter.destination.name(),
        x = feet.x,
        y = feet.y,
        "Teleporter triggered"
    );
    Some(LevelSwitch {
        target: teleporter.destination,
        spawn: Some(teleporter.destination_spawn),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layouts::layout;

    fn geometry(id: LevelId) -> LevelGeometry {
        LevelGeometry::from(&layout(id))
    }

    #[test]
    fn level_a_pad_sends_to_level_b() {
        let geo = geometry(LevelId::A);
        let switch = check_teleporter(true, Vec2::new(400.0, 640.0), &geo);
        assert_eq!(
            switch,
            Some(LevelSwitch {
                target: LevelId::B,
                spawn: Some(Vec2::new(1500.0, 600.0)),
            })
        );
    }

    #[test]
    fn level_b_pad_sends_to_level_a() {
        let geo = geometry(LevelId::B);
        let switch = check_teleporter(true, Vec2::new(150.0, 640.0), &geo);
        assert_eq!(
            switch,
            Some(LevelSwitch {
                target: LevelId::A,
                spawn: Some(Vec2::new(100.0, 600.0)),
            })
        );
    }

    #[test]
    fn needs_down_held() {
        let geo = geometry(LevelId::A);
        assert_eq!(check_teleporter(false, Vec2::new(400.0, 640.0), &geo), None);
    }

    #[test]
    fn needs_feet_inside_zone() {
        let geo = geometry(LevelId::A);
        assert_eq!(check_teleporter(true, Vec2::new(600.0, 640.0), &geo), None);
        // Mid-jump above the pad.
        assert_eq!(check_teleporter(true, Vec2::new(400.0, 560.0), &geo), None);
    }
}
