use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use livir_core::geom::Vec2;

use crate::config::SimConfig;
use crate::events::SimEvent;
use crate::geometry::LevelGeometry;
use crate::layouts::layout;
use crate::monster::{MonsterRegistry, MonsterView};

/// The hand-authored levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelId {
    #[default]
    A,
    B,
}

impl LevelId {
    pub const ALL: [LevelId; 2] = [LevelId::A, LevelId::B];

    pub fn name(&self) -> &'static str {
        match self {
            LevelId::A => "a",
            LevelId::B => "b",
        }
    }

    /// Parse `name`, falling back to the default level when it is unknown.
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|e: UnknownLevel| {
            let fallback = LevelId::default();
            tracing::warn!("{e}, using level {}", fallback.name());
            fallback
        })
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a level name matches no known level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLevel(pub String);

impl fmt::Display for UnknownLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown level '{}'", self.0)
    }
}

impl std::error::Error for UnknownLevel {}

impl FromStr for LevelId {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "mapone" | "map_one" => Ok(LevelId::A),
            "b" | "maptwo" | "map_two" => Ok(LevelId::B),
            _ => Err(UnknownLevel(s.to_string())),
        }
    }
}

/// A loaded level: its geometry and, when the layout has monster spawns,
/// the registry that owns those monsters and their timers.
pub struct Level {
    pub id: LevelId,
    pub geometry: LevelGeometry,
    pub monsters: Option<MonsterRegistry>,
    pub markers: Vec<Vec2>,
}

impl Level {
    /// Build level `id` from its layout. Emits monster spawn animations and
    /// finally [`SimEvent::LevelReady`].
    pub fn load(id: LevelId, config: &SimConfig, rng: StdRng, events: &mut Vec<SimEvent>) -> Self {
        let layout = layout(id);
        let geometry = LevelGeometry::from(&layout)
            .with_support_tolerance(config.physics.support_tolerance);

        let monsters = if layout.monster_spawns.is_empty() {
            None
        } else {
            let mut registry = MonsterRegistry::new(config.monsters.clone(), layout.width, rng);
            registry.spawn(&layout.monster_spawns, events);
            Some(registry)
        };

        tracing::info!(
            level = id.name(),
            monsters = monsters.as_ref().map_or(0, MonsterRegistry::len),
            "Level loaded"
        );
        events.push(SimEvent::LevelReady { level: id });

        Self {
            id,
            geometry,
            monsters,
            markers: layout.markers,
        }
    }

    pub fn monster_views(&self) -> Vec<MonsterView> {
        self.monsters
            .as_ref()
            .map(MonsterRegistry::views)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn load(id: LevelId) -> (Level, Vec<SimEvent>) {
        let mut events = Vec::new();
        let level = Level::load(id, &SimConfig::default(), StdRng::seed_from_u64(1), &mut events);
        (level, events)
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!("a".parse::<LevelId>(), Ok(LevelId::A));
        assert_eq!("MapOne".parse::<LevelId>(), Ok(LevelId::A));
        assert_eq!("B".parse::<LevelId>(), Ok(LevelId::B));
        assert_eq!("maptwo".parse::<LevelId>(), Ok(LevelId::B));
        assert_eq!(
            "c".parse::<LevelId>(),
            Err(UnknownLevel("c".to_string()))
        );
    }

    #[test]
    fn unknown_name_falls_back_to_default() {
        assert_eq!(LevelId::from_name_or_default("nowhere"), LevelId::A);
        assert_eq!(LevelId::from_name_or_default("b"), LevelId::B);
    }

    #[test]
    fn error_message_names_the_input() {
        assert_eq!(UnknownLevel("zz".into()).to_string(), "unknown level 'zz'");
    }

    #[test]
    fn level_a_has_no_registry() {
        let (level, events) = load(LevelId::A);
        assert!(level.monsters.is_none());
        assert!(level.monster_views().is_empty());
        assert_eq!(events, vec![SimEvent::LevelReady { level: LevelId::A }]);
    }

    #[test]
    fn level_b_spawns_three_monsters_then_reports_ready() {
        let (level, events) = load(LevelId::B);
        let views = level.monster_views();
        assert_eq!(views.len(), 3);
        assert_eq!((views[0].x, views[0].y), (1000.0, 350.0));
        assert_eq!(events.last(), Some(&SimEvent::LevelReady { level: LevelId::B }));
        assert_eq!(level.markers.len(), 3);
    }

    #[test]
    fn geometry_uses_configured_tolerance() {
        let mut config = SimConfig::default();
        config.physics.support_tolerance = 12.0;
        let mut events = Vec::new();
        let level = Level::load(LevelId::A, &config, StdRng::seed_from_u64(1), &mut events);
        assert_eq!(level.geometry.support_tolerance, 12.0);
    }
}
