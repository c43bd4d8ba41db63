pub mod combat;
pub mod config;
pub mod events;
pub mod geometry;
pub mod layouts;
pub mod level;
pub mod monster;
pub mod player;
pub mod transition;

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use livir_core::geom::{Aabb, Vec2};
use livir_core::input::FrameInput;
use livir_core::simulation::{SimMetadata, Simulation};

use combat::CombatResolver;
use config::SimConfig;
use events::SimEvent;
use level::{Level, LevelId};
use monster::MonsterView;
use player::{PlayerController, PlayerView};
use transition::{LevelSwitch, check_teleporter};

/// Render-facing state of the whole world after a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub level: LevelId,
    /// Simulated time since the world was created.
    pub elapsed_ms: u64,
    pub player: PlayerView,
    pub monsters: Vec<MonsterView>,
    pub hitboxes: Vec<Aabb>,
    pub camera: Aabb,
}

impl WorldSnapshot {
    /// Decode bytes produced by [`Simulation::serialize_snapshot`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, rmp_serde::decode::Error> {
        rmp_serde::from_slice(bytes)
    }
}

/// The platformer world: current level, player and combat state.
///
/// Each frame runs timers first, then player movement and physics, then the
/// attack, then monster AI, and finally the teleporter check.
pub struct LivirWorld {
    config: SimConfig,
    level: Level,
    player: PlayerController,
    combat: CombatResolver,
    paused: bool,
    elapsed: Duration,
    seed: u64,
    levels_entered: u64,
    /// Events from construction, handed out by the first update.
    pending_events: Vec<SimEvent>,
}

impl LivirWorld {
    pub fn new(config: SimConfig) -> Self {
        Self::with_level(config, LevelId::default())
    }

    /// Start in level `id` at its default spawn.
    pub fn with_level(config: SimConfig, id: LevelId) -> Self {
        let config = config.sanitized();
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let mut pending_events = Vec::new();
        let level = Level::load(id, &config, StdRng::seed_from_u64(seed), &mut pending_events);
        let player = PlayerController::new(
            level.geometry.spawn_point(),
            config.physics.clone(),
            config.combat.clone(),
        );
        let combat = CombatResolver::new(&config.combat);
        tracing::debug!(seed, level = id.name(), "World created");

        Self {
            config,
            level,
            player,
            combat,
            paused: false,
            elapsed: Duration::ZERO,
            seed,
            levels_entered: 1,
            pending_events,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn combat(&self) -> &CombatResolver {
        &self.combat
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Seed the monster RNG was derived from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Discard the current level and build `switch.target` in its place.
    ///
    /// The old level's monsters and their timers are dropped with it. The
    /// player lands at `switch.spawn`, or the new level's spawn point when
    /// none is given.
    pub fn switch_level(&mut self, switch: LevelSwitch, events: &mut Vec<SimEvent>) {
        let from = self.level.id;
        let rng = StdRng::seed_from_u64(self.seed.wrapping_add(self.levels_entered));
        self.levels_entered += 1;

        let mut load_events = Vec::new();
        let level = Level::load(switch.target, &self.config, rng, &mut load_events);
        let spawn: Vec2 = switch.spawn.unwrap_or_else(|| level.geometry.spawn_point());

        self.level = level;
        self.player.place_at(spawn);
        self.combat.clear();

        tracing::info!(
            from = from.name(),
            to = switch.target.name(),
            x = spawn.x,
            y = spawn.y,
            "Level switched"
        );
        events.push(SimEvent::LevelSwitched {
            from,
            to: switch.target,
            spawn,
        });
        events.extend(load_events);
    }
}

impl Simulation for LivirWorld {
    type Event = SimEvent;
    type Snapshot = WorldSnapshot;

    fn metadata(&self) -> SimMetadata {
        SimMetadata {
            name: "Livir".to_string(),
            description: "Side-scrolling platformer with patrolling monsters".to_string(),
        }
    }

    fn update(&mut self, dt: Duration, input: &FrameInput) -> Vec<SimEvent> {
        if self.paused {
            return Vec::new();
        }
        let mut events = std::mem::take(&mut self.pending_events);
        self.elapsed += dt;

        self.player.advance_timers(dt);
        self.combat.advance(dt);
        if let Some(monsters) = self.level.monsters.as_mut() {
            monsters.advance_timers(dt, &mut events);
        }

        self.player.apply_movement(input);
        if input.jump_pressed {
            self.player.try_start_jump();
        }
        self.player.tick(&self.level.geometry, &mut events);
        if input.attack_pressed {
            self.player
                .try_start_attack(&mut self.combat, self.level.monsters.as_mut(), &mut events);
        }

        if let Some(monsters) = self.level.monsters.as_mut() {
            monsters.tick(dt);
        }

        if let Some(switch) = check_teleporter(input.held.down, self.player.feet(), &self.level.geometry)
        {
            self.switch_level(switch, &mut events);
        }

        events
    }

    fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            level: self.level.id,
            elapsed_ms: u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX),
            player: self.player.view(),
            monsters: self.level.monster_views(),
            hitboxes: self.combat.active().iter().map(|h| h.bounds).collect(),
            camera: self.level.geometry.camera_bounds(),
        }
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}
