use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Horizontal player step per frame.
pub const MOVE_STEP: f32 = 5.0;
/// Initial vertical velocity of a jump (negative is up).
pub const JUMP_VELOCITY: f32 = -10.0;
/// Gravity added to vertical velocity each frame while airborne.
pub const GRAVITY: f32 = 0.5;
/// Ground line for entity centers.
pub const GROUND_Y: f32 = 600.0;
/// Player AABB width.
pub const PLAYER_WIDTH: f32 = 50.0;
/// Player AABB height.
pub const PLAYER_HEIGHT: f32 = 80.0;
/// Half thickness of the band around a platform top that counts as standing.
pub const SUPPORT_TOLERANCE: f32 = 5.0;

/// Horizontal offset of the attack hitbox center from the player.
pub const ATTACK_OFFSET: f32 = 40.0;
pub const HITBOX_WIDTH: f32 = 30.0;
pub const HITBOX_HEIGHT: f32 = 80.0;
pub const HITBOX_LIFETIME_MS: u64 = 100;

/// Monster walk speed (units/s).
pub const MONSTER_SPEED: f32 = 50.0;
/// Monster gravity (units/s^2): world gravity plus the body's own pull.
pub const MONSTER_GRAVITY: f32 = 600.0;
/// Knockback speed applied on a staggering hit (units/s).
pub const KNOCKBACK_SPEED: f32 = 200.0;
pub const KNOCKBACK_CHANCE: f64 = 0.5;
pub const HITS_TO_KILL: u8 = 3;
pub const MONSTER_WIDTH: f32 = 60.0;
pub const MONSTER_HEIGHT: f32 = 60.0;

/// Player movement and collision parameters. All per-frame quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub move_step: f32,
    pub jump_velocity: f32,
    pub gravity: f32,
    pub ground_y: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub support_tolerance: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            move_step: MOVE_STEP,
            jump_velocity: JUMP_VELOCITY,
            gravity: GRAVITY,
            ground_y: GROUND_Y,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            support_tolerance: SUPPORT_TOLERANCE,
        }
    }
}

/// Attack hitbox parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub attack_offset: f32,
    pub hitbox_width: f32,
    pub hitbox_height: f32,
    pub hitbox_lifetime_ms: u64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            attack_offset: ATTACK_OFFSET,
            hitbox_width: HITBOX_WIDTH,
            hitbox_height: HITBOX_HEIGHT,
            hitbox_lifetime_ms: HITBOX_LIFETIME_MS,
        }
    }
}

impl CombatConfig {
    pub fn hitbox_lifetime(&self) -> Duration {
        Duration::from_millis(self.hitbox_lifetime_ms)
    }
}

/// Inclusive millisecond range for a randomized behavior phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl PhaseRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    fn sanitized(self) -> Self {
        if self.min_ms <= self.max_ms {
            self
        } else {
            Self::new(self.max_ms, self.min_ms)
        }
    }
}

/// Monster AI and lifecycle parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterConfig {
    pub walk_speed: f32,
    pub gravity: f32,
    pub ground_y: f32,
    pub knockback_speed: f32,
    pub knockback_chance: f64,
    pub hits_to_kill: u8,
    pub width: f32,
    pub height: f32,
    pub walk_phase: PhaseRange,
    pub idle_phase: PhaseRange,
}

impl Default for MonsterConfig {
    fn default() -> Self {
        Self {
            walk_speed: MONSTER_SPEED,
            gravity: MONSTER_GRAVITY,
            ground_y: GROUND_Y,
            knockback_speed: KNOCKBACK_SPEED,
            knockback_chance: KNOCKBACK_CHANCE,
            hits_to_kill: HITS_TO_KILL,
            width: MONSTER_WIDTH,
            height: MONSTER_HEIGHT,
            walk_phase: PhaseRange::new(6000, 15000),
            idle_phase: PhaseRange::new(1000, 5000),
        }
    }
}

/// Top-level simulation configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub physics: PhysicsConfig,
    pub combat: CombatConfig,
    pub monsters: MonsterConfig,
    /// Fixed RNG seed for reproducible monster behavior.
    pub seed: Option<u64>,
}

impl SimConfig {
    /// Load config from `LIVIR_SIM_CONFIG` or `config/livir.toml`, falling
    /// back to defaults if neither is present or parseable.
    pub fn load() -> Self {
        let path =
            std::env::var("LIVIR_SIM_CONFIG").unwrap_or_else(|_| "config/livir.toml".to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse {path}: {e}, using defaults");
                SimConfig::default()
            }),
            Err(_) => SimConfig::default(),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<SimConfig>(content).map(SimConfig::sanitized)
    }

    /// Replace values that would break the simulation with defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = PhysicsConfig::default();
        let p = &mut self.physics;
        keep_finite(&mut p.move_step, defaults.move_step);
        keep_finite(&mut p.jump_velocity, defaults.jump_velocity);
        keep_finite(&mut p.gravity, defaults.gravity);
        keep_finite(&mut p.ground_y, defaults.ground_y);
        keep_positive(&mut p.player_width, defaults.player_width);
        keep_positive(&mut p.player_height, defaults.player_height);
        keep_positive(&mut p.support_tolerance, defaults.support_tolerance);

        let defaults = CombatConfig::default();
        let c = &mut self.combat;
        keep_finite(&mut c.attack_offset, defaults.attack_offset);
        keep_positive(&mut c.hitbox_width, defaults.hitbox_width);
        keep_positive(&mut c.hitbox_height, defaults.hitbox_height);

        let defaults = MonsterConfig::default();
        let m = &mut self.monsters;
        keep_finite(&mut m.walk_speed, defaults.walk_speed);
        keep_finite(&mut m.gravity, defaults.gravity);
        keep_finite(&mut m.ground_y, defaults.ground_y);
        keep_finite(&mut m.knockback_speed, defaults.knockback_speed);
        keep_positive(&mut m.width, defaults.width);
        keep_positive(&mut m.height, defaults.height);
        if !(0.0..=1.0).contains(&m.knockback_chance) {
            m.knockback_chance = defaults.knockback_chance;
        }
        if m.hits_to_kill == 0 {
            m.hits_to_kill = defaults.hits_to_kill;
        }
        m.walk_phase = m.walk_phase.sanitized();
        m.idle_phase = m.idle_phase.sanitized();
        self
    }
}

fn keep_finite(value: &mut f32, fallback: f32) {
    if !value.is_finite() {
        *value = fallback;
    }
}

fn keep_positive(value: &mut f32, fallback: f32) {
    if !value.is_finite() || *value <= 0.0 {
        *value = fallback;
    }
}
