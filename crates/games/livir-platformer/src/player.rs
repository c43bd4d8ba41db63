use std::time::Duration;

use serde::{Deserialize, Serialize};

use livir_core::animation::AnimationKey;
use livir_core::geom::{Aabb, Vec2};
use livir_core::input::FrameInput;
use livir_core::schedule::Scheduler;

use crate::combat::CombatResolver;
use crate::config::{CombatConfig, PhysicsConfig};
use crate::events::{EntityRef, SimEvent};
use crate::geometry::LevelGeometry;
use crate::monster::MonsterRegistry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1.0 for left, +1.0 for right.
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Negative values face left, everything else faces right.
    pub fn from_sign(sign: i8) -> Self {
        if sign < 0 { Facing::Left } else { Facing::Right }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Idle,
    Walking,
    Jumping,
    Attacking,
}

/// The one action that may be in progress. Jumping and attacking exclude
/// each other; movement is tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    None,
    Jumping,
    Attacking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayerTimer {
    AttackFinished { attack: u64 },
}

/// Render-facing view of the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub facing: Facing,
    pub state: PlayerState,
}

/// Player state machine: horizontal movement, jump/fall physics, attacks.
///
/// Physics runs in per-frame units (5 units of walk per frame, +0.5 gravity
/// per frame); timers use simulated milliseconds.
pub struct PlayerController {
    position: Vec2,
    vy: f32,
    facing: Facing,
    action: Action,
    moving: bool,
    attack_seq: u64,
    timers: Scheduler<PlayerTimer>,
    animation: AnimationKey,
    physics: PhysicsConfig,
    combat: CombatConfig,
}

impl PlayerController {
    pub fn new(spawn: Vec2, physics: PhysicsConfig, combat: CombatConfig) -> Self {
        Self {
            position: spawn,
            vy: 0.0,
            facing: Facing::default(),
            action: Action::None,
            moving: false,
            attack_seq: 0,
            timers: Scheduler::new(),
            animation: AnimationKey::Idle,
            physics,
            combat,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity_y(&self) -> f32 {
        self.vy
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn state(&self) -> PlayerState {
        match self.action {
            Action::Attacking => PlayerState::Attacking,
            Action::Jumping => PlayerState::Jumping,
            Action::None if self.moving => PlayerState::Walking,
            Action::None => PlayerState::Idle,
        }
    }

    pub fn animation(&self) -> AnimationKey {
        self.animation
    }

    pub fn half_height(&self) -> f32 {
        self.physics.player_height / 2.0
    }

    /// Midpoint of the player's bottom edge.
    pub fn feet(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.y + self.half_height())
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(
            self.position,
            self.physics.player_width,
            self.physics.player_height,
        )
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            x: self.position.x,
            y: self.position.y,
            facing: self.facing,
            state: self.state(),
        }
    }

    /// Put the player at `spawn` with no action in progress. Pending attack
    /// timers are dropped.
    pub fn place_at(&mut self, spawn: Vec2) {
        self.position = spawn;
        self.vy = 0.0;
        self.action = Action::None;
        self.moving = false;
        self.timers.clear();
    }

    /// Run the player's due timers (attack completion).
    pub fn advance_timers(&mut self, dt: Duration) {
        self.timers.advance(dt);
        while let Some(fired) = self.timers.pop_due() {
            match fired.event {
                PlayerTimer::AttackFinished { attack } => {
                    if self.action == Action::Attacking && attack == self.attack_seq {
                        self.action = Action::None;
                    } else {
                        tracing::trace!(attack, "Attack already interrupted");
                    }
                },
            }
        }
    }

    /// Shift left/right by one step and record whether the player moved.
    pub fn apply_movement(&mut self, input: &FrameInput) {
        let dir = input.move_dir();
        self.moving = dir != 0;
        if self.moving {
            self.facing = Facing::from_sign(dir);
            self.position.x += f32::from(dir) * self.physics.move_step;
        }
    }

    /// Start a jump unless already jumping or attacking.
    pub fn try_start_jump(&mut self) -> bool {
        if self.action != Action::None {
            tracing::trace!(action = ?self.action, "Jump refused");
            return false;
        }
        self.action = Action::Jumping;
        self.vy = self.physics.jump_velocity;
        true
    }

    /// Start an attack unless already attacking or jumping. The hitbox is
    /// resolved against `monsters` immediately and kept alive by `combat`
    /// for its lifetime.
    pub fn try_start_attack(
        &mut self,
        combat: &mut CombatResolver,
        monsters: Option<&mut MonsterRegistry>,
        events: &mut Vec<SimEvent>,
    ) -> bool {
        if self.action != Action::None {
            tracing::trace!(action = ?self.action, "Attack refused");
            return false;
        }
        self.action = Action::Attacking;
        self.attack_seq += 1;

        let hitbox = self.attack_hitbox();
        events.push(SimEvent::AttackStarted { hitbox });
        combat.submit(hitbox, monsters, events);

        let playback = AnimationKey::Attack.playback().unwrap_or(Duration::ZERO);
        self.timers.schedule(
            playback,
            PlayerTimer::AttackFinished {
                attack: self.attack_seq,
            },
        );
        self.sync_animation(events);
        true
    }

    /// Hitbox centered `attack_offset` in front of the player.
    pub fn attack_hitbox(&self) -> Aabb {
        let center = Vec2::new(
            self.position.x + self.facing.sign() * self.combat.attack_offset,
            self.position.y,
        );
        Aabb::from_center(center, self.combat.hitbox_width, self.combat.hitbox_height)
    }

    /// One frame of vertical physics, platform/ground resolution and bounds
    /// clamping.
    pub fn tick(&mut self, geometry: &LevelGeometry, events: &mut Vec<SimEvent>) {
        let half_h = self.half_height();
        let ground = self.physics.ground_y;

        if self.action == Action::Jumping {
            self.position.y += self.vy;
            self.vy += self.physics.gravity;

            let on_platform = geometry.snap_to_support(&mut self.position, half_h);
            let on_ground = self.position.y >= ground;
            if on_ground {
                self.position.y = ground;
            }
            if on_platform || on_ground {
                self.action = Action::None;
                self.vy = 0.0;
            }
        } else {
            let supported = geometry.snap_to_support(&mut self.position, half_h);
            if !supported && self.position.y < ground {
                if self.action == Action::Attacking {
                    tracing::trace!("Fall interrupted attack");
                }
                self.action = Action::Jumping;
                self.vy = 0.0;
            }
        }

        self.position.x = geometry.clamp_x(self.position.x);
        self.sync_animation(events);
    }

    fn sync_animation(&mut self, events: &mut Vec<SimEvent>) {
        let wanted = match self.state() {
            PlayerState::Idle => AnimationKey::Idle,
            PlayerState::Walking => AnimationKey::Walk,
            PlayerState::Jumping => AnimationKey::Jump,
            PlayerState::Attacking => AnimationKey::Attack,
        };
        if wanted != self.animation {
            self.animation = wanted;
            events.push(SimEvent::animation(EntityRef::Player, wanted));
        }
    }
}
