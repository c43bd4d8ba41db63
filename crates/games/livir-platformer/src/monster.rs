//! Monster roster and behavior scheduler.
//!
//! Every monster runs an independent two-phase cycle (walk for 6–15 s, idle
//! for 1–5 s) driven by the registry's own timer queue. Timer entries carry
//! the monster id and are checked against both the live roster and the
//! monster's current handle before they act, so a timer that outlives its
//! monster (death, level unload) does nothing.

use std::collections::BTreeMap;
use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use livir_core::animation::AnimationKey;
use livir_core::geom::{Aabb, Vec2};
use livir_core::schedule::{Fired, Scheduler, TimerId};

use crate::config::{MonsterConfig, PhaseRange};
use crate::events::{EntityRef, SimEvent};
use crate::player::Facing;

/// Identifier of a monster, stable for the lifetime of its level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonsterState {
    Idle,
    Walking,
    Hit,
    Dying,
    Dead,
}

impl MonsterState {
    /// Dying and Dead monsters no longer take part in combat or AI.
    pub fn is_dying_or_dead(&self) -> bool {
        matches!(self, MonsterState::Dying | MonsterState::Dead)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Monster {
    pub id: MonsterId,
    pub position: Vec2,
    pub vx: f32,
    pub vy: f32,
    pub facing: Facing,
    /// -1 (left) or +1 (right).
    pub walk_direction: i8,
    pub state: MonsterState,
    pub hits_taken: u8,
    pub is_walking: bool,
    pub width: f32,
    pub height: f32,
    /// Simulated time at which the current behavior phase began.
    pub phase_since: Duration,
    behavior_timer: Option<TimerId>,
    anim_timer: Option<TimerId>,
}

impl Monster {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.position, self.width, self.height)
    }

    /// Still eligible to be struck by an attack.
    pub fn is_combat_target(&self) -> bool {
        !self.state.is_dying_or_dead()
    }

    pub fn has_behavior_timer(&self) -> bool {
        self.behavior_timer.is_some()
    }
}

/// Render-facing view of a monster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterView {
    pub id: MonsterId,
    pub x: f32,
    pub y: f32,
    pub facing: Facing,
    pub state: MonsterState,
    pub hits_taken: u8,
}

impl From<&Monster> for MonsterView {
    fn from(m: &Monster) -> Self {
        Self {
            id: m.id,
            x: m.position.x,
            y: m.position.y,
            facing: m.facing,
            state: m.state,
            hits_taken: m.hits_taken,
        }
    }
}

/// Result of [`MonsterRegistry::apply_hit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Unknown, dying or dead monster.
    Ignored,
    Staggered { knocked_back: bool },
    Killed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MonsterTimer {
    StartWalking,
    StopWalking,
    HitRecovered,
    DeathFinished,
}

/// Live monsters of one level plus their pending timers.
pub struct MonsterRegistry {
    monsters: BTreeMap<MonsterId, Monster>,
    timers: Scheduler<(MonsterId, MonsterTimer)>,
    rng: StdRng,
    config: MonsterConfig,
    level_width: f32,
    next_id: u32,
}

impl MonsterRegistry {
    pub fn new(config: MonsterConfig, level_width: f32, rng: StdRng) -> Self {
        Self {
            monsters: BTreeMap::new(),
            timers: Scheduler::new(),
            rng,
            config,
            level_width,
            next_id: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }

    pub fn get(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.get(&id)
    }

    pub fn contains(&self, id: MonsterId) -> bool {
        self.monsters.contains_key(&id)
    }

    /// Live monsters in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Monster> {
        self.monsters.values()
    }

    pub fn views(&self) -> Vec<MonsterView> {
        self.monsters.values().map(MonsterView::from).collect()
    }

    /// Simulated time as seen by this registry's timers.
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Create one idle monster per point and queue its first walking phase
    /// for the next timer drain.
    pub fn spawn(&mut self, points: &[Vec2], events: &mut Vec<SimEvent>) -> Vec<MonsterId> {
        let mut ids = Vec::with_capacity(points.len());
        for &position in points {
            let id = MonsterId(self.next_id);
            self.next_id += 1;

            let timer = self
                .timers
                .schedule(Duration::ZERO, (id, MonsterTimer::StartWalking));
            self.monsters.insert(
                id,
                Monster {
                    id,
                    position,
                    vx: 0.0,
                    vy: 0.0,
                    facing: Facing::Left,
                    walk_direction: -1,
                    state: MonsterState::Idle,
                    hits_taken: 0,
                    is_walking: false,
                    width: self.config.width,
                    height: self.config.height,
                    phase_since: self.timers.now(),
                    behavior_timer: Some(timer),
                    anim_timer: None,
                },
            );
            events.push(SimEvent::animation(
                EntityRef::Monster(id),
                AnimationKey::MonsterIdle,
            ));
            tracing::debug!(monster = id.0, x = position.x, y = position.y, "Monster spawned");
            ids.push(id);
        }
        ids
    }

    /// Advance the timer clock by `dt` and run every event that became due.
    pub fn advance_timers(&mut self, dt: Duration, events: &mut Vec<SimEvent>) {
        self.timers.advance(dt);
        while let Some(fired) = self.timers.pop_due() {
            self.handle_timer(fired, events);
        }
    }

    fn handle_timer(&mut self, fired: Fired<(MonsterId, MonsterTimer)>, events: &mut Vec<SimEvent>) {
        let (id, kind) = fired.event;
        let Some(monster) = self.monsters.get(&id) else {
            tracing::trace!(monster = id.0, ?kind, "Timer fired for removed monster");
            return;
        };
        let handle = match kind {
            MonsterTimer::StartWalking | MonsterTimer::StopWalking => monster.behavior_timer,
            MonsterTimer::HitRecovered | MonsterTimer::DeathFinished => monster.anim_timer,
        };
        if handle != Some(fired.id) {
            tracing::trace!(monster = id.0, ?kind, "Stale timer ignored");
            return;
        }

        match kind {
            MonsterTimer::StartWalking => self.start_walking(id, fired.due, events),
            MonsterTimer::StopWalking => self.stop_walking(id, fired.due, events),
            MonsterTimer::HitRecovered => self.recover_from_hit(id, events),
            MonsterTimer::DeathFinished => self.finish_death(id, events),
        }
    }

    fn start_walking(&mut self, id: MonsterId, at: Duration, events: &mut Vec<SimEvent>) {
        let direction = if self.rng.random_bool(0.5) { 1 } else { -1 };
        let delay = self.roll_delay(self.config.walk_phase);
        let Some(monster) = self.monsters.get_mut(&id) else {
            return;
        };
        if monster.state.is_dying_or_dead() {
            monster.behavior_timer = None;
            return;
        }
        monster.is_walking = true;
        monster.walk_direction = direction;
        monster.phase_since = at;
        if monster.state != MonsterState::Hit {
            monster.state = MonsterState::Walking;
            events.push(SimEvent::animation(
                EntityRef::Monster(id),
                AnimationKey::MonsterMove,
            ));
        }
        monster.behavior_timer = Some(self.timers.schedule(delay, (id, MonsterTimer::StopWalking)));
    }

    fn stop_walking(&mut self, id: MonsterId, at: Duration, events: &mut Vec<SimEvent>) {
        let delay = self.roll_delay(self.config.idle_phase);
        let Some(monster) = self.monsters.get_mut(&id) else {
            return;
        };
        monster.is_walking = false;
        if monster.state.is_dying_or_dead() {
            monster.behavior_timer = None;
            return;
        }
        monster.phase_since = at;
        if monster.state != MonsterState::Hit {
            monster.state = MonsterState::Idle;
            events.push(SimEvent::animation(
                EntityRef::Monster(id),
                AnimationKey::MonsterIdle,
            ));
        }
        monster.behavior_timer =
            Some(self.timers.schedule(delay, (id, MonsterTimer::StartWalking)));
    }

    fn recover_from_hit(&mut self, id: MonsterId, events: &mut Vec<SimEvent>) {
        let Some(monster) = self.monsters.get_mut(&id) else {
            return;
        };
        monster.anim_timer = None;
        if monster.state != MonsterState::Hit {
            return;
        }
        monster.state = MonsterState::Walking;
        events.push(SimEvent::animation(
            EntityRef::Monster(id),
            AnimationKey::MonsterMove,
        ));
    }

    fn finish_death(&mut self, id: MonsterId, events: &mut Vec<SimEvent>) {
        if let Some(mut monster) = self.monsters.remove(&id) {
            monster.state = MonsterState::Dead;
            if let Some(timer) = monster.behavior_timer.take() {
                self.timers.cancel(timer);
            }
            tracing::debug!(monster = id.0, "Monster removed");
            events.push(SimEvent::MonsterRemoved { id });
        }
    }

    /// Register one successful hit on `id`.
    pub fn apply_hit(&mut self, id: MonsterId, events: &mut Vec<SimEvent>) -> HitOutcome {
        let knock_roll = self.rng.random_bool(self.config.knockback_chance);
        let hits_to_kill = self.config.hits_to_kill;
        let knockback_speed = self.config.knockback_speed;

        let Some(monster) = self.monsters.get_mut(&id) else {
            tracing::trace!(monster = id.0, "Hit on unknown monster ignored");
            return HitOutcome::Ignored;
        };
        if monster.state.is_dying_or_dead() {
            tracing::trace!(monster = id.0, "Hit on dying monster ignored");
            return HitOutcome::Ignored;
        }

        monster.hits_taken += 1;
        let stale_anim = monster.anim_timer.take();

        if monster.hits_taken < hits_to_kill {
            monster.state = MonsterState::Hit;
            if knock_roll {
                monster.vx = -monster.facing.sign() * knockback_speed;
            }
            if let Some(timer) = stale_anim {
                self.timers.cancel(timer);
            }
            monster.anim_timer = Some(self.timers.schedule(
                clip_length(AnimationKey::MonsterHit),
                (id, MonsterTimer::HitRecovered),
            ));
            let hits_taken = monster.hits_taken;
            events.push(SimEvent::animation(
                EntityRef::Monster(id),
                AnimationKey::MonsterHit,
            ));
            events.push(SimEvent::MonsterHit {
                id,
                hits_taken,
                knocked_back: knock_roll,
            });
            HitOutcome::Staggered {
                knocked_back: knock_roll,
            }
        } else {
            monster.state = MonsterState::Dying;
            monster.is_walking = false;
            monster.vx = 0.0;
            let behavior = monster.behavior_timer.take();
            for timer in [stale_anim, behavior].into_iter().flatten() {
                self.timers.cancel(timer);
            }
            monster.anim_timer = Some(self.timers.schedule(
                clip_length(AnimationKey::MonsterDie),
                (id, MonsterTimer::DeathFinished),
            ));
            tracing::debug!(monster = id.0, "Monster killed");
            events.push(SimEvent::animation(
                EntityRef::Monster(id),
                AnimationKey::MonsterDie,
            ));
            events.push(SimEvent::MonsterKilled { id });
            HitOutcome::Killed
        }
    }

    /// Per-frame AI and physics step.
    ///
    /// Monsters in Hit keep whatever horizontal velocity they had (knockback
    /// included); everyone else gets the walk velocity for their phase.
    pub fn tick(&mut self, dt: Duration) {
        let secs = dt.as_secs_f32();
        let cfg = &self.config;
        for monster in self.monsters.values_mut() {
            match monster.state {
                MonsterState::Hit => {},
                MonsterState::Dying | MonsterState::Dead => monster.vx = 0.0,
                MonsterState::Idle | MonsterState::Walking => {
                    if monster.is_walking {
                        monster.vx = cfg.walk_speed * f32::from(monster.walk_direction);
                        monster.facing = Facing::from_sign(monster.walk_direction);
                    } else {
                        monster.vx = 0.0;
                    }
                },
            }

            monster.vy += cfg.gravity * secs;
            monster.position.y += monster.vy * secs;
            if monster.position.y >= cfg.ground_y {
                monster.position.y = cfg.ground_y;
                monster.vy = 0.0;
            }
            monster.position.x =
                (monster.position.x + monster.vx * secs).clamp(0.0, self.level_width);
        }
    }

    fn roll_delay(&mut self, range: PhaseRange) -> Duration {
        Duration::from_millis(self.rng.random_range(range.min_ms..=range.max_ms))
    }
}

fn clip_length(key: AnimationKey) -> Duration {
    key.playback().unwrap_or(Duration::ZERO)
}
