use std::time::Duration;

use serde::{Deserialize, Serialize};

use livir_core::geom::Aabb;
use livir_core::schedule::Scheduler;

use crate::config::CombatConfig;
use crate::events::SimEvent;
use crate::monster::{HitOutcome, MonsterId, MonsterRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HitboxId(pub u64);

/// A player hitbox that is still within its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveHitbox {
    pub id: HitboxId,
    pub bounds: Aabb,
}

/// Resolves player hitboxes against the monster roster and expires them.
///
/// A hitbox is resolved once, when it is submitted. It then stays in
/// [`CombatResolver::active`] until its lifetime runs out so hosts can draw it.
pub struct CombatResolver {
    active: Vec<ActiveHitbox>,
    expiry: Scheduler<HitboxId>,
    next_id: u64,
    lifetime: Duration,
}

impl CombatResolver {
    pub fn new(config: &CombatConfig) -> Self {
        Self {
            active: Vec::new(),
            expiry: Scheduler::new(),
            next_id: 0,
            lifetime: config.hitbox_lifetime(),
        }
    }

    pub fn active(&self) -> &[ActiveHitbox] {
        &self.active
    }

    /// Register `hitbox`, apply it to every monster it overlaps and schedule
    /// its removal.
    pub fn submit(
        &mut self,
        hitbox: Aabb,
        monsters: Option<&mut MonsterRegistry>,
        events: &mut Vec<SimEvent>,
    ) -> Vec<(MonsterId, HitOutcome)> {
        let id = HitboxId(self.next_id);
        self.next_id += 1;
        self.active.push(ActiveHitbox { id, bounds: hitbox });
        self.expiry.schedule(self.lifetime, id);

        match monsters {
            Some(registry) => resolve(&hitbox, registry, events),
            None => Vec::new(),
        }
    }

    /// Drop hitboxes whose lifetime has elapsed.
    pub fn advance(&mut self, dt: Duration) {
        self.expiry.advance(dt);
        while let Some(fired) = self.expiry.pop_due() {
            self.active.retain(|h| h.id != fired.event);
        }
    }

    pub fn clear(&mut self) {
        self.active.clear();
        self.expiry.clear();
    }
}

/// Apply one hit to every live monster whose bounds overlap `hitbox`.
pub fn resolve(
    hitbox: &Aabb,
    monsters: &mut MonsterRegistry,
    events: &mut Vec<SimEvent>,
) -> Vec<(MonsterId, HitOutcome)> {
    let targets: Vec<MonsterId> = monsters
        .iter()
        .filter(|m| m.is_combat_target() && m.bounds().intersects(hitbox))
        .map(|m| m.id)
        .collect();

    targets
        .into_iter()
        .map(|id| {
            let outcome = monsters.apply_hit(id, events);
            tracing::debug!(?id, ?outcome, "Hitbox connected");
            (id, outcome)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use livir_core::geom::Vec2;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::config::MonsterConfig;
    use crate::monster::MonsterState;

    const FRAME: Duration = Duration::from_millis(16);

    fn registry_with(points: &[Vec2]) -> (MonsterRegistry, Vec<MonsterId>) {
        let mut reg = MonsterRegistry::new(
            MonsterConfig::default(),
            2000.0,
            StdRng::seed_from_u64(9),
        );
        let mut events = Vec::new();
        let ids = reg.spawn(points, &mut events);
        (reg, ids)
    }

    #[test]
    fn overlapping_monsters_are_hit_once() {
        let (mut reg, ids) =
            registry_with(&[Vec2::new(1000.0, 570.0), Vec2::new(1020.0, 570.0)]);
        let mut combat = CombatResolver::new(&CombatConfig::default());
        let mut events = Vec::new();

        let hitbox = Aabb::from_center(Vec2::new(1010.0, 570.0), 30.0, 80.0);
        let outcomes = combat.submit(hitbox, Some(&mut reg), &mut events);

        assert_eq!(outcomes.len(), 2);
        for id in ids {
            assert_eq!(reg.get(id).map(|m| m.hits_taken), Some(1));
            assert_eq!(reg.get(id).map(|m| m.state), Some(MonsterState::Hit));
        }
    }

    #[test]
    fn distant_monster_is_untouched() {
        let (mut reg, ids) = registry_with(&[Vec2::new(1500.0, 570.0)]);
        let mut combat = CombatResolver::new(&CombatConfig::default());
        let mut events = Vec::new();

        let hitbox = Aabb::from_center(Vec2::new(1000.0, 570.0), 30.0, 80.0);
        assert!(combat.submit(hitbox, Some(&mut reg), &mut events).is_empty());
        assert_eq!(reg.get(ids[0]).map(|m| m.hits_taken), Some(0));
        assert!(events.is_empty());
    }

    #[test]
    fn dying_monsters_are_not_targets() {
        let (mut reg, ids) = registry_with(&[Vec2::new(1000.0, 570.0)]);
        let hitbox = Aabb::from_center(Vec2::new(1000.0, 570.0), 30.0, 80.0);
        let mut events = Vec::new();
        for _ in 0..3 {
            resolve(&hitbox, &mut reg, &mut events);
            reg.advance_timers(FRAME, &mut events);
        }
        assert_eq!(reg.get(ids[0]).map(|m| m.state), Some(MonsterState::Dying));

        let outcomes = resolve(&hitbox, &mut reg, &mut events);
        assert!(outcomes.is_empty());
    }

    #[test]
    fn hitbox_expires_after_lifetime() {
        let mut combat = CombatResolver::new(&CombatConfig::default());
        let mut events = Vec::new();
        combat.submit(Aabb::new(0.0, 0.0, 30.0, 80.0), None, &mut events);
        assert_eq!(combat.active().len(), 1);

        // 6 frames = 96 ms.
        for _ in 0..6 {
            combat.advance(FRAME);
        }
        assert_eq!(combat.active().len(), 1);
        combat.advance(FRAME);
        assert!(combat.active().is_empty());
    }

    #[test]
    fn no_registry_means_no_hits() {
        let mut combat = CombatResolver::new(&CombatConfig::default());
        let mut events = Vec::new();
        let outcomes = combat.submit(Aabb::new(0.0, 0.0, 30.0, 80.0), None, &mut events);
        assert!(outcomes.is_empty());
        assert!(events.is_empty());
    }
}
