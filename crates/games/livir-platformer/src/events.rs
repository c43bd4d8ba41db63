use serde::{Deserialize, Serialize};

use livir_core::animation::AnimationKey;
use livir_core::geom::{Aabb, Vec2};

use crate::level::LevelId;
use crate::monster::MonsterId;

/// Which entity an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityRef {
    Player,
    Monster(MonsterId),
}

/// Events emitted by the simulation for the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Start playing `key` on `entity`.
    PlayAnimation { entity: EntityRef, key: AnimationKey },
    /// The player swung; `hitbox` is live for its configured lifetime.
    AttackStarted { hitbox: Aabb },
    /// A monster took a hit and survived.
    MonsterHit {
        id: MonsterId,
        hits_taken: u8,
        knocked_back: bool,
    },
    /// A monster took its final hit and started dying.
    MonsterKilled { id: MonsterId },
    /// A dying monster finished its death animation and left the roster.
    MonsterRemoved { id: MonsterId },
    /// The previous level was discarded and `to` was built in its place,
    /// with the player placed at `spawn`.
    LevelSwitched {
        from: LevelId,
        to: LevelId,
        spawn: Vec2,
    },
    /// A level's geometry and monsters are constructed.
    LevelReady { level: LevelId },
}

impl SimEvent {
    pub(crate) fn animation(entity: EntityRef, key: AnimationKey) -> Self {
        SimEvent::PlayAnimation { entity, key }
    }
}
