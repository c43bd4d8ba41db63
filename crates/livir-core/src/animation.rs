use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Symbolic animation keys resolved to frames by the host's asset registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKey {
    Idle,
    Walk,
    Jump,
    Attack,
    MonsterIdle,
    MonsterMove,
    MonsterHit,
    MonsterDie,
}

/// Frame layout of a clip as registered with the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clip {
    pub frames: u32,
    pub frame_rate: f32,
    pub looping: bool,
}

impl Clip {
    /// Playback length of a one-shot clip. Looping clips never finish.
    pub fn playback(&self) -> Option<Duration> {
        if self.looping || self.frame_rate <= 0.0 || !self.frame_rate.is_finite() {
            return None;
        }
        Some(Duration::from_secs_f32(self.frames as f32 / self.frame_rate))
    }
}

impl AnimationKey {
    pub const ALL: [AnimationKey; 8] = [
        AnimationKey::Idle,
        AnimationKey::Walk,
        AnimationKey::Jump,
        AnimationKey::Attack,
        AnimationKey::MonsterIdle,
        AnimationKey::MonsterMove,
        AnimationKey::MonsterHit,
        AnimationKey::MonsterDie,
    ];

    /// Key as registered in the asset registry.
    pub fn name(&self) -> &'static str {
        match self {
            AnimationKey::Idle => "idle",
            AnimationKey::Walk => "walk",
            AnimationKey::Jump => "jump",
            AnimationKey::Attack => "attack",
            AnimationKey::MonsterIdle => "monster_idle",
            AnimationKey::MonsterMove => "monster_move",
            AnimationKey::MonsterHit => "monster_hit",
            AnimationKey::MonsterDie => "monster_die",
        }
    }

    pub fn clip(&self) -> Clip {
        let (frames, frame_rate, looping) = match self {
            AnimationKey::Idle => (5, 5.0, true),
            AnimationKey::Walk => (4, 5.0, true),
            AnimationKey::Jump => (1, 1.0, false),
            AnimationKey::Attack => (2, 8.0, false),
            AnimationKey::MonsterIdle => (3, 3.0, true),
            AnimationKey::MonsterMove => (3, 6.0, true),
            AnimationKey::MonsterHit => (1, 1.0, false),
            AnimationKey::MonsterDie => (3, 4.0, false),
        };
        Clip {
            frames,
            frame_rate,
            looping,
        }
    }

    /// How long until the host reports this clip finished.
    pub fn playback(&self) -> Option<Duration> {
        self.clip().playback()
    }
}
