pub mod animation;
pub mod geom;
pub mod input;
pub mod schedule;
pub mod simulation;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::time::Duration;

    use crate::input::{FrameInput, InputSignals, InputTracker};
    use crate::simulation::Simulation;

    /// One 60 Hz frame.
    pub const FRAME: Duration = Duration::from_micros(16_667);

    /// Frame input with only the given held buttons and no rising edges.
    pub fn held(signals: InputSignals) -> FrameInput {
        FrameInput {
            held: signals,
            ..Default::default()
        }
    }

    pub fn idle_input() -> FrameInput {
        FrameInput::default()
    }

    pub fn right_held() -> FrameInput {
        held(InputSignals {
            right: true,
            ..Default::default()
        })
    }

    pub fn left_held() -> FrameInput {
        held(InputSignals {
            left: true,
            ..Default::default()
        })
    }

    pub fn down_held() -> FrameInput {
        held(InputSignals {
            down: true,
            ..Default::default()
        })
    }

    /// A fresh press of the jump button.
    pub fn jump_press() -> FrameInput {
        FrameInput {
            held: InputSignals {
                up: true,
                ..Default::default()
            },
            jump_pressed: true,
            attack_pressed: false,
        }
    }

    /// A fresh press of the attack button.
    pub fn attack_press() -> FrameInput {
        FrameInput {
            held: InputSignals {
                attack: true,
                ..Default::default()
            },
            jump_pressed: false,
            attack_pressed: true,
        }
    }

    /// Run `n` frames with the same input, returning all accumulated events.
    pub fn run_frames<S: Simulation>(
        sim: &mut S,
        n: usize,
        dt: Duration,
        input: &FrameInput,
    ) -> Vec<S::Event> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(sim.update(dt, input));
        }
        all_events
    }

    /// Drive a sequence of held-button snapshots through an [`InputTracker`].
    pub fn run_script<S: Simulation>(
        sim: &mut S,
        dt: Duration,
        script: &[InputSignals],
    ) -> Vec<S::Event> {
        let mut tracker = InputTracker::new();
        let mut all_events = Vec::new();
        for &signals in script {
            let frame = tracker.next_frame(signals);
            all_events.extend(sim.update(dt, &frame));
        }
        all_events
    }

    // ================================================================
    // Simulation Trait Contract Tests
    // ================================================================
    // Generic checks every Simulation implementation must pass. Game crates
    // call them from their own #[cfg(test)] modules.

    /// The snapshot must encode to non-empty bytes.
    pub fn contract_snapshot_serializes<S: Simulation>(sim: &S) {
        let bytes = sim.serialize_snapshot();
        assert!(
            !bytes.is_empty(),
            "serialize_snapshot() must return non-empty bytes"
        );
    }

    /// Paused simulations must not change; resuming must let them advance.
    pub fn contract_pause_freezes_state<S: Simulation>(sim: &mut S, moving: &FrameInput) {
        sim.pause();
        assert!(sim.is_paused());
        let before = sim.serialize_snapshot();
        sim.update(FRAME, moving);
        assert_eq!(
            before,
            sim.serialize_snapshot(),
            "State must not change while paused"
        );

        sim.resume();
        assert!(!sim.is_paused());
        sim.update(FRAME, moving);
        assert_ne!(
            before,
            sim.serialize_snapshot(),
            "State must change after resume"
        );
    }
}
