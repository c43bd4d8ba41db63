use serde::{Deserialize, Serialize};

/// Discrete per-frame button state as reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSignals {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub attack: bool,
}

/// Input for a single simulation frame: held buttons plus rising edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub held: InputSignals,
    /// `up` went from released to held this frame.
    pub jump_pressed: bool,
    /// `attack` went from released to held this frame.
    pub attack_pressed: bool,
}

impl FrameInput {
    /// Horizontal intent: -1 (left), 0, +1 (right). Both held cancel out.
    pub fn move_dir(&self) -> i8 {
        match (self.held.left, self.held.right) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }
}

/// Turns a stream of held-button snapshots into [`FrameInput`]s with
/// just-pressed edge detection for jump and attack.
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    previous: InputSignals,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this frame's held state. Call exactly once per frame.
    pub fn next_frame(&mut self, held: InputSignals) -> FrameInput {
        let frame = FrameInput {
            held,
            jump_pressed: held.up && !self.previous.up,
            attack_pressed: held.attack && !self.previous.attack,
        };
        self.previous = held;
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attack_held() -> InputSignals {
        InputSignals {
            attack: true,
            ..Default::default()
        }
    }

    #[test]
    fn attack_triggers_only_on_rising_edge() {
        let mut tracker = InputTracker::new();
        assert!(tracker.next_frame(attack_held()).attack_pressed);
        assert!(!tracker.next_frame(attack_held()).attack_pressed);
        assert!(!tracker.next_frame(InputSignals::default()).attack_pressed);
        assert!(tracker.next_frame(attack_held()).attack_pressed);
    }

    #[test]
    fn held_jump_does_not_retrigger() {
        let mut tracker = InputTracker::new();
        let up = InputSignals {
            up: true,
            ..Default::default()
        };
        let first = tracker.next_frame(up);
        let second = tracker.next_frame(up);
        assert!(first.jump_pressed);
        assert!(!second.jump_pressed);
        assert!(second.held.up);
    }

    #[test]
    fn opposing_directions_cancel() {
        let frame = FrameInput {
            held: InputSignals {
                left: true,
                right: true,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(frame.move_dir(), 0);
    }
}
