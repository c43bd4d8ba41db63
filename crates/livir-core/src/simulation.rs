use std::time::Duration;

use serde::Serialize;

use crate::input::FrameInput;

/// Trait implemented by a fixed-tick world that a host (renderer, headless
/// runner, test harness) drives once per frame.
///
/// The host owns input collection and presentation; the simulation only
/// advances state and reports what happened.
pub trait Simulation {
    /// Events emitted during `update` (animation requests, level switches, ...).
    type Event;
    /// Render-facing view of the world.
    type Snapshot: Serialize;

    fn metadata(&self) -> SimMetadata;

    /// Advance by one frame of `dt` simulated time.
    fn update(&mut self, dt: Duration, input: &FrameInput) -> Vec<Self::Event>;

    fn snapshot(&self) -> Self::Snapshot;

    /// MessagePack-encoded snapshot for an out-of-process renderer.
    fn serialize_snapshot(&self) -> Vec<u8> {
        match rmp_serde::to_vec(&self.snapshot()) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, "Snapshot serialization failed");
                Vec::new()
            },
        }
    }

    /// Frames per second the host is expected to drive `update` at.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    fn pause(&mut self);

    fn resume(&mut self);

    fn is_paused(&self) -> bool;
}

/// Descriptive metadata for host UIs and logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimMetadata {
    pub name: String,
    pub description: String,
}
