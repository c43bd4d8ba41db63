//! Cooperative scheduled-event queue driven by simulated time.
//!
//! Events never fire on their own. The owner advances the clock once per
//! tick and then drains due entries with [`Scheduler::pop_due`], on the same
//! thread that runs the tick. While draining, [`Scheduler::now`] reports the
//! due time of the entry being handled, so follow-up events scheduled from a
//! handler are measured from when their trigger was due rather than from the
//! end of the frame.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Handle to a pending event. Handles are never reused within a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// An event taken off the queue.
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<E> {
    pub id: TimerId,
    pub due: Duration,
    pub event: E,
}

#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    now: Duration,
    horizon: Duration,
    next_id: u64,
    /// Keyed by (due, id) so equal due times fire in scheduling order.
    pending: BTreeMap<(Duration, TimerId), E>,
    due_by_id: HashMap<TimerId, Duration>,
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            horizon: Duration::ZERO,
            next_id: 0,
            pending: BTreeMap::new(),
            due_by_id: HashMap::new(),
        }
    }

    /// Current simulated time.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queue `event` to fire no earlier than `delay` from now.
    pub fn schedule(&mut self, delay: Duration, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = self.now + delay;
        self.pending.insert((due, id), event);
        self.due_by_id.insert(id, due);
        id
    }

    /// Remove a pending event. Returns it if it had not fired yet.
    pub fn cancel(&mut self, id: TimerId) -> Option<E> {
        let due = self.due_by_id.remove(&id)?;
        self.pending.remove(&(due, id))
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.due_by_id.contains_key(&id)
    }

    /// Time at which `id` fires, if still pending.
    pub fn due_at(&self, id: TimerId) -> Option<Duration> {
        self.due_by_id.get(&id).copied()
    }

    /// Move the horizon forward by `dt`. Follow with [`Scheduler::pop_due`]
    /// until it returns `None`.
    pub fn advance(&mut self, dt: Duration) {
        self.horizon = self.horizon.max(self.now) + dt;
    }

    /// Take the earliest event due at or before the horizon. Once nothing is
    /// due, the clock settles on the horizon and `None` is returned.
    pub fn pop_due(&mut self) -> Option<Fired<E>> {
        let key = match self.pending.first_key_value() {
            Some((&(due, id), _)) if due <= self.horizon => (due, id),
            _ => {
                self.now = self.horizon.max(self.now);
                return None;
            },
        };
        let event = self.pending.remove(&key)?;
        self.due_by_id.remove(&key.1);
        self.now = key.0;
        Some(Fired {
            id: key.1,
            due: key.0,
            event,
        })
    }

    /// Drop everything that is still pending.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.due_by_id.clear();
    }
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn drain(s: &mut Scheduler<&'static str>) -> Vec<&'static str> {
        let mut out = Vec::new();
        while let Some(f) = s.pop_due() {
            out.push(f.event);
        }
        out
    }

    #[test]
    fn event_does_not_fire_early() {
        let mut s = Scheduler::new();
        s.schedule(ms(100), "expire");

        s.advance(ms(99));
        assert!(drain(&mut s).is_empty());

        s.advance(ms(1));
        assert_eq!(drain(&mut s), vec!["expire"]);
        assert!(s.is_empty());
    }

    #[test]
    fn fires_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule(ms(30), "c");
        s.schedule(ms(10), "a");
        s.schedule(ms(20), "b");
        s.advance(ms(50));
        assert_eq!(drain(&mut s), vec!["a", "b", "c"]);
    }

    #[test]
    fn equal_due_times_keep_scheduling_order() {
        let mut s = Scheduler::new();
        s.schedule(ms(10), "first");
        s.schedule(ms(10), "second");
        s.advance(ms(10));
        assert_eq!(drain(&mut s), vec!["first", "second"]);
    }

    #[test]
    fn cancelled_event_never_fires() {
        let mut s = Scheduler::new();
        let id = s.schedule(ms(10), "gone");
        assert!(s.is_pending(id));
        assert_eq!(s.cancel(id), Some("gone"));
        assert!(!s.is_pending(id));
        assert_eq!(s.cancel(id), None);
        s.advance(ms(100));
        assert!(drain(&mut s).is_empty());
    }

    #[test]
    fn now_tracks_due_time_while_draining() {
        let mut s = Scheduler::new();
        s.schedule(ms(40), "stop");
        s.advance(ms(16 * 3));

        let fired = s.pop_due().expect("stop is due");
        assert_eq!(fired.due, ms(40));
        assert_eq!(s.now(), ms(40));

        // Follow-up measured from the trigger, not from the frame end.
        let next = s.schedule(ms(10), "start");
        assert_eq!(s.due_at(next), Some(ms(50)));

        assert!(s.pop_due().is_none());
        assert_eq!(s.now(), ms(48));
    }

    #[test]
    fn follow_up_due_inside_same_frame_fires_in_same_drain() {
        let mut s = Scheduler::new();
        s.schedule(ms(5), "a");
        s.advance(ms(20));
        let a = s.pop_due().expect("a is due");
        assert_eq!(a.event, "a");
        s.schedule(ms(5), "b");
        let b = s.pop_due().expect("b is due at 10ms");
        assert_eq!(b.due, ms(10));
        assert!(s.pop_due().is_none());
    }

    #[test]
    fn clear_drops_pending() {
        let mut s = Scheduler::new();
        let id = s.schedule(ms(5), "x");
        s.clear();
        assert!(!s.is_pending(id));
        assert_eq!(s.len(), 0);
    }
}
