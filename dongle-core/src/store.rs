//! Controller state store: the latest sample of each controller.
//!
//! The radio side publishes from its own task or interrupt context; the tick
//! loop consumes. Each slot is a whole-struct copy taken inside a critical
//! section, so a reader never observes half of an update.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Duration, Instant};
use sinput_proto::{ControllerSample, Role};

#[derive(Clone, Copy)]
struct Slot {
    sample: ControllerSample,
    received: bool,
}

impl Slot {
    const EMPTY: Self = Self {
        sample: ControllerSample::IDLE,
        received: false,
    };
}

/// Latest sample per controller, with a freshness flag.
///
/// The two slots are independent; nothing written for one role ever reaches
/// the other.
pub struct StateStore {
    left: Mutex<CriticalSectionRawMutex, Cell<Slot>>,
    right: Mutex<CriticalSectionRawMutex, Cell<Slot>>,
}

impl StateStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            left: Mutex::new(Cell::new(Slot::EMPTY)),
            right: Mutex::new(Cell::new(Slot::EMPTY)),
        }
    }

    fn slot(&self, role: Role) -> &Mutex<CriticalSectionRawMutex, Cell<Slot>> {
        match role {
            Role::Left => &self.left,
            Role::Right => &self.right,
        }
    }

    /// Store a newly received sample, replacing the previous one.
    ///
    /// The stored copy is marked fresh and stamped with `now`.
    pub fn publish(&self, role: Role, sample: ControllerSample, now: Instant) {
        let sample = ControllerSample {
            fresh: true,
            last_seen_ms: now.as_millis() as u32,
            ..sample
        };
        self.slot(role).lock(|cell| {
            cell.set(Slot {
                sample,
                received: true,
            })
        });
    }

    /// Take the current sample for one tick.
    ///
    /// The returned copy carries `fresh == true` only the first time a
    /// published sample is taken.
    pub fn take(&self, role: Role) -> ControllerSample {
        self.slot(role).lock(|cell| {
            let mut slot = cell.get();
            let taken = slot.sample;
            slot.sample.fresh = false;
            cell.set(slot);
            taken
        })
    }

    /// Current sample without consuming its freshness.
    pub fn peek(&self, role: Role) -> ControllerSample {
        self.slot(role).lock(|cell| cell.get().sample)
    }

    /// Whether the controller has been silent for longer than `timeout`, or
    /// never delivered a sample at all.
    pub fn is_stale(&self, role: Role, now: Instant, timeout: Duration) -> bool {
        let slot = self.slot(role).lock(Cell::get);
        if !slot.received {
            return true;
        }
        let now_ms = now.as_millis() as u32;
        u64::from(now_ms.wrapping_sub(slot.sample.last_seen_ms)) > timeout.as_millis()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(stick_x: i8) -> ControllerSample {
        ControllerSample {
            stick_x,
            ..ControllerSample::IDLE
        }
    }

    #[test]
    fn test_take_consumes_freshness_once() {
        let store = StateStore::new();
        store.publish(Role::Left, sample(40), Instant::from_millis(12));

        let first = store.take(Role::Left);
        assert!(first.fresh);
        assert_eq!(first.stick_x, 40);
        assert_eq!(first.last_seen_ms, 12);

        let second = store.take(Role::Left);
        assert!(!second.fresh);
        assert_eq!(second.stick_x, 40);
    }

    #[test]
    fn test_slots_are_independent() {
        let store = StateStore::new();
        store.publish(Role::Right, sample(-70), Instant::from_millis(1));

        let left = store.take(Role::Left);
        assert!(!left.fresh);
        assert_eq!(left, ControllerSample::IDLE);
        assert_eq!(store.peek(Role::Right).stick_x, -70);
        assert!(store.peek(Role::Right).fresh);
    }

    #[test]
    fn test_publish_overwrites_pending_sample() {
        let store = StateStore::new();
        store.publish(Role::Right, sample(1), Instant::from_millis(1));
        store.publish(Role::Right, sample(2), Instant::from_millis(2));
        assert_eq!(store.take(Role::Right).stick_x, 2);
    }

    #[test]
    fn test_staleness() {
        let store = StateStore::new();
        let timeout = Duration::from_millis(100);
        assert!(store.is_stale(Role::Left, Instant::from_millis(0), timeout));

        store.publish(Role::Left, sample(0), Instant::from_millis(1_000));
        assert!(!store.is_stale(Role::Left, Instant::from_millis(1_100), timeout));
        assert!(store.is_stale(Role::Left, Instant::from_millis(1_101), timeout));
        assert!(store.is_stale(Role::Right, Instant::from_millis(1_050), timeout));
    }
}
