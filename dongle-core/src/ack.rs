//! Acknowledgment channel back to the controllers.
//!
//! Every sample a controller sends is answered with an [`AckPayload`]
//! carrying the current rumble levels, a per-controller sequence number and
//! a hint for when the dongle's next report tick is due.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Instant};
use sinput_proto::{AckPayload, HapticsCommand, Role};

use crate::config::TICK_INTERVAL;
use crate::haptics::{HapticsError, HapticsSink};

#[derive(Clone, Copy)]
struct Timing {
    last_tick: Instant,
    sequence: [u8; 2],
}

/// Shared state behind the acknowledgments.
///
/// Rumble levels persist until the host sends new ones, so a single command
/// keeps both motors running across any number of acks.
pub struct AckChannel {
    rumble: Mutex<CriticalSectionRawMutex, HapticsCommand>,
    timing: BlockingMutex<CriticalSectionRawMutex, Cell<Timing>>,
}

impl AckChannel {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rumble: Mutex::new(HapticsCommand::OFF),
            timing: BlockingMutex::new(Cell::new(Timing {
                last_tick: Instant::from_ticks(0),
                sequence: [0; 2],
            })),
        }
    }

    /// Record that a report tick fired at `now`.
    pub fn note_tick(&self, now: Instant) {
        self.timing.lock(|cell| {
            let mut timing = cell.get();
            timing.last_tick = now;
            cell.set(timing);
        });
    }

    /// Build the acknowledgment for a sample just received from `role`.
    pub async fn next_ack(&self, role: Role, now: Instant) -> AckPayload {
        let rumble = *self.rumble.lock().await;

        let (sequence_num, last_tick) = self.timing.lock(|cell| {
            let mut timing = cell.get();
            let seq = &mut timing.sequence[role.index()];
            *seq = seq.wrapping_add(1);
            let issued = *seq;
            cell.set(timing);
            (issued, timing.last_tick)
        });

        AckPayload {
            next_delay_ms: next_delay_ms(last_tick, now),
            sequence_num,
            left_rumble: rumble.left,
            right_rumble: rumble.right,
            dongle_timestamp: now.as_millis() as u16,
        }
    }

    /// Rumble levels the next acknowledgments will carry.
    pub fn current_rumble(&self) -> Option<HapticsCommand> {
        self.rumble.try_lock().ok().map(|guard| *guard)
    }
}

impl Default for AckChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl HapticsSink for AckChannel {
    fn set_haptics(&self, command: HapticsCommand) -> Result<(), HapticsError> {
        let mut slot = self.rumble.try_lock().map_err(|_| HapticsError::Busy)?;
        *slot = command;
        Ok(())
    }
}

/// Milliseconds until the tick after `last_tick`, never less than 1.
fn next_delay_ms(last_tick: Instant, now: Instant) -> u16 {
    let elapsed = now.saturating_duration_since(last_tick);
    let remaining = TICK_INTERVAL
        .checked_sub(elapsed)
        .unwrap_or(Duration::from_ticks(0));
    remaining.as_millis().clamp(1, u64::from(u16::MAX)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::future::Future;
    use core::pin::Pin;
    use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn block_on<F: Future>(mut f: F) -> F::Output {
        fn noop_raw_waker() -> RawWaker {
            fn noop(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                noop_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
            RawWaker::new(core::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
        let mut cx = Context::from_waker(&waker);

        // SAFETY: We don't move f after pinning
        let mut f = unsafe { Pin::new_unchecked(&mut f) };

        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => result,
            Poll::Pending => panic!("future returned Pending unexpectedly"),
        }
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_sequence_per_role_wraps() {
        let channel = AckChannel::new();
        assert_eq!(block_on(channel.next_ack(Role::Left, at(0))).sequence_num, 1);
        assert_eq!(block_on(channel.next_ack(Role::Left, at(0))).sequence_num, 2);
        assert_eq!(block_on(channel.next_ack(Role::Right, at(0))).sequence_num, 1);

        for _ in 0..253 {
            block_on(channel.next_ack(Role::Left, at(0)));
        }
        assert_eq!(block_on(channel.next_ack(Role::Left, at(0))).sequence_num, 0);
    }

    #[test]
    fn test_rumble_persists_across_acks() {
        let channel = AckChannel::new();
        assert_eq!(channel.set_haptics(HapticsCommand::new(200, 50)), Ok(()));

        for _ in 0..3 {
            let ack = block_on(channel.next_ack(Role::Right, at(10)));
            assert_eq!((ack.left_rumble, ack.right_rumble), (200, 50));
        }
        assert_eq!(channel.current_rumble(), Some(HapticsCommand::new(200, 50)));

        channel.set_haptics(HapticsCommand::OFF).unwrap();
        let ack = block_on(channel.next_ack(Role::Left, at(11)));
        assert_eq!((ack.left_rumble, ack.right_rumble), (0, 0));
    }

    #[test]
    fn test_busy_slot_rejects_command() {
        let channel = AckChannel::new();
        let guard = channel.rumble.try_lock().unwrap();
        assert_eq!(
            channel.set_haptics(HapticsCommand::new(1, 1)),
            Err(HapticsError::Busy)
        );
        drop(guard);
        assert_eq!(channel.set_haptics(HapticsCommand::new(1, 1)), Ok(()));
    }

    #[test]
    fn test_next_delay_tracks_tick_phase() {
        let channel = AckChannel::new();
        channel.note_tick(at(100));
        assert_eq!(block_on(channel.next_ack(Role::Left, at(101))).next_delay_ms, 3);
        assert_eq!(block_on(channel.next_ack(Role::Left, at(100))).next_delay_ms, 4);
        // Tick overdue: answer with the minimum
        assert_eq!(block_on(channel.next_ack(Role::Left, at(104))).next_delay_ms, 1);
        assert_eq!(block_on(channel.next_ack(Role::Left, at(130))).next_delay_ms, 1);
    }

    #[test]
    fn test_timestamp_is_truncated_uptime() {
        let channel = AckChannel::new();
        let ack = block_on(channel.next_ack(Role::Right, at(70_000)));
        assert_eq!(ack.dongle_timestamp, (70_000u32 & 0xFFFF) as u16);
    }
}
