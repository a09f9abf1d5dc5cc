//! Tick cadence and latency monitoring.

use embassy_time::{Duration, Instant};

/// Decides when the next report tick is due.
///
/// A tick fires once at least `interval` has passed since the previous one,
/// and the reference then moves to the firing time itself. A late tick
/// pushes every later tick back instead of being caught up with a burst.
#[derive(Debug, Clone, Copy)]
pub struct TickScheduler {
    interval: Duration,
    last_fire: Instant,
}

impl TickScheduler {
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fire: Instant::from_ticks(0),
        }
    }

    /// Returns `true` if a tick is due at `now`, and arms the next one.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_fire) >= self.interval {
            self.last_fire = now;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn last_fire(&self) -> Instant {
        self.last_fire
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Running latency figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LatencyStats {
    pub ticks: u32,
    pub tick_overruns: u32,
    pub iteration_overruns: u32,
    pub worst_tick: Duration,
    pub worst_iteration: Duration,
}

/// Measures tick processing and loop iteration time against their budgets.
///
/// Overruns are counted and logged; nothing is skipped or throttled.
#[derive(Debug, Clone, Copy)]
pub struct LatencyMonitor {
    tick_budget: Duration,
    iteration_budget: Duration,
    stats: LatencyStats,
}

impl LatencyMonitor {
    #[must_use]
    pub const fn new(tick_budget: Duration, iteration_budget: Duration) -> Self {
        Self {
            tick_budget,
            iteration_budget,
            stats: LatencyStats {
                ticks: 0,
                tick_overruns: 0,
                iteration_overruns: 0,
                worst_tick: Duration::from_ticks(0),
                worst_iteration: Duration::from_ticks(0),
            },
        }
    }

    /// Record one tick's processing time. Returns `true` on overrun.
    pub fn record_tick(&mut self, elapsed: Duration) -> bool {
        self.stats.ticks = self.stats.ticks.wrapping_add(1);
        self.stats.worst_tick = self.stats.worst_tick.max(elapsed);
        if elapsed > self.tick_budget {
            self.stats.tick_overruns = self.stats.tick_overruns.saturating_add(1);
            warn!("slow tick: {}us", elapsed.as_micros());
            true
        } else {
            false
        }
    }

    /// Record one loop iteration's wall time. Returns `true` on overrun.
    pub fn record_iteration(&mut self, elapsed: Duration) -> bool {
        self.stats.worst_iteration = self.stats.worst_iteration.max(elapsed);
        if elapsed > self.iteration_budget {
            self.stats.iteration_overruns = self.stats.iteration_overruns.saturating_add(1);
            warn!("long loop iteration: {}us", elapsed.as_micros());
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn stats(&self) -> LatencyStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ITERATION_BUDGET, TICK_BUDGET, TICK_INTERVAL};

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_fires_on_interval() {
        let mut scheduler = TickScheduler::new(TICK_INTERVAL);
        assert!(scheduler.poll(at(4)));
        assert!(!scheduler.poll(at(5)));
        assert!(!scheduler.poll(at(7)));
        assert!(scheduler.poll(at(8)));
        assert_eq!(scheduler.last_fire(), at(8));
    }

    #[test]
    fn test_late_tick_shifts_phase() {
        let mut scheduler = TickScheduler::new(TICK_INTERVAL);
        assert!(scheduler.poll(at(4)));
        // Loop stalled: the overdue tick fires once, no burst follows
        assert!(scheduler.poll(at(19)));
        assert!(!scheduler.poll(at(20)));
        assert!(!scheduler.poll(at(22)));
        assert!(scheduler.poll(at(23)));
    }

    #[test]
    fn test_latency_flags_without_enforcing() {
        let mut monitor = LatencyMonitor::new(TICK_BUDGET, ITERATION_BUDGET);
        assert!(!monitor.record_tick(Duration::from_millis(5)));
        assert!(monitor.record_tick(Duration::from_millis(6)));
        assert!(!monitor.record_iteration(Duration::from_millis(10)));
        assert!(monitor.record_iteration(Duration::from_millis(12)));

        let stats = monitor.stats();
        assert_eq!(stats.ticks, 2);
        assert_eq!(stats.tick_overruns, 1);
        assert_eq!(stats.iteration_overruns, 1);
        assert_eq!(stats.worst_tick, Duration::from_millis(6));
        assert_eq!(stats.worst_iteration, Duration::from_millis(12));
    }
}
