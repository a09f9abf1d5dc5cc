//! Dongle: the report loop tying the state store to the USB sink.

use embassy_time::{Instant, Timer};
use sinput_proto::{ControllerSample, Role};

use crate::ack::AckChannel;
use crate::config::{
    ITERATION_BUDGET, LOOP_YIELD, STALE_AFTER, STATUS_PERIOD, TICK_BUDGET, TICK_INTERVAL,
};
use crate::output::{OutputError, ReportSink};
use crate::scheduler::{LatencyMonitor, LatencyStats, TickScheduler};
use crate::store::StateStore;
use crate::synth::ReportSynthesizer;

/// Monotonic time source for the loop.
pub trait Clock {
    fn now(&self) -> Instant;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Clock backed by the embassy time driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Error type for loop operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DongleError {
    /// Error from the report sink.
    Output(OutputError),
}

/// Link state of one controller as seen by the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerStatus {
    pub role: Role,
    /// No sample within the staleness window.
    pub stale: bool,
    /// Last sample held for this controller.
    pub sample: ControllerSample,
}

/// The report loop.
///
/// Consumes the latest controller samples on every tick, synthesizes one
/// S-Input report from them and hands it to the sink. Tick and iteration
/// times are checked against their budgets but never enforced.
pub struct Dongle<'a, O, C> {
    store: &'a StateStore,
    acks: &'a AckChannel,
    output: O,
    clock: C,
    synth: ReportSynthesizer,
    scheduler: TickScheduler,
    latency: LatencyMonitor,
    last_status: Instant,
}

impl<'a, O: ReportSink, C: Clock> Dongle<'a, O, C> {
    pub fn new(store: &'a StateStore, acks: &'a AckChannel, output: O, clock: C) -> Self {
        Self {
            store,
            acks,
            output,
            clock,
            synth: ReportSynthesizer::new(),
            scheduler: TickScheduler::new(TICK_INTERVAL),
            latency: LatencyMonitor::new(TICK_BUDGET, ITERATION_BUDGET),
            last_status: Instant::from_ticks(0),
        }
    }

    /// Run the loop indefinitely.
    ///
    /// Send failures are logged and the loop carries on with the next tick.
    pub async fn run(&mut self) -> ! {
        loop {
            let _ = self.poll().await;
            Timer::after(LOOP_YIELD).await;
        }
    }

    /// One loop iteration: run a tick if one is due.
    ///
    /// Returns `Ok(true)` when a report was sent.
    pub async fn poll(&mut self) -> Result<bool, DongleError> {
        let start = self.clock.now();
        let result = if self.scheduler.poll(start) {
            self.tick(start).await.map(|()| true)
        } else {
            Ok(false)
        };
        self.latency
            .record_iteration(self.clock.now().saturating_duration_since(start));
        result
    }

    async fn tick(&mut self, now: Instant) -> Result<(), DongleError> {
        let left = self.store.take(Role::Left);
        let right = self.store.take(Role::Right);
        self.acks.note_tick(now);
        self.log_status(now);

        let report = *self.synth.synthesize(&left, &right);
        if !self.output.is_ready() {
            trace!("report skipped: sink not ready");
            self.latency
                .record_tick(self.clock.now().saturating_duration_since(now));
            return Err(DongleError::Output(OutputError::NotReady));
        }
        let sent = self.output.send(&report).await;

        self.latency
            .record_tick(self.clock.now().saturating_duration_since(now));
        sent.map_err(|e| {
            warn!("report send failed: {:?}", e);
            DongleError::Output(e)
        })
    }

    fn log_status(&mut self, now: Instant) {
        if now.saturating_duration_since(self.last_status) < STATUS_PERIOD {
            return;
        }
        self.last_status = now;
        let [left, right] = self.link_status(now);
        let stats = self.latency.stats();
        info!(
            "link: left stale={} right stale={} ticks={} overruns={}",
            left.stale,
            right.stale,
            stats.ticks,
            stats.tick_overruns
        );
        for status in [left, right] {
            let sample = status.sample;
            debug!(
                "{:?}: buttons={:#x} flags={:#x} stick=({},{}) trigger={} pad=({},{})",
                status.role,
                sample.buttons,
                sample.flags,
                sample.stick_x,
                sample.stick_y,
                sample.trigger,
                sample.pad_x,
                sample.pad_y
            );
        }
    }

    /// Staleness and last sample of both controllers, left first.
    ///
    /// Reading the status leaves the samples' freshness untouched.
    #[must_use]
    pub fn link_status(&self, now: Instant) -> [ControllerStatus; 2] {
        Role::ALL.map(|role| ControllerStatus {
            role,
            stale: self.store.is_stale(role, now, STALE_AFTER),
            sample: self.store.peek(role),
        })
    }

    #[must_use]
    pub fn synthesizer(&self) -> &ReportSynthesizer {
        &self.synth
    }

    #[must_use]
    pub fn latency(&self) -> LatencyStats {
        self.latency.stats()
    }

    /// Get a reference to the report sink.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Get a mutable reference to the report sink.
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }
}
