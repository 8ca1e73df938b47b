//! Fixed-period poll loop.
//!
//! Drives the bus driver and a consumer callback at the pad's native cadence,
//! one fetch per tick:
//!
//! ```text
//! SnesBus ──► PollScheduler ──► on_sample(ButtonVector)
//!             (~60.04 Hz)
//! ```
//!
//! The scheduler compensates for however long the fetch and the consumer
//! took, so the average period stays locked to the tick length. There is
//! exactly one flow of control: the consumer runs synchronously inside the
//! tick and the scheduler does not sleep until it returns.

use std::time::Duration;

use tracing::{debug, info};

use crate::bus::{ButtonVector, Clock, InputLine, OutputLine, SnesBus};

/// Ticks between periodic stats lines, about ten seconds at the default period.
const STATS_INTERVAL: u64 = 600;

/// Configuration for the poll loop.
#[derive(Clone, Copy, Debug)]
pub struct SchedulerSettings {
    /// Target tick length. The default of 16 666 µs (~60.04 Hz) matches the
    /// polling rate of the original console.
    pub tick_period: Duration,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_micros(16_666),
        }
    }
}

/// Fixed-period scheduler over a [`Clock`] capability.
pub struct PollScheduler<C: Clock> {
    settings: SchedulerSettings,
    clock: C,
    ticks: u64,
    overruns: u64,
}

impl<C: Clock> PollScheduler<C> {
    pub fn new(settings: SchedulerSettings, clock: C) -> Self {
        Self {
            settings,
            clock,
            ticks: 0,
            overruns: 0,
        }
    }

    /// Runs one tick: fetch, hand the snapshot to the consumer, then sleep
    /// off whatever is left of the tick budget.
    ///
    /// The sleep is never negative: a tick that runs over budget gets a zero
    /// sleep and the next tick simply starts late. No deficit is carried
    /// into future ticks.
    pub fn tick<O, I, B, F>(&mut self, bus: &mut SnesBus<O, I, B>, on_sample: F)
    where
        O: OutputLine,
        I: InputLine,
        B: Clock,
        F: FnOnce(ButtonVector),
    {
        let start = self.clock.now();
        let snapshot = bus.fetch();
        on_sample(snapshot);

        let elapsed = self.clock.now().saturating_sub(start);
        self.ticks += 1;

        let idle = self.settings.tick_period.saturating_sub(elapsed);
        if idle.is_zero() {
            self.overruns += 1;
            debug!("Tick {} over budget, took {:?}", self.ticks, elapsed);
        } else {
            self.clock.sleep(idle);
        }
    }

    /// Runs the poll loop for the lifetime of the process.
    ///
    /// There is no cancellation path; the loop ends only with the process.
    /// Test harnesses use [`PollScheduler::run_for`] instead.
    pub fn run<O, I, B, F>(mut self, bus: &mut SnesBus<O, I, B>, mut on_sample: F) -> !
    where
        O: OutputLine,
        I: InputLine,
        B: Clock,
        F: FnMut(ButtonVector),
    {
        info!(
            "Starting poll loop with tick period {:?}",
            self.settings.tick_period
        );
        loop {
            self.tick(bus, &mut on_sample);
            if self.ticks % STATS_INTERVAL == 0 {
                info!(
                    "Poll loop stats: {} ticks, {} over budget",
                    self.ticks, self.overruns
                );
            }
        }
    }

    /// Runs at most `max_ticks` iterations, then returns.
    pub fn run_for<O, I, B, F>(&mut self, bus: &mut SnesBus<O, I, B>, max_ticks: u64, mut on_sample: F)
    where
        O: OutputLine,
        I: InputLine,
        B: Clock,
        F: FnMut(ButtonVector),
    {
        for _ in 0..max_ticks {
            self.tick(bus, &mut on_sample);
        }
    }

    /// Ticks completed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Ticks whose fetch plus consumer ran past the budget.
    pub fn overruns(&self) -> u64 {
        self.overruns
    }
}
