//! Bus driver for the SNES controller's 3-wire serial protocol.
//!
//! The controller plug looks like this:
//!
//! ```text
//!   -----------------        1: VCC       4: Data
//!  | 1 2 3 4 | 5 6 7 )       2: Clock     7: Ground
//!   -----------------        3: Latch
//! ```
//!
//! VCC goes to the 3V3 rail, Ground to any ground pin, and Clock/Latch/Data
//! to three GPIOs (no resistors needed). Pulsing the latch line tells the
//! pad to capture its button state into an internal shift register; each
//! clock pulse then exposes the next bit on the data line, active-low.
//!
//! # Architecture
//!
//! ```text
//! Controller ──► SnesBus::fetch ──► ButtonVector
//!                (latch + 16 clocked bits)
//! ```
//!
//! [`SnesBus`] is written entirely against the [`OutputLine`], [`InputLine`]
//! and [`Clock`] capabilities, so the whole bit sequence is unit-testable
//! against the in-memory doubles in `sim` without any hardware attached.
//! The pad offers no checksum or parity: a fetch that gets delayed
//! mid-sequence, or a pad that is unplugged, silently yields a wrong but
//! plausible-looking vector. That ambiguity is inherent to the protocol.

pub mod clock;
pub mod driver;
pub mod line;

#[cfg(test)]
pub mod sim;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use clock::{Clock, MonotonicClock};
pub use driver::{Button, ButtonVector, SnesBus};
pub use line::{GpioInput, GpioOutput, InputLine, OutputLine};

use std::time::Duration;

/// BCM pin assignment for the three controller lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusPins {
    pub latch: u8,
    pub clock: u8,
    pub data: u8,
}

impl Default for BusPins {
    fn default() -> Self {
        Self {
            latch: 15,
            clock: 14,
            data: 16,
        }
    }
}

/// Protocol timing constants. Immutable after init.
///
/// The defaults match the pad's shift-register timing; there is no margin
/// signalling on the bus, so shortening these corrupts reads with no way to
/// detect it from software.
#[derive(Clone, Copy, Debug)]
pub struct BusTiming {
    /// Width of the latch pulse that captures the button state.
    pub latch_pulse: Duration,
    /// Settle time after the latch falls, before the first bit is valid.
    pub post_latch_settle: Duration,
    /// Delay before sampling each bit, letting the data line stabilize.
    pub pre_sample: Duration,
    /// Delay between sampling and the next clock edge.
    pub post_sample: Duration,
    /// Clock-high hold; the pad advances its shift register on the rising edge.
    pub clock_high: Duration,
}

impl Default for BusTiming {
    fn default() -> Self {
        Self {
            latch_pulse: Duration::from_micros(12),
            post_latch_settle: Duration::from_micros(6),
            pre_sample: Duration::from_micros(3),
            post_sample: Duration::from_micros(3),
            clock_high: Duration::from_micros(6),
        }
    }
}

/// Errors that can occur while bringing up the bus.
///
/// There is deliberately no fetch-time variant: once the lines are claimed
/// the protocol has no in-band failure signalling, so every fetch "succeeds"
/// with whatever bits the lines carried.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// A GPIO line could not be claimed or configured. Fatal, no retry.
    #[error("failed to claim GPIO line: {0}")]
    HardwareInit(#[from] rppal::gpio::Error),
}

/// Claims the three GPIO lines and returns a bus ready to fetch.
pub fn open(
    pins: BusPins,
    timing: BusTiming,
) -> Result<SnesBus<GpioOutput, GpioInput, MonotonicClock>, BusError> {
    info!("Claiming controller lines: {:?}", pins);
    let gpio = rppal::gpio::Gpio::new()?;
    let latch = GpioOutput::claim(&gpio, pins.latch)?;
    let clock = GpioOutput::claim(&gpio, pins.clock)?;
    let data = GpioInput::claim(&gpio, pins.data)?;
    debug!("All controller lines claimed, timing: {:?}", timing);
    Ok(SnesBus::new(latch, clock, data, timing, MonotonicClock::new()))
}
