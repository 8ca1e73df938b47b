//! In-memory doubles for the bus capabilities.
//!
//! [`SimPad`] models the pad's shift register: a latch pulse captures the
//! configured raw line levels, each clock-high pulse advances to the next
//! bit, and every line operation is recorded so tests can assert the exact
//! transition sequence. [`SimClock`] is a shared virtual microsecond counter
//! that advances instantly on `sleep`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use super::clock::Clock;
use super::line::{InputLine, OutputLine};

/// One observable line operation, in the order the driver performed it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineOp {
    LatchHigh,
    LatchLow,
    ClockHigh,
    ClockLow,
    /// The driver sampled the data line and saw this raw level.
    Sample(bool),
}

struct PadState {
    /// Raw data-line level per wire position, bit 0 presented first.
    levels: u16,
    shift: u16,
    /// Next wire position to present; 16 means the register is exhausted.
    cursor: usize,
    clock_high: bool,
    trace: Vec<LineOp>,
}

/// Simulated pad shared by its three line handles.
#[derive(Clone)]
pub struct SimPad {
    state: Rc<RefCell<PadState>>,
}

impl SimPad {
    /// A pad whose data line presents `levels` after each latch, bit 0 first.
    ///
    /// Levels are raw electrical state: a low bit is a pressed button under
    /// the active-low convention. Past the 16th bit the line floats high.
    pub fn new(levels: u16) -> Self {
        Self {
            state: Rc::new(RefCell::new(PadState {
                levels,
                shift: 0,
                cursor: 16,
                clock_high: false,
                trace: Vec::new(),
            })),
        }
    }

    /// Replaces the levels captured by the next latch pulse.
    pub fn set_levels(&self, levels: u16) {
        self.state.borrow_mut().levels = levels;
    }

    pub fn clock_level(&self) -> bool {
        self.state.borrow().clock_high
    }

    /// Drains the recorded line operations.
    pub fn take_trace(&self) -> Vec<LineOp> {
        std::mem::take(&mut self.state.borrow_mut().trace)
    }

    pub fn latch_line(&self) -> SimOutput {
        SimOutput {
            state: Rc::clone(&self.state),
            role: Role::Latch,
        }
    }

    pub fn clock_line(&self) -> SimOutput {
        SimOutput {
            state: Rc::clone(&self.state),
            role: Role::Clock,
        }
    }

    pub fn data_line(&self) -> SimInput {
        SimInput {
            state: Rc::clone(&self.state),
        }
    }
}

#[derive(Clone, Copy)]
enum Role {
    Latch,
    Clock,
}

/// Latch or clock line of a [`SimPad`].
pub struct SimOutput {
    state: Rc<RefCell<PadState>>,
    role: Role,
}

impl OutputLine for SimOutput {
    // Every write is recorded as a transition. The pad captures its levels
    // on latch-high and shifts one bit per clock-high; the driver idles the
    // real clock line high between fetches, which a live pad tolerates, so
    // the sim treats each clock-high write as the advance pulse rather than
    // requiring a strict low-to-high edge.
    fn write(&mut self, high: bool) {
        let mut state = self.state.borrow_mut();
        match self.role {
            Role::Latch => {
                if high {
                    state.trace.push(LineOp::LatchHigh);
                    state.shift = state.levels;
                    state.cursor = 0;
                } else {
                    state.trace.push(LineOp::LatchLow);
                }
            }
            Role::Clock => {
                if high {
                    state.trace.push(LineOp::ClockHigh);
                    if state.cursor < 16 {
                        state.cursor += 1;
                    }
                } else {
                    state.trace.push(LineOp::ClockLow);
                }
                state.clock_high = high;
            }
        }
    }
}

/// Data line of a [`SimPad`].
pub struct SimInput {
    state: Rc<RefCell<PadState>>,
}

impl InputLine for SimInput {
    fn read(&self) -> bool {
        let mut state = self.state.borrow_mut();
        let level = if state.cursor < 16 {
            (state.shift >> state.cursor) & 1 == 1
        } else {
            true
        };
        state.trace.push(LineOp::Sample(level));
        level
    }
}

/// Virtual clock; `sleep` advances the shared counter instantly.
#[derive(Clone)]
pub struct SimClock {
    micros: Rc<Cell<u64>>,
}

impl SimClock {
    pub fn new() -> Self {
        Self {
            micros: Rc::new(Cell::new(0)),
        }
    }

    /// Advances time without sleeping, for simulating consumer work.
    pub fn advance(&self, duration: Duration) {
        self.micros
            .set(self.micros.get() + duration.as_micros() as u64);
    }
}

impl Clock for SimClock {
    fn now(&self) -> Duration {
        Duration::from_micros(self.micros.get())
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}
