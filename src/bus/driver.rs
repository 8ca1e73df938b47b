//! The fetch protocol: latch pulse, then 16 clocked bits.

use std::ops::Index;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::clock::Clock;
use super::line::{InputLine, OutputLine};
use super::BusTiming;

/// Physical button positions in shift-register order.
///
/// The pad shifts bits out most-significant first, so index 0 is the first
/// bit on the wire. Positions 12 through 15 exist on the wire but carry no
/// button in this layout; they stay index-only and have no variant here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum Button {
    B = 0,
    Y = 1,
    Select = 2,
    Start = 3,
    Up = 4,
    Down = 5,
    Left = 6,
    Right = 7,
    A = 8,
    X = 9,
    LeftShoulder = 10,
    RightShoulder = 11,
}

impl Button {
    /// All mapped buttons in wire order.
    pub const ALL: [Button; 12] = [
        Button::B,
        Button::Y,
        Button::Select,
        Button::Start,
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::A,
        Button::X,
        Button::LeftShoulder,
        Button::RightShoulder,
    ];

    /// Short label for diagnostic output.
    pub fn label(self) -> &'static str {
        match self {
            Button::B => "B",
            Button::Y => "Y",
            Button::Select => "SL",
            Button::Start => "ST",
            Button::Up => "U",
            Button::Down => "D",
            Button::Left => "L",
            Button::Right => "R",
            Button::A => "A",
            Button::X => "X",
            Button::LeftShoulder => "LP",
            Button::RightShoulder => "RP",
        }
    }
}

/// One complete snapshot of the pad: 16 booleans, true = pressed.
///
/// Produced fresh by every [`SnesBus::fetch`]; the driver keeps no history.
/// A consumer that wants edge detection has to diff consecutive vectors
/// itself. Indices 12 to 15 are always well-defined booleans but carry no
/// button in this layout and should be ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonVector([bool; 16]);

impl ButtonVector {
    pub const LEN: usize = 16;

    /// Whether a mapped button is pressed in this snapshot.
    pub fn pressed(&self, button: Button) -> bool {
        self.0[button as usize]
    }

    /// All 16 wire positions, including the reserved tail.
    pub fn raw(&self) -> &[bool; Self::LEN] {
        &self.0
    }

    fn set(&mut self, index: usize, pressed: bool) {
        self.0[index] = pressed;
    }
}

impl Index<usize> for ButtonVector {
    type Output = bool;

    fn index(&self, index: usize) -> &bool {
        &self.0[index]
    }
}

impl From<[bool; ButtonVector::LEN]> for ButtonVector {
    fn from(states: [bool; ButtonVector::LEN]) -> Self {
        Self(states)
    }
}

/// Driver for the pad's 3-wire synchronous serial bus.
///
/// Owns the latch and clock outputs, the data input and a [`Clock`] for the
/// protocol delays. Generic over the line and clock capabilities so the same
/// code runs against real GPIO and the in-memory doubles in tests.
pub struct SnesBus<O, I, C> {
    latch: O,
    clock: O,
    data: I,
    timing: BusTiming,
    clk: C,
}

impl<O: OutputLine, I: InputLine, C: Clock> SnesBus<O, I, C> {
    /// Takes ownership of the three lines and leaves the bus idle.
    ///
    /// The pad's shift register expects the clock line idle-high between
    /// fetch cycles, so the clock is driven high here before any fetch.
    pub fn new(latch: O, mut clock: O, data: I, timing: BusTiming, clk: C) -> Self {
        clock.write(true);
        Self {
            latch,
            clock,
            data,
            timing,
            clk,
        }
    }

    /// Reads one complete snapshot from the pad.
    ///
    /// Latches the pad's state, then clocks out 16 bits at the configured
    /// intervals, roughly 210 µs in total. The sequence must run as one
    /// uninterrupted critical section: the pad has no error signalling, so
    /// a delay injected mid-sequence yields garbage bits that look like any
    /// other read. The raw line is active-low; the stored boolean is the
    /// negated level, true when pressed.
    ///
    /// An unplugged pad leaves the data line floating and typically reads
    /// as all-pressed. That is indistinguishable in-band from someone
    /// mashing every button at once.
    pub fn fetch(&mut self) -> ButtonVector {
        let t = self.timing;

        self.latch.write(true);
        self.clk.sleep(t.latch_pulse);
        self.latch.write(false);

        self.clk.sleep(t.post_latch_settle);

        let mut pad = ButtonVector::default();
        for index in 0..ButtonVector::LEN {
            self.clk.sleep(t.pre_sample);
            pad.set(index, !self.data.read());
            self.clk.sleep(t.post_sample);
            self.clock.write(true);
            self.clk.sleep(t.clock_high);
            self.clock.write(false);
        }

        trace!("Fetched pad snapshot: {:?}", pad.raw());
        pad
    }
}
