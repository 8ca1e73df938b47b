//! Digital-line capabilities and their Raspberry Pi GPIO implementations.

use rppal::gpio::{Gpio, InputPin, OutputPin};
use tracing::debug;

use super::BusError;

/// A digital line the driver writes: latch and clock.
pub trait OutputLine {
    fn write(&mut self, high: bool);
}

/// A digital line the driver reads: the pad's serial data line.
pub trait InputLine {
    fn read(&self) -> bool;
}

/// Output line backed by a real GPIO pin.
pub struct GpioOutput {
    pin: OutputPin,
}

impl GpioOutput {
    /// Claims `pin` and configures it as an output driven low.
    pub fn claim(gpio: &Gpio, pin: u8) -> Result<Self, BusError> {
        let pin = gpio.get(pin)?.into_output_low();
        debug!("Claimed output line on BCM pin {}", pin.pin());
        Ok(Self { pin })
    }
}

impl OutputLine for GpioOutput {
    fn write(&mut self, high: bool) {
        if high {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }
}

/// Input line backed by a real GPIO pin.
pub struct GpioInput {
    pin: InputPin,
}

impl GpioInput {
    /// Claims `pin` and configures it as an input.
    pub fn claim(gpio: &Gpio, pin: u8) -> Result<Self, BusError> {
        let pin = gpio.get(pin)?.into_input();
        debug!("Claimed input line on BCM pin {}", pin.pin());
        Ok(Self { pin })
    }
}

impl InputLine for GpioInput {
    fn read(&self) -> bool {
        self.pin.is_high()
    }
}
