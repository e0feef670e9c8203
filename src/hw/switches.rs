//! Switch inputs and the heartbeat LED.
//!
//! Adaptive switches plug in as plain contacts to ground: inputs use the
//! internal pull-up, so idle reads high and a press reads low.

use core::convert::Infallible;
use embassy_nrf::gpio::{Input, Output};
use embedded_hal::digital::{ErrorType, OutputPin};
use hippo_switch::config::SWITCH_COUNT;
use hippo_switch::Level;

/// The four switch inputs, sampled together once per tick.
pub struct Switches<'d> {
    inputs: [Input<'d>; SWITCH_COUNT],
}

impl<'d> Switches<'d> {
    pub fn new(inputs: [Input<'d>; SWITCH_COUNT]) -> Self {
        Self { inputs }
    }

    pub fn sample(&self) -> [Level; SWITCH_COUNT] {
        self.inputs.each_ref().map(|input| {
            if input.is_low() {
                Level::Low
            } else {
                Level::High
            }
        })
    }
}

/// An LED wired between VDD and the pin: driving low lights it.
pub struct ActiveLowLed<'d> {
    pin: Output<'d>,
}

impl<'d> ActiveLowLed<'d> {
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin }
    }
}

impl ErrorType for ActiveLowLed<'_> {
    type Error = Infallible;
}

impl OutputPin for ActiveLowLed<'_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low();
        Ok(())
    }
}
