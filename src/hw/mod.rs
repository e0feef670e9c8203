//! nRF52840 drivers behind the core crate's output traits.
//!
//! - [`servos`] - four hobby servos on PWM0 (`ServoBank`)
//! - [`ws2812`] - the feedback strip on PWM1 (`SmartLedsWrite`)
//! - [`switches`] - switch inputs and the heartbeat LED

pub mod servos;
pub mod switches;
pub mod ws2812;
