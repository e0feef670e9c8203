//! Hobby servos on the four channels of one PWM instance.
//!
//! Servos want a 50 Hz frame with a 0.5-2.5 ms pulse. The PWM counter
//! cannot run that slowly at full resolution, so it is prescaled to
//! 125 kHz (8 µs per tick) with a 2500-tick top value.

use embassy_nrf::peripherals::PWM0;
use embassy_nrf::pwm::{Prescaler, SimplePwm};
use hippo_switch::config::{SERVO_PERIOD_US, SERVO_TICK_US, SWITCH_COUNT};
use hippo_switch::servo::{pulse_ticks, Angle, ServoBank};

/// PWM counter top value for one servo frame.
const MAX_DUTY: u16 = (SERVO_PERIOD_US / SERVO_TICK_US) as u16;

/// Four servos driven from PWM0.
pub struct PwmServos<'d> {
    pwm: SimplePwm<'d, PWM0>,
}

impl<'d> PwmServos<'d> {
    pub fn new(mut pwm: SimplePwm<'d, PWM0>) -> Self {
        pwm.set_prescaler(Prescaler::Div128);
        pwm.set_max_duty(MAX_DUTY);
        Self { pwm }
    }
}

impl ServoBank for PwmServos<'_> {
    fn set_angle(&mut self, index: usize, angle: Angle) {
        if index >= SWITCH_COUNT {
            defmt::warn!("Servo: no channel {}", index);
            return;
        }
        // nRF PWM output is low until the compare value, so invert.
        self.pwm.set_duty(index, MAX_DUTY - pulse_ticks(angle));
    }
}
