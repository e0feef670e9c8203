//! WS2812 strip driven by a PWM sequence.
//!
//! Each bit is one 1.25 µs PWM period (20 ticks at 16 MHz); the duty
//! cycle encodes 0 or 1. A frame is 24 bits per pixel in GRB order,
//! followed by a low reset period.
//!
//! `write` only encodes the frame. The control task calls
//! [`Ws2812::flush`] after each tick to play it out, so the tick itself
//! never waits on the strip.

use core::convert::Infallible;
use embassy_nrf::peripherals::PWM1;
use embassy_nrf::pwm::{
    Config, Prescaler, SequenceConfig, SequenceLoad, SequencePwm, SingleSequenceMode,
    SingleSequencer,
};
use embassy_time::Timer;
use hippo_switch::config::{LED_BRIGHTNESS, STRIP_LEN};
use smart_leds::{brightness, SmartLedsWrite, RGB8};

const T1H: u16 = 0x8000 | 13; // 0.8 µs high
const T0H: u16 = 0x8000 | 7; // 0.4 µs high
const RES: u16 = 0x8000;

const BITS_PER_PIXEL: usize = 24;
const WORDS: usize = STRIP_LEN * BITS_PER_PIXEL + 1;

/// Time to clock out one frame plus the sequence end delay (µs).
const FRAME_US: u64 = (WORDS as u64 * 125) / 100 + 1000;

/// PWM config for WS2812 bit timing.
pub fn pwm_config() -> Config {
    let mut config = Config::default();
    config.sequence_load = SequenceLoad::Common;
    config.prescaler = Prescaler::Div1;
    config.max_duty = 20; // 1.25 µs at 16 MHz
    config
}

pub struct Ws2812<'d> {
    pwm: SequencePwm<'d, PWM1>,
    words: [u16; WORDS],
    pending: bool,
}

impl<'d> Ws2812<'d> {
    pub fn new(pwm: SequencePwm<'d, PWM1>) -> Self {
        Self {
            pwm,
            words: [RES; WORDS],
            pending: false,
        }
    }

    /// Play the last written frame, if it has not been sent yet.
    pub async fn flush(&mut self) {
        if !self.pending {
            return;
        }

        let mut seq_config = SequenceConfig::default();
        seq_config.end_delay = 799; // 50 µs latch after the trailing RES word

        let sequencer = SingleSequencer::new(&mut self.pwm, &self.words, seq_config);
        if sequencer.start(SingleSequenceMode::Times(1)).is_err() {
            defmt::warn!("WS2812: sequence start failed");
            return;
        }
        Timer::after_micros(FRAME_US).await;
        drop(sequencer);

        self.pending = false;
    }
}

impl SmartLedsWrite for Ws2812<'_> {
    type Error = Infallible;
    type Color = RGB8;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        let pixels = iterator.into_iter().map(Into::into).take(STRIP_LEN);
        for (index, color) in brightness(pixels, LED_BRIGHTNESS).enumerate() {
            let grb = (u32::from(color.g) << 16) | (u32::from(color.r) << 8) | u32::from(color.b);
            let word_base = index * BITS_PER_PIXEL;
            for bit in 0..BITS_PER_PIXEL {
                let set = grb & (1 << (BITS_PER_PIXEL - 1 - bit)) != 0;
                self.words[word_base + bit] = if set { T1H } else { T0H };
            }
        }
        self.pending = true;
        Ok(())
    }
}
