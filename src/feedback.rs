//! Visual feedback: the LED strip and the heartbeat LED.
//!
//! ## Strip layout
//!
//! ```text
//! pixel:  0        1        2        3        4
//!         piece 0  piece 1  piece 2  piece 3  mode status
//! ```
//!
//! A piece pixel shows that piece's color while it is open and is dark
//! while closed. The status pixel always shows the mode color. Writes go
//! to a frame buffer; nothing reaches the strip until [`Feedback::show`].
//!
//! ## Heartbeat
//!
//! Blinks `HEARTBEAT_ON_MS` out of every `HEARTBEAT_PERIOD_MS` while all
//! pieces are closed and stays solid while any piece is open. The blink
//! phase restarts when the last piece closes.

use crate::config::{OFF, PIECE_COLORS, STATUS_PIXEL, STRIP_LEN};
use crate::error::Error;
use crate::mode::Mode;
use embedded_hal::digital::{OutputPin, PinState};
use smart_leds::{SmartLedsWrite, RGB8};

/// Frame buffer in front of an addressable LED strip.
pub struct Feedback<S> {
    strip: S,
    frame: [RGB8; STRIP_LEN],
}

impl<S> Feedback<S>
where
    S: SmartLedsWrite<Color = RGB8>,
{
    /// Wrap a strip with every pixel dark. Nothing is written yet.
    pub fn new(strip: S) -> Self {
        Self {
            strip,
            frame: [OFF; STRIP_LEN],
        }
    }

    /// Stage a pixel color. Visible after the next [`show`](Self::show).
    pub fn set_pixel(&mut self, index: usize, color: RGB8) -> Result<(), Error> {
        let pixel = self
            .frame
            .get_mut(index)
            .ok_or(Error::PixelOutOfRange(index))?;
        *pixel = color;
        Ok(())
    }

    /// Push the whole frame to the strip.
    pub fn show(&mut self) -> Result<(), Error> {
        self.strip
            .write(self.frame.iter().copied())
            .map_err(|_| Error::Strip)
    }

    /// Light or darken a piece pixel and push the frame.
    pub fn set_active(&mut self, piece: usize, active: bool) -> Result<(), Error> {
        if piece >= PIECE_COLORS.len() {
            return Err(Error::PixelOutOfRange(piece));
        }
        let color = if active { PIECE_COLORS[piece] } else { OFF };
        self.set_pixel(piece, color)?;
        self.show()
    }

    /// Show `mode` on the status pixel and push the frame.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error> {
        self.set_pixel(STATUS_PIXEL, mode.color())?;
        self.show()
    }

    pub fn frame(&self) -> &[RGB8; STRIP_LEN] {
        &self.frame
    }

    pub fn strip(&self) -> &S {
        &self.strip
    }

    pub fn strip_mut(&mut self) -> &mut S {
        &mut self.strip
    }
}

/// Decide whether the heartbeat LED is lit.
///
/// `phase_ms` is the time since the blink schedule (re)started.
pub fn heartbeat_lit(any_open: bool, phase_ms: u64, period_ms: u64, on_ms: u64) -> bool {
    if any_open {
        return true;
    }
    if period_ms == 0 {
        return false;
    }
    phase_ms % period_ms < on_ms
}

/// Heartbeat LED driver.
pub struct Heartbeat<P> {
    pin: P,
    period_ms: u64,
    on_ms: u64,
    phase_start_ms: u64,
    held: bool,
    lit: Option<bool>,
}

impl<P: OutputPin> Heartbeat<P> {
    pub fn new(pin: P, period_ms: u64, on_ms: u64) -> Self {
        Self {
            pin,
            period_ms,
            on_ms,
            phase_start_ms: 0,
            held: false,
            lit: None,
        }
    }

    /// Advance the heartbeat to `now_ms`. The pin is only written on change;
    /// a failed write is retried on the next update.
    pub fn update(&mut self, now_ms: u64, any_open: bool) -> Result<(), Error> {
        if any_open {
            self.held = true;
        } else if self.held {
            self.held = false;
            self.phase_start_ms = now_ms;
        }

        let phase = now_ms.saturating_sub(self.phase_start_ms);
        let lit = heartbeat_lit(any_open, phase, self.period_ms, self.on_ms);
        if self.lit != Some(lit) {
            self.pin
                .set_state(PinState::from(lit))
                .map_err(|_| Error::Heartbeat)?;
            self.lit = Some(lit);
        }
        Ok(())
    }

    pub fn is_lit(&self) -> bool {
        self.lit.unwrap_or(false)
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }
}
