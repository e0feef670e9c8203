//! Switch debouncing.
//!
//! Adaptive switches are wired active-low with a pull-up: idle reads
//! [`Level::High`], pressed reads [`Level::Low`].
//!
//! Each switch tracks two things separately:
//!
//! - the most recent raw level and when it last changed (the candidate),
//! - the accepted level the rest of the controller acts on.
//!
//! Chatter keeps resetting the change timestamp, so the candidate is only
//! promoted once it has held for longer than the settle time. A clean edge
//! is therefore reported exactly once, `DEBOUNCE_MS` after the input
//! settles.

/// Sampled electrical level of a switch input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// Active-low: a low level means the switch is pressed.
    pub fn is_pressed(self) -> bool {
        self == Level::Low
    }
}

/// An accepted transition of a debounced switch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Pressed,
    Released,
}

/// Debounce state for one switch.
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    settle_ms: u64,
    raw: Level,
    last_change_ms: u64,
    stable: Level,
}

impl Debouncer {
    /// A released switch, as seen at power-up.
    pub const fn new(settle_ms: u64) -> Self {
        Self {
            settle_ms,
            raw: Level::High,
            last_change_ms: 0,
            stable: Level::High,
        }
    }

    /// Feed one raw sample taken at `now_ms`.
    ///
    /// Returns the accepted edge, if this sample completes one. At most one
    /// edge is produced per call.
    pub fn sample(&mut self, raw: Level, now_ms: u64) -> Option<Edge> {
        if raw != self.raw {
            self.raw = raw;
            self.last_change_ms = now_ms;
        }

        if now_ms.saturating_sub(self.last_change_ms) > self.settle_ms && self.raw != self.stable {
            self.stable = self.raw;
            return Some(if self.stable.is_pressed() {
                Edge::Pressed
            } else {
                Edge::Released
            });
        }

        None
    }

    /// The accepted level.
    pub fn level(&self) -> Level {
        self.stable
    }

    pub fn is_pressed(&self) -> bool {
        self.stable.is_pressed()
    }
}
