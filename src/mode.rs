//! Operating mode shared by every piece.

use crate::config::{FIXED_DURATION_COLOR, HOLD_TO_OPEN_COLOR};
use core::fmt;
use smart_leds::RGB8;

/// How a piece reacts to its switch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Opens on press and closes after a fixed time, whatever the switch does.
    #[default]
    FixedDuration,
    /// Opens on press and closes on release.
    HoldToOpen,
}

impl Mode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Mode::FixedDuration => Mode::HoldToOpen,
            Mode::HoldToOpen => Mode::FixedDuration,
        }
    }

    /// Color of the status pixel while this mode is active.
    pub fn color(self) -> RGB8 {
        match self {
            Mode::FixedDuration => FIXED_DURATION_COLOR,
            Mode::HoldToOpen => HOLD_TO_OPEN_COLOR,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::FixedDuration => "fixed-duration",
            Mode::HoldToOpen => "hold-to-open",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_fixed_duration() {
        assert_eq!(Mode::default(), Mode::FixedDuration);
    }

    #[test]
    fn toggle_flips_both_ways() {
        assert_eq!(Mode::FixedDuration.toggled(), Mode::HoldToOpen);
        assert_eq!(Mode::HoldToOpen.toggled(), Mode::FixedDuration);
    }

    #[test]
    fn modes_have_distinct_colors() {
        assert_ne!(Mode::FixedDuration.color(), Mode::HoldToOpen.color());
    }
}
