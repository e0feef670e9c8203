//! Unified error type for hippo-switch.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging and
//! `Display` for the human-readable diagnostics echoed on the serial port.
//!
//! None of these are fatal: every one is a local validation failure that
//! leaves the rest of the controller untouched.

use core::fmt;

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Tuning
    /// A tuning command was not `[OoCc][0-9][0-9]`. Carries the bytes received.
    MalformedCommand([u8; 3]),

    /// An angle fell outside 0..=180 degrees.
    AngleOutOfRange(u16),

    // Feedback
    /// A pixel index past the end of the strip.
    PixelOutOfRange(usize),

    /// The LED strip driver rejected a frame.
    Strip,

    /// The heartbeat LED pin rejected a write.
    Heartbeat,

    // Transport
    /// The diagnostic serial port never came up.
    TransportUnavailable,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedCommand(bytes) => {
                f.write_str("bad command \"")?;
                for &b in bytes {
                    if b.is_ascii_graphic() || b == b' ' {
                        write!(f, "{}", b as char)?;
                    } else {
                        write!(f, "\\x{:02x}", b)?;
                    }
                }
                f.write_str("\", expected O## or C##")
            }
            Error::AngleOutOfRange(deg) => write!(f, "angle {} out of range 0-180", deg),
            Error::PixelOutOfRange(index) => write!(f, "no pixel at index {}", index),
            Error::Strip => f.write_str("led strip write failed"),
            Error::Heartbeat => f.write_str("heartbeat led write failed"),
            Error::TransportUnavailable => f.write_str("serial port not opened"),
        }
    }
}
