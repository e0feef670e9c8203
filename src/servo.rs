//! Servo actuation.
//!
//! Each piece has one actuator state machine:
//!
//! ```text
//!            press / FixedDuration              now >= close_at
//!   Closed ─────────────────────────> OpenTimed ───────────────> Closed
//!      │
//!      │     press / HoldToOpen                     release
//!      └──────────────────────────> OpenHeld ──────────────────> Closed
//! ```
//!
//! The mode is only consulted on a press from `Closed`. Once a piece is
//! open, its own state decides how it closes: a timed piece still closes at
//! its deadline after the mode flips to hold-to-open, and a held piece
//! still waits for release after the mode flips back. Releases are ignored
//! while timed, presses are ignored while open.

use crate::config::{SERVO_MAX_PULSE_US, SERVO_MIN_PULSE_US, SERVO_TICK_US};
use crate::error::Error;
use crate::mode::Mode;
use core::fmt;

/// A servo angle in whole degrees, always within 0..=180.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Angle(u8);

impl Angle {
    pub const MAX_DEGREES: u16 = 180;

    /// Validate `degrees` against the servo's 0..=180 range.
    pub const fn new(degrees: u16) -> Result<Self, Error> {
        if degrees > Self::MAX_DEGREES {
            Err(Error::AngleOutOfRange(degrees))
        } else {
            Ok(Self(degrees as u8))
        }
    }

    pub fn degrees(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which of the two shared endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Endpoint {
    Open,
    Closed,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Endpoint::Open => "open",
            Endpoint::Closed => "closed",
        })
    }
}

/// The open/closed endpoints shared by all four servos.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Angles {
    pub open: Angle,
    pub closed: Angle,
}

impl Angles {
    pub fn get(&self, endpoint: Endpoint) -> Angle {
        match endpoint {
            Endpoint::Open => self.open,
            Endpoint::Closed => self.closed,
        }
    }

    pub fn set(&mut self, endpoint: Endpoint, angle: Angle) {
        match endpoint {
            Endpoint::Open => self.open = angle,
            Endpoint::Closed => self.closed = angle,
        }
    }
}

/// Angle-command outputs, one per piece.
///
/// Implementations only issue the command; how fast the horn gets there is
/// up to the servo.
pub trait ServoBank {
    fn set_angle(&mut self, index: usize, angle: Angle);
}

/// Convert an angle to a PWM compare value in `SERVO_TICK_US` units.
pub fn pulse_ticks(angle: Angle) -> u16 {
    let span = SERVO_MAX_PULSE_US - SERVO_MIN_PULSE_US;
    let us = SERVO_MIN_PULSE_US + span * u32::from(angle.degrees()) / u32::from(Angle::MAX_DEGREES);
    (us / SERVO_TICK_US) as u16
}

/// Where an actuator is in its open/close cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorState {
    #[default]
    Closed,
    /// Opened under fixed-duration; closes at the deadline.
    OpenTimed { close_at_ms: u64 },
    /// Opened under hold-to-open; closes on release.
    OpenHeld,
}

/// Servo command produced by a state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Motion {
    Open,
    Close,
}

impl Motion {
    pub fn endpoint(self) -> Endpoint {
        match self {
            Motion::Open => Endpoint::Open,
            Motion::Close => Endpoint::Closed,
        }
    }
}

/// Open/close state machine for one servo.
#[derive(Clone, Copy, Debug, Default)]
pub struct Actuator {
    state: ActuatorState,
}

impl Actuator {
    pub const fn new() -> Self {
        Self {
            state: ActuatorState::Closed,
        }
    }

    pub fn state(&self) -> ActuatorState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != ActuatorState::Closed
    }

    /// Accepted press edge.
    pub fn press(&mut self, mode: Mode, now_ms: u64, open_ms: u64) -> Option<Motion> {
        if self.is_open() {
            return None;
        }
        self.state = match mode {
            Mode::FixedDuration => ActuatorState::OpenTimed {
                close_at_ms: now_ms.saturating_add(open_ms),
            },
            Mode::HoldToOpen => ActuatorState::OpenHeld,
        };
        Some(Motion::Open)
    }

    /// Accepted release edge.
    pub fn release(&mut self) -> Option<Motion> {
        match self.state {
            ActuatorState::OpenHeld => {
                self.state = ActuatorState::Closed;
                Some(Motion::Close)
            }
            _ => None,
        }
    }

    /// Auto-close check, run every tick.
    pub fn poll(&mut self, now_ms: u64) -> Option<Motion> {
        match self.state {
            ActuatorState::OpenTimed { close_at_ms } if now_ms >= close_at_ms => {
                self.state = ActuatorState::Closed;
                Some(Motion::Close)
            }
            _ => None,
        }
    }
}
