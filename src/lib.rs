//! Host-testable core of hippo-switch.
//!
//! Everything that decides what the game does lives here: debouncing,
//! double-tap detection, the mode, the servo state machines, LED feedback,
//! and the tuning protocol. None of it touches hardware directly; outputs
//! go through [`servo::ServoBank`], `smart_leds::SmartLedsWrite`, and
//! `embedded_hal::digital::OutputPin`.
//!
//! Usage: `cargo test` runs everything on the host.
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! and only adds the nRF52840 drivers and embassy tasks around this crate.

#![cfg_attr(not(test), no_std)]

// ═══════════════════════════════════════════════════════════════════════════
// Configuration & errors
// ═══════════════════════════════════════════════════════════════════════════

pub mod config;
pub mod error;

// ═══════════════════════════════════════════════════════════════════════════
// Input: switches and taps
// ═══════════════════════════════════════════════════════════════════════════

pub mod debounce;
pub mod tap;

// ═══════════════════════════════════════════════════════════════════════════
// Policy and outputs
// ═══════════════════════════════════════════════════════════════════════════

pub mod feedback;
pub mod mode;
pub mod servo;
pub mod tuning;

// ═══════════════════════════════════════════════════════════════════════════
// Control cycle
// ═══════════════════════════════════════════════════════════════════════════

pub mod controller;

pub use controller::{Controller, Event, Events};
pub use debounce::Level;
pub use error::Error;
pub use mode::Mode;
