//! Application-wide constants and compile-time configuration.
//!
//! All pin assignments, timing parameters, and colors live here so they
//! can be tuned in one place. The only values that change at runtime are
//! the two servo endpoints (see [`crate::tuning`]), and those start from
//! the defaults below on every power-up.

use crate::servo::Angle;
use smart_leds::RGB8;

// Switches and pieces

/// Number of switch/servo/piece triples. Fixed by the board.
pub const SWITCH_COUNT: usize = 4;

/// A raw level must hold for longer than this before it is trusted (ms).
pub const DEBOUNCE_MS: u64 = 50;

/// Two accepted presses closer than this count as a double-tap (ms).
pub const DOUBLE_TAP_WINDOW_MS: u64 = 400;

/// Control loop period (ms).
pub const TICK_MS: u64 = 1;

// Servos

/// How long a piece stays open in fixed-duration mode (ms).
pub const SERVO_OPEN_MS: u64 = 1000;

/// Servo endpoint used when a piece is open, until retuned.
pub const DEFAULT_OPEN_ANGLE: Angle = match Angle::new(90) {
    Ok(angle) => angle,
    Err(_) => panic!("DEFAULT_OPEN_ANGLE out of range"),
};

/// Servo endpoint used when a piece is closed, until retuned.
pub const DEFAULT_CLOSED_ANGLE: Angle = match Angle::new(0) {
    Ok(angle) => angle,
    Err(_) => panic!("DEFAULT_CLOSED_ANGLE out of range"),
};

/// Hobby servo frame period (µs). 20 ms = 50 Hz.
pub const SERVO_PERIOD_US: u32 = 20_000;

/// Pulse width at 0° (µs).
pub const SERVO_MIN_PULSE_US: u32 = 500;

/// Pulse width at 180° (µs).
pub const SERVO_MAX_PULSE_US: u32 = 2_500;

/// PWM counter resolution after the Div128 prescaler (µs per tick).
/// 16 MHz / 128 = 125 kHz, so one tick is 8 µs and a 20 ms frame is
/// 2500 ticks.
pub const SERVO_TICK_US: u32 = 8;

// LED strip

/// Pixels on the strip: one per piece plus the mode status pixel.
pub const STRIP_LEN: usize = SWITCH_COUNT + 1;

/// Index of the pixel that shows the current mode.
pub const STATUS_PIXEL: usize = SWITCH_COUNT;

/// Global strip brightness (0-255), applied by the strip driver.
pub const LED_BRIGHTNESS: u8 = 64;

/// Piece colors, by switch index.
pub const PIECE_COLORS: [RGB8; SWITCH_COUNT] = [
    RGB8 { r: 160, g: 0, b: 255 }, // purple
    RGB8 { r: 255, g: 96, b: 0 },  // orange
    RGB8 { r: 0, g: 200, b: 0 },   // green
    RGB8 { r: 255, g: 200, b: 0 }, // yellow
];

/// Status pixel color in fixed-duration mode.
pub const FIXED_DURATION_COLOR: RGB8 = RGB8 { r: 0, g: 0, b: 255 };

/// Status pixel color in hold-to-open mode.
pub const HOLD_TO_OPEN_COLOR: RGB8 = RGB8 { r: 255, g: 0, b: 0 };

/// Color of an inactive piece pixel.
pub const OFF: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

// Heartbeat

/// Heartbeat blink period while every piece is closed (ms).
pub const HEARTBEAT_PERIOD_MS: u64 = 1000;

/// Portion of each heartbeat period the LED is lit (ms).
pub const HEARTBEAT_ON_MS: u64 = 100;

// Tuning / diagnostic serial port

/// How long startup waits for the host to open the serial port (ms).
pub const TRANSPORT_WAIT_MS: u64 = 3000;

/// Inbound tuning bytes buffered between control ticks.
pub const TUNING_QUEUE_LEN: usize = 64;

/// Events a single control tick can report.
pub const MAX_EVENTS_PER_TICK: usize = 16;

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0001;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "hippo-switch";
pub const USB_PRODUCT: &str = "Hippo Switch Controller";
pub const USB_SERIAL_NUMBER: &str = "000001";

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Switch 0..3     → P0.11, P0.12, P0.24, P0.25   (active-low, pull-up)
//   Servo 0..3      → P0.03, P0.04, P0.28, P0.29   (PWM0 ch0..3)
//   WS2812 data     → P1.05                         (PWM1)
//   Heartbeat LED   → P0.13                         (LED1, active-low)
