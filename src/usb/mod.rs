//! USB Device subsystem - presents a CDC-ACM serial port to the host.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`. The single CDC-ACM interface carries the tuning
//! commands in and the diagnostic lines out.
//!
//! The serial task never touches controller state. It forwards received
//! bytes through [`serial::INBOUND`] and writes whatever lines show up on
//! [`serial::OUTBOUND`]; the control task only uses the non-blocking ends
//! of both channels.

pub mod serial;
