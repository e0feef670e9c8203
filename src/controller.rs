//! The control cycle.
//!
//! [`Controller`] owns every piece of runtime state: one [`Switch`] record
//! per piece, the shared [`Mode`], the tuned [`Angles`], and the output
//! drivers. The firmware calls [`Controller::tick`] at a fixed rate; each
//! call runs to completion without blocking:
//!
//! 1. debounce every switch, in index order, and act on accepted edges
//!    (tap detection first, then the servo rule under the current mode),
//! 2. auto-close any timed piece whose deadline has passed,
//! 3. apply at most one queued tuning command,
//! 4. update the heartbeat.
//!
//! Nothing here logs. Each tick returns the [`Event`]s it produced and the
//! caller decides where they go.

use crate::config::{
    DEBOUNCE_MS, DEFAULT_CLOSED_ANGLE, DEFAULT_OPEN_ANGLE, DOUBLE_TAP_WINDOW_MS,
    HEARTBEAT_ON_MS, HEARTBEAT_PERIOD_MS, MAX_EVENTS_PER_TICK, OFF, SERVO_OPEN_MS, SWITCH_COUNT,
};
use crate::debounce::{Debouncer, Edge, Level};
use crate::error::Error;
use crate::feedback::{Feedback, Heartbeat};
use crate::mode::Mode;
use crate::servo::{Actuator, ActuatorState, Angle, Angles, Endpoint, Motion, ServoBank};
use crate::tap::{self, TapCounter};
use crate::tuning::{Command, TuningChannel};
use core::fmt;
use embedded_hal::digital::OutputPin;
use smart_leds::{SmartLedsWrite, RGB8};

/// Everything the controller reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Startup finished.
    Ready { mode: Mode, angles: Angles },
    /// A double-tap on `switch` flipped the mode.
    ModeChanged { switch: usize, mode: Mode },
    Opened { piece: usize },
    Closed { piece: usize },
    /// A tuning command changed an endpoint.
    AngleSet { endpoint: Endpoint, angle: Angle },
    /// A recoverable error; nothing else was changed by it.
    Error(Error),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Ready { mode, angles } => write!(
                f,
                "ready: mode {}, open {}, closed {}",
                mode, angles.open, angles.closed
            ),
            Event::ModeChanged { switch, mode } => {
                write!(f, "switch {} double-tap: mode {}", switch, mode)
            }
            Event::Opened { piece } => write!(f, "piece {} open", piece),
            Event::Closed { piece } => write!(f, "piece {} closed", piece),
            Event::AngleSet { endpoint, angle } => write!(f, "{} angle = {}", endpoint, angle),
            Event::Error(e) => write!(f, "error: {}", e),
        }
    }
}

/// Events from one tick.
pub type Events = heapless::Vec<Event, MAX_EVENTS_PER_TICK>;

/// Per-piece record: the switch input and the servo it drives.
#[derive(Clone, Copy, Debug)]
pub struct Switch {
    pub debounce: Debouncer,
    pub taps: TapCounter,
    pub actuator: Actuator,
}

impl Switch {
    const fn new() -> Self {
        Self {
            debounce: Debouncer::new(DEBOUNCE_MS),
            taps: TapCounter::new(),
            actuator: Actuator::new(),
        }
    }
}

/// Game controller state and outputs.
pub struct Controller<B, S, P> {
    switches: [Switch; SWITCH_COUNT],
    mode: Mode,
    angles: Angles,
    servos: B,
    feedback: Feedback<S>,
    heartbeat: Heartbeat<P>,
    tuning: TuningChannel,
}

impl<B, S, P> Controller<B, S, P>
where
    B: ServoBank,
    S: SmartLedsWrite<Color = RGB8>,
    P: OutputPin,
{
    /// Build a controller around its outputs. Call [`start`](Self::start)
    /// before the first tick.
    pub fn new(servos: B, strip: S, heartbeat_pin: P) -> Self {
        Self {
            switches: [Switch::new(); SWITCH_COUNT],
            mode: Mode::default(),
            angles: Angles {
                open: DEFAULT_OPEN_ANGLE,
                closed: DEFAULT_CLOSED_ANGLE,
            },
            servos,
            feedback: Feedback::new(strip),
            heartbeat: Heartbeat::new(heartbeat_pin, HEARTBEAT_PERIOD_MS, HEARTBEAT_ON_MS),
            tuning: TuningChannel::new(),
        }
    }

    /// Park every servo closed, paint the strip, and announce readiness.
    pub fn start(&mut self, now_ms: u64) -> Events {
        let mut events = Events::new();

        for piece in 0..SWITCH_COUNT {
            self.servos.set_angle(piece, self.angles.closed);
            if let Err(e) = self.feedback.set_pixel(piece, OFF) {
                push(&mut events, Event::Error(e));
            }
        }
        if let Err(e) = self.feedback.set_mode(self.mode) {
            push(&mut events, Event::Error(e));
        }
        if let Err(e) = self.heartbeat.update(now_ms, false) {
            push(&mut events, Event::Error(e));
        }

        push(
            &mut events,
            Event::Ready {
                mode: self.mode,
                angles: self.angles,
            },
        );
        events
    }

    /// Queue bytes received on the tuning port. Returns how many were
    /// dropped.
    pub fn feed_tuning(&mut self, bytes: &[u8]) -> usize {
        self.tuning.feed(bytes)
    }

    /// Run one control cycle with the switch levels sampled at `now_ms`.
    pub fn tick(&mut self, now_ms: u64, levels: [Level; SWITCH_COUNT]) -> Events {
        let mut events = Events::new();

        for (index, &level) in levels.iter().enumerate() {
            match self.switches[index].debounce.sample(level, now_ms) {
                Some(Edge::Pressed) => self.on_press(index, now_ms, &mut events),
                Some(Edge::Released) => {
                    let motion = self.switches[index].actuator.release();
                    self.drive(index, motion, &mut events);
                }
                None => {}
            }
        }

        for index in 0..SWITCH_COUNT {
            let motion = self.switches[index].actuator.poll(now_ms);
            self.drive(index, motion, &mut events);
        }

        match self.tuning.poll() {
            Some(Ok(command)) => self.retune(command, &mut events),
            Some(Err(e)) => push(&mut events, Event::Error(e)),
            None => {}
        }

        if let Err(e) = self.heartbeat.update(now_ms, self.any_open()) {
            push(&mut events, Event::Error(e));
        }
        events
    }

    fn on_press(&mut self, index: usize, now_ms: u64, events: &mut Events) {
        if self.switches[index].taps.press(now_ms, DOUBLE_TAP_WINDOW_MS) {
            tap::arbitrate(self.switches.iter_mut().map(|s| &mut s.taps));
            self.toggle_mode(events);
            push(
                events,
                Event::ModeChanged {
                    switch: index,
                    mode: self.mode,
                },
            );
        }

        let motion = self.switches[index]
            .actuator
            .press(self.mode, now_ms, SERVO_OPEN_MS);
        self.drive(index, motion, events);
    }

    /// Flip the mode and repaint the status pixel. Open pieces are left as
    /// they are.
    fn toggle_mode(&mut self, events: &mut Events) {
        self.mode = self.mode.toggled();
        if let Err(e) = self.feedback.set_mode(self.mode) {
            push(events, Event::Error(e));
        }
    }

    fn drive(&mut self, piece: usize, motion: Option<Motion>, events: &mut Events) {
        let Some(motion) = motion else {
            return;
        };

        self.servos.set_angle(piece, self.angles.get(motion.endpoint()));
        if let Err(e) = self.feedback.set_active(piece, motion == Motion::Open) {
            push(events, Event::Error(e));
        }

        push(
            events,
            match motion {
                Motion::Open => Event::Opened { piece },
                Motion::Close => Event::Closed { piece },
            },
        );
    }

    /// Store a new endpoint and move every servo resting at it.
    fn retune(&mut self, command: Command, events: &mut Events) {
        self.angles.set(command.endpoint, command.angle);

        for (piece, switch) in self.switches.iter().enumerate() {
            let at_endpoint = match command.endpoint {
                Endpoint::Open => switch.actuator.is_open(),
                Endpoint::Closed => !switch.actuator.is_open(),
            };
            if at_endpoint {
                self.servos.set_angle(piece, command.angle);
            }
        }

        push(
            events,
            Event::AngleSet {
                endpoint: command.endpoint,
                angle: command.angle,
            },
        );
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn angles(&self) -> Angles {
        self.angles
    }

    pub fn actuator_state(&self, piece: usize) -> Option<ActuatorState> {
        self.switches.get(piece).map(|s| s.actuator.state())
    }

    pub fn tap_count(&self, switch: usize) -> Option<u8> {
        self.switches.get(switch).map(|s| s.taps.count())
    }

    pub fn any_open(&self) -> bool {
        self.switches.iter().any(|s| s.actuator.is_open())
    }

    pub fn servos(&self) -> &B {
        &self.servos
    }

    pub fn feedback(&self) -> &Feedback<S> {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut Feedback<S> {
        &mut self.feedback
    }

    pub fn heartbeat(&self) -> &Heartbeat<P> {
        &self.heartbeat
    }
}

fn push(events: &mut Events, event: Event) {
    // A full list only loses reporting; state has already changed.
    let _ = events.push(event);
}
