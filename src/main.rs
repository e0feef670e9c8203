//! hippo-switch firmware for nRF52840.
//!
//! Four adaptive switches each drive one hippo's servo. Tasks:
//!
//! - `usb_task`     - runs the USB device stack
//! - `serial_task`  - moves tuning bytes in and diagnostic lines out
//! - `control_task` - the fixed-rate control cycle
//!
//! All game state lives in the control task's [`Controller`]; the other
//! tasks only exchange bytes with it through channels.

#![no_std]
#![no_main]

mod hw;
mod usb;

use core::fmt::Write as _;
use defmt::{info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Input, Level as PinLevel, Output, OutputDrive, Pull};
use embassy_nrf::pwm::{SequencePwm, SimplePwm};
use embassy_time::{with_timeout, Duration, Instant, Ticker};
use embassy_usb::class::cdc_acm::CdcAcmClass;
use embassy_usb::UsbDevice;
use hippo_switch::config::{TICK_MS, TRANSPORT_WAIT_MS};
use hippo_switch::{Controller, Error, Event};
use hw::servos::PwmServos;
use hw::switches::{ActiveLowLed, Switches};
use hw::ws2812::{self, Ws2812};
use usb::serial::{self, Line, UsbDriver};

use {defmt_rtt as _, panic_probe as _};

type Game = Controller<PwmServos<'static>, Ws2812<'static>, ActiveLowLed<'static>>;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("hippo-switch starting");

    // Switches (active-low, internal pull-up).
    let switches = Switches::new([
        Input::new(p.P0_11, Pull::Up),
        Input::new(p.P0_12, Pull::Up),
        Input::new(p.P0_24, Pull::Up),
        Input::new(p.P0_25, Pull::Up),
    ]);

    // Servos on PWM0, one channel each.
    let servos = PwmServos::new(SimplePwm::new_4ch(
        p.PWM0, p.P0_03, p.P0_04, p.P0_28, p.P0_29,
    ));

    // Feedback strip on PWM1.
    let strip = Ws2812::new(unwrap!(SequencePwm::new_1ch(
        p.PWM1,
        p.P1_05,
        ws2812::pwm_config()
    )));

    // Heartbeat on LED1 (active-low on the DK).
    let heartbeat = ActiveLowLed::new(Output::new(p.P0_13, PinLevel::High, OutputDrive::Standard));

    // Park the servos and paint the strip before anything can block.
    let mut game = Controller::new(servos, strip, heartbeat);
    let started = game.start(0);
    game.feedback_mut().strip_mut().flush().await;

    let usb = serial::init(p.USBD);
    unwrap!(spawner.spawn(usb_task(usb.device)));
    unwrap!(spawner.spawn(serial_task(usb.class)));

    // Give the host a bounded chance to open the port before announcing.
    let port_open = with_timeout(
        Duration::from_millis(TRANSPORT_WAIT_MS),
        serial::PORT_OPEN.wait(),
    )
    .await
    .is_ok();
    if !port_open {
        report(&Event::Error(Error::TransportUnavailable));
    }
    for event in started.iter() {
        report(event);
    }

    unwrap!(spawner.spawn(control_task(game, switches)));
}

#[embassy_executor::task]
async fn usb_task(device: UsbDevice<'static, UsbDriver>) -> ! {
    serial::run_usb_device(device).await
}

#[embassy_executor::task]
async fn serial_task(class: CdcAcmClass<'static, UsbDriver>) -> ! {
    serial::serial_task(class).await
}

#[embassy_executor::task]
async fn control_task(mut game: Game, switches: Switches<'static>) -> ! {
    let start = Instant::now();
    let mut ticker = Ticker::every(Duration::from_millis(TICK_MS));
    loop {
        ticker.next().await;
        let now_ms = start.elapsed().as_millis();

        while let Ok(packet) = serial::INBOUND.try_receive() {
            let dropped = game.feed_tuning(&packet);
            if dropped > 0 {
                warn!("Tuning: dropped {} bytes", dropped);
            }
        }

        let events = game.tick(now_ms, switches.sample());
        for event in events.iter() {
            report(event);
        }

        game.feedback_mut().strip_mut().flush().await;
    }
}

/// Log an event and echo it on the serial port if there is room.
fn report(event: &Event) {
    match event {
        Event::Error(_) => warn!("{}", event),
        _ => info!("{}", event),
    }

    let mut line = Line::new();
    if write!(line, "{}", event).is_ok() {
        // A full queue means nobody is reading; drop the line.
        let _ = serial::OUTBOUND.try_send(line);
    }
}
