//! USB CDC-ACM serial port for tuning commands and diagnostics.
//!
//! Initialises the Embassy USB stack on the nRF52840 hardware USB
//! peripheral and exposes one CDC-ACM interface.

use defmt::{info, warn};
use embassy_futures::select::select;
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_usb::class::cdc_acm::{CdcAcmClass, Receiver, Sender, State};
use embassy_usb::driver::EndpointError;
use embassy_usb::{Builder, Config, UsbDevice};
use hippo_switch::config;
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

/// Full-speed bulk endpoint size.
const MAX_PACKET_SIZE: u16 = 64;

/// One received USB packet.
pub type Packet = heapless::Vec<u8, { MAX_PACKET_SIZE as usize }>;

/// One outbound diagnostic line (without line ending).
pub type Line = heapless::String<64>;

pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;

static CDC_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Bytes from the host, consumed by the control task.
pub static INBOUND: Channel<CriticalSectionRawMutex, Packet, 4> = Channel::new();

/// Diagnostic lines for the host, produced by the control task.
pub static OUTBOUND: Channel<CriticalSectionRawMutex, Line, 8> = Channel::new();

/// Raised the first time the host opens the port.
pub static PORT_OPEN: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Build result containing the USB device runner and the serial class.
pub struct UsbSerial {
    pub device: UsbDevice<'static, UsbDriver>,
    pub class: CdcAcmClass<'static, UsbDriver>,
}

/// Initialise the USB stack and create the CDC-ACM device.
///
/// Must be called exactly once.  All static buffers are consumed here.
pub fn init(usbd: peripherals::USBD) -> UsbSerial {
    // Create the low-level USB driver with hardware VBUS detection.
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;

    // Allocate static descriptor buffers.
    let config_desc = USB_CONFIG_DESC.init([0u8; 256]);
    let bos_desc = USB_BOS_DESC.init([0u8; 256]);
    let msos_desc = USB_MSOS_DESC.init([0u8; 256]);
    let ctrl_buf = USB_CTRL_BUF.init([0u8; 64]);

    let mut builder = Builder::new(
        driver,
        usb_config,
        config_desc,
        bos_desc,
        msos_desc,
        ctrl_buf,
    );

    let state = CDC_STATE.init(State::new());
    let class = CdcAcmClass::new(&mut builder, state, MAX_PACKET_SIZE);

    let device = builder.build();

    info!("USB serial device initialised");

    UsbSerial { device, class }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}

/// Shuttle bytes between the host and the control task.
///
/// Each time the host opens the port both directions run until it goes
/// away, then we wait for the next connection.
pub async fn serial_task(class: CdcAcmClass<'static, UsbDriver>) -> ! {
    let (mut tx, mut rx) = class.split();

    loop {
        rx.wait_connection().await;
        info!("Serial: host connected");
        PORT_OPEN.signal(());

        select(read_loop(&mut rx), write_loop(&mut tx)).await;
        info!("Serial: host disconnected");
    }
}

async fn read_loop(rx: &mut Receiver<'static, UsbDriver>) -> EndpointError {
    let mut buf = [0u8; MAX_PACKET_SIZE as usize];
    loop {
        let n = match rx.read_packet(&mut buf).await {
            Ok(n) => n,
            Err(e) => return e,
        };
        // Capacity matches the packet size, so this never truncates.
        let packet = Packet::from_slice(&buf[..n]).unwrap_or_default();
        INBOUND.send(packet).await;
    }
}

async fn write_loop(tx: &mut Sender<'static, UsbDriver>) -> EndpointError {
    loop {
        let line = OUTBOUND.receive().await;
        for chunk in line.as_bytes().chunks(MAX_PACKET_SIZE as usize) {
            if let Err(e) = tx.write_packet(chunk).await {
                warn!("Serial: write failed");
                return e;
            }
        }
        if let Err(e) = tx.write_packet(b"\r\n").await {
            return e;
        }
    }
}
