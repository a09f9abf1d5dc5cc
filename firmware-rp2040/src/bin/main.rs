#![no_std]
#![no_main]

use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{UART1, USB};
use embassy_rp::uart::{Config as UartConfig, Uart};
use embassy_rp::usb::Driver;
use embassy_usb::class::hid::{HidReader, State};
use embassy_usb::{Builder, Config as UsbConfig};
use sinput_dongle_rp2040::radio_link::BAUD_RATE;
use sinput_dongle_rp2040::{
    configure_usb_hid, AckChannel, Dongle, HapticsRequestHandler, RadioLink, StateStore,
    SystemClock, UsbDriver, UsbHidOutput,
};
use sinput_proto::REPORT_SIZE;
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    UART1_IRQ => embassy_rp::uart::InterruptHandler<UART1>;
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

/// Latest sample per controller, written by the radio task.
static STORE: StaticCell<StateStore> = StaticCell::new();

/// Rumble slot and ack timing, shared by the haptics and radio tasks.
static ACKS: StaticCell<AckChannel> = StaticCell::new();

/// USB device configuration buffer.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// HID state.
static HID_STATE: StaticCell<State> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("S-Input dongle starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    let store: &'static StateStore = STORE.init(StateStore::new());
    let acks: &'static AckChannel = ACKS.init(AckChannel::new());

    // --- Radio link ---
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = BAUD_RATE;

    let uart = Uart::new(
        p.UART1,
        p.PIN_8, // TX
        p.PIN_9, // RX
        Irqs,
        p.DMA_CH0,
        p.DMA_CH1,
        uart_config,
    );
    let radio = RadioLink::new(uart, store, acks);

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(0x2E8A, 0x10C6);
    usb_config.manufacturer = Some("Rust Gamepad");
    usb_config.product = Some("Dual Controller Dongle");
    usb_config.serial_number = Some("001");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    let config_descriptor = CONFIG_DESCRIPTOR.init([0; 256]);
    let bos_descriptor = BOS_DESCRIPTOR.init([0; 256]);
    let msos_descriptor = MSOS_DESCRIPTOR.init([0; 256]);
    let control_buf = CONTROL_BUF.init([0; 64]);

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        config_descriptor,
        bos_descriptor,
        msos_descriptor,
        control_buf,
    );

    let hid_state = HID_STATE.init(State::new());
    let (hid_reader, hid_writer) = configure_usb_hid(&mut builder, hid_state);
    let usb_device = builder.build();
    let mut usb_output = UsbHidOutput::new(hid_writer);

    spawner.spawn(
        usb_task(usb_device).unwrap_or_else(|_| defmt::panic!("usb task already spawned")),
    );
    spawner.spawn(
        haptics_task(hid_reader, acks).unwrap_or_else(|_| defmt::panic!("haptics task already spawned")),
    );
    spawner.spawn(
        radio_task(radio).unwrap_or_else(|_| defmt::panic!("radio task already spawned")),
    );

    usb_output.wait_ready().await;
    info!("USB HID ready, reporting at 250 Hz");

    let mut dongle = Dongle::new(store, acks, usb_output, SystemClock);
    dongle.run().await
}

/// USB device task - runs the USB stack.
#[embassy_executor::task]
async fn usb_task(mut device: embassy_usb::UsbDevice<'static, UsbDriver>) {
    device.run().await;
}

/// Haptics task - decodes host output reports into the rumble slot.
#[embassy_executor::task]
async fn haptics_task(
    reader: HidReader<'static, UsbDriver, REPORT_SIZE>,
    acks: &'static AckChannel,
) {
    let mut handler = HapticsRequestHandler::new(acks);
    reader.run(true, &mut handler).await;
}

/// Radio task - receives samples and answers them with acks.
#[embassy_executor::task]
async fn radio_task(mut radio: RadioLink<'static>) {
    radio.run().await;
}
