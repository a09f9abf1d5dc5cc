//! Dual-controller wireless dongle for RP2040.
//!
//! Presents two one-handed wireless controllers to the host as a single
//! S-Input USB gamepad.
//!
//! # Overview
//!
//! The firmware runs on a Raspberry Pi Pico (RP2040) and:
//! 1. Receives controller samples from a radio co-processor over UART
//! 2. Fuses both controllers into one S-Input report every 4 ms
//! 3. Sends the report over USB HID
//! 4. Relays host rumble back to the controllers inside link acks
//!
//! # Hardware Configuration
//!
//! | Function | GPIO | Description |
//! |----------|------|-------------|
//! | UART1 TX | 8    | Ack frames to the co-processor |
//! | UART1 RX | 9    | Sample frames from the co-processor |
//!
//! # Architecture
//!
//! The firmware uses the Embassy async runtime:
//!
//! - **USB Task**: Manages the USB device stack
//! - **Haptics Task**: Reads host output reports and updates the rumble slot
//! - **Radio Task**: Parses sample frames, publishes them and writes acks
//! - **Main Task**: Runs the report loop ([`dongle_core::Dongle`])
//!
//! The radio task and the report loop share a [`dongle_core::StateStore`];
//! the loop only ever sees the newest sample per controller.
//!
//! # Modules
//!
//! - [`radio_link`]: UART link to the co-processor ([`RadioLink`])
//! - [`usb_output`]: S-Input HID interface ([`UsbHidOutput`], [`HapticsRequestHandler`])
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)

#![no_std]

#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("Cannot enable both `dev-panic` and `prod-panic` features");

pub use dongle_core::{AckChannel, Dongle, StateStore, SystemClock};

pub mod radio_link;
pub mod usb_output;

pub use radio_link::{LinkError, RadioLink};
pub use usb_output::{configure_usb_hid, HapticsRequestHandler, UsbDriver, UsbHidOutput};
