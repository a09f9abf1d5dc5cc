//! Wire formats for the dual-controller dongle.
//!
//! This crate covers every byte that crosses a boundary of the dongle:
//!
//! - **USB (S-Input)**
//!   - [`InputReport`] - the 64-byte gamepad report (ID `0x01`)
//!   - [`Buttons`] - its 32-bit button field
//!   - [`HapticsCommand`] - amplitudes decoded from host output reports (ID `0x03`)
//!
//! - **Radio link**
//!   - [`ControllerSample`] - a controller snapshot (21 bytes packed)
//!   - [`AckPayload`] - timing and rumble returned to a controller (8 bytes)
//!   - [`FrameParser`], [`encode_sample_frame`], [`encode_ack_frame`] -
//!     CRC-8 framing towards the radio co-processor
//!
//! # Example
//!
//! ```
//! use sinput_proto::{Buttons, InputReport, INPUT_REPORT_ID};
//!
//! let mut report = InputReport::new();
//! report.buttons |= Buttons::SOUTH;
//! report.trigger_r = 18432;
//!
//! let bytes = report.to_bytes();
//! assert_eq!(bytes[0], INPUT_REPORT_ID);
//! assert_eq!(bytes[3], 0x01);
//! assert_eq!(&bytes[17..19], &18432i16.to_le_bytes());
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod ack;
pub mod buttons;
pub mod crc;
pub mod error;
pub mod haptics;
pub mod link;
pub mod report;
pub mod sample;

pub use ack::{AckPayload, ACK_SIZE};
pub use buttons::Buttons;
pub use crc::{calculate_crc8, frame_crc};
pub use error::DecodeError;
pub use haptics::HapticsCommand;
pub use link::{
    encode_ack_frame, encode_sample_frame, FrameParser, LinkMessage, ACK_FRAME_SIZE,
    SAMPLE_FRAME_SIZE,
};
pub use report::{
    AnalogStick, Axes3, InputReport, TouchPoint, COMMAND_REPORT_ID, INPUT_REPORT_ID,
    OUTPUT_REPORT_ID, REPORT_SIZE,
};
pub use sample::{ControllerSample, Role, SAMPLE_WIRE_SIZE};
