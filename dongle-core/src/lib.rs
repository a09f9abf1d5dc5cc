//! Platform-agnostic signal fusion and report synthesis for the dongle.
//!
//! Two wireless controllers, one per hand, each stream [`ControllerSample`]s
//! to the dongle. This crate merges them into a single S-Input gamepad and
//! carries host rumble back the other way. Nothing here touches hardware;
//! the firmware plugs in a [`ReportSink`] and a [`HapticsSink`].
//!
//! # Overview
//!
//! - [`store`]: latest sample per controller ([`StateStore`])
//! - [`conditioning`]: deadzone, low-pass and range mapping
//! - [`touchpad`]: two surfaces fused into one virtual touchpad
//! - [`synth`]: one tick of report synthesis ([`ReportSynthesizer`])
//! - [`scheduler`]: tick cadence and latency budgets
//! - [`dongle`]: the report loop ([`Dongle`])
//! - [`haptics`]: host rumble relay ([`HapticsRelay`])
//! - [`ack`]: acknowledgments back to the controllers ([`AckChannel`])
//!
//! # Example
//!
//! ```rust
//! use dongle_core::ReportSynthesizer;
//! use sinput_proto::sample::right_buttons;
//! use sinput_proto::{Buttons, ControllerSample};
//!
//! let right = ControllerSample {
//!     buttons: right_buttons::SOUTH,
//!     trigger: 200,
//!     fresh: true,
//!     ..ControllerSample::IDLE
//! };
//!
//! let mut synth = ReportSynthesizer::new();
//! let report = synth.synthesize(&ControllerSample::IDLE, &right);
//! assert!(report.buttons.contains(Buttons::SOUTH | Buttons::R_TRIGGER));
//! assert_eq!(report.trigger_r, 18432);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Log through `defmt` (embedded)
//! - **`log`**: Log through the `log` facade (host)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod fmt;

pub mod ack;
pub mod conditioning;
pub mod config;
pub mod dongle;
pub mod haptics;
pub mod output;
pub mod scheduler;
pub mod store;
pub mod synth;
pub mod touchpad;

pub use ack::AckChannel;
pub use dongle::{Clock, ControllerStatus, Dongle, DongleError, SystemClock};
pub use haptics::{Delivery, HapticsError, HapticsRelay, HapticsSink};
pub use output::{OutputError, ReportSink};
pub use scheduler::{LatencyMonitor, LatencyStats, TickScheduler};
pub use store::StateStore;
pub use synth::{FilterState, ReportSynthesizer};
pub use touchpad::{RawTouch, TouchpadFusion};

pub use sinput_proto::{ControllerSample, HapticsCommand, InputReport, Role};
