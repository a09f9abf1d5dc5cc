//! Report sink trait and error types.

use core::future::Future;
use sinput_proto::InputReport;

/// Error type for report submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// USB/communication I/O error.
    Io,
    /// Device not ready (e.g., USB not enumerated).
    NotReady,
    /// Endpoint busy.
    Busy,
}

/// Async trait for the USB side of the dongle.
///
/// Implementations hand one complete report to the host transport.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait ReportSink {
    /// Submit a report.
    ///
    /// May wait until the previous report has left the endpoint.
    fn send(&mut self, report: &InputReport) -> impl Future<Output = Result<(), OutputError>>;

    /// Check if the sink is ready to accept reports.
    fn is_ready(&self) -> bool;
}
