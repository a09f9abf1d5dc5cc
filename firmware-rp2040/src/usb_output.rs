//! USB side of the dongle: the S-Input HID interface.

use dongle_core::{AckChannel, HapticsRelay, OutputError, ReportSink};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_usb::class::hid::{
    HidReader, HidReaderWriter, HidWriter, ReportId, RequestHandler, State,
};
use embassy_usb::control::OutResponse;
use embassy_usb::Builder;
use sinput_proto::{InputReport, COMMAND_REPORT_ID, OUTPUT_REPORT_ID, REPORT_SIZE};

/// Full-speed USB driver on the RP2040.
pub type UsbDriver = Driver<'static, USB>;

/// S-Input report descriptor.
///
/// Vendor-defined collection carrying three 63-byte reports behind their
/// IDs: input (0x01), command (0x02) and haptics output (0x03).
pub const REPORT_DESCRIPTOR: &[u8] = &[
    0x06, 0x00, 0xFF, // Usage Page (Vendor Defined 0xFF00)
    0x09, 0x01, //       Usage (0x01)
    0xA1, 0x01, //       Collection (Application)
    0x15, 0x00, //         Logical Minimum (0)
    0x26, 0xFF, 0x00, //   Logical Maximum (255)
    0x75, 0x08, //         Report Size (8)
    0x95, 0x3F, //         Report Count (63)
    //
    // --- Input report ---
    0x85, 0x01, //         Report ID (1)
    0x09, 0x02, //         Usage (0x02)
    0x81, 0x02, //         Input (Data, Variable, Absolute)
    //
    // --- Command report ---
    0x85, 0x02, //         Report ID (2)
    0x09, 0x03, //         Usage (0x03)
    0x91, 0x02, //         Output (Data, Variable, Absolute)
    //
    // --- Haptics output report ---
    0x85, 0x03, //         Report ID (3)
    0x09, 0x04, //         Usage (0x04)
    0x91, 0x02, //         Output (Data, Variable, Absolute)
    //
    0xC0, //             End Collection
];

/// S-Input report sink.
///
/// Wraps the embassy-usb HID writer.
pub struct UsbHidOutput<'d> {
    writer: HidWriter<'d, Driver<'d, USB>, REPORT_SIZE>,
    ready: bool,
}

impl<'d> UsbHidOutput<'d> {
    /// Create a new USB HID output from the given HID writer.
    pub fn new(writer: HidWriter<'d, Driver<'d, USB>, REPORT_SIZE>) -> Self {
        Self {
            writer,
            ready: false,
        }
    }

    /// Wait until the device is ready (USB enumerated).
    pub async fn wait_ready(&mut self) {
        self.writer.ready().await;
        self.ready = true;
    }
}

impl<'d> ReportSink for UsbHidOutput<'d> {
    async fn send(&mut self, report: &InputReport) -> Result<(), OutputError> {
        self.writer
            .write(&report.to_bytes())
            .await
            .map_err(|_| OutputError::Io)
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}

/// Receives host output reports and hands haptics to the radio side.
pub struct HapticsRequestHandler {
    relay: HapticsRelay<'static, AckChannel>,
}

impl HapticsRequestHandler {
    pub const fn new(acks: &'static AckChannel) -> Self {
        Self {
            relay: HapticsRelay::new(acks),
        }
    }
}

impl RequestHandler for HapticsRequestHandler {
    fn get_report(&mut self, _id: ReportId, _buf: &mut [u8]) -> Option<usize> {
        None
    }

    fn set_report(&mut self, id: ReportId, data: &[u8]) -> OutResponse {
        match id {
            ReportId::Out(OUTPUT_REPORT_ID) => {
                if let Err(e) = self.relay.handle_output_report(data) {
                    defmt::debug!("ignored output report: {}", e);
                }
            }
            ReportId::Out(COMMAND_REPORT_ID) => defmt::trace!("command report ignored"),
            _ => {}
        }
        OutResponse::Accepted
    }

    fn set_idle_ms(&mut self, _id: Option<ReportId>, _duration_ms: u32) {}

    fn get_idle_ms(&mut self, _id: Option<ReportId>) -> Option<u32> {
        None
    }
}

/// Configure the S-Input HID class in the USB builder.
///
/// Returns the reader for host output reports and the writer for input
/// reports.
pub fn configure_usb_hid<'d>(
    builder: &mut Builder<'d, Driver<'d, USB>>,
    state: &'d mut State<'d>,
) -> (
    HidReader<'d, Driver<'d, USB>, REPORT_SIZE>,
    HidWriter<'d, Driver<'d, USB>, REPORT_SIZE>,
) {
    let config = embassy_usb::class::hid::Config {
        report_descriptor: REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: 1,
        max_packet_size: REPORT_SIZE as u16,
        hid_subclass: embassy_usb::class::hid::HidSubclass::No,
        hid_boot_protocol: embassy_usb::class::hid::HidBootProtocol::None,
    };

    HidReaderWriter::<_, REPORT_SIZE, REPORT_SIZE>::new(builder, state, config).split()
}
