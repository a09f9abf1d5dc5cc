//! Radio co-processor link over UART.
//!
//! The co-processor relays each controller's packets as CRC-8 framed
//! samples and transmits whatever ack frame the dongle writes back.
//!
//! # Pins
//!
//! Uses UART1:
//! - GPIO 8: TX (ack frames to the co-processor)
//! - GPIO 9: RX (sample frames from the co-processor)

use dongle_core::{AckChannel, StateStore};
use embassy_rp::uart::{Async, Error as UartError, Uart};
use embassy_time::Instant;
use sinput_proto::{encode_ack_frame, ControllerSample, FrameParser, LinkMessage, Role};

/// Link baud rate.
pub const BAUD_RATE: u32 = 1_000_000;

/// Error type for the radio link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum LinkError {
    /// UART framing error.
    Framing,
    /// UART receive overrun.
    Overrun,
    /// Other UART failure.
    Io,
}

#[inline]
fn uart_error_to_link_error(e: UartError) -> LinkError {
    match e {
        UartError::Framing => LinkError::Framing,
        UartError::Overrun => LinkError::Overrun,
        _ => LinkError::Io,
    }
}

/// Receiving end of the radio link.
///
/// Publishes every sample into the [`StateStore`] and answers it with an
/// ack built by the [`AckChannel`].
pub struct RadioLink<'d> {
    uart: Uart<'d, Async>,
    parser: FrameParser,
    store: &'d StateStore,
    acks: &'d AckChannel,
    frames: u32,
    rejected: u32,
}

impl<'d> RadioLink<'d> {
    #[must_use]
    pub fn new(uart: Uart<'d, Async>, store: &'d StateStore, acks: &'d AckChannel) -> Self {
        Self {
            uart,
            parser: FrameParser::new(),
            store,
            acks,
            frames: 0,
            rejected: 0,
        }
    }

    /// Serve the link forever.
    pub async fn run(&mut self) -> ! {
        loop {
            match self.receive().await {
                Ok((role, sample)) => {
                    if let Err(e) = self.handle_sample(role, sample).await {
                        defmt::warn!("ack write failed: {}", e);
                    }
                }
                Err(e) => {
                    defmt::warn!("link error: {}", e);
                    self.parser.reset();
                }
            }
        }
    }

    /// Read bytes until a complete sample frame arrives.
    ///
    /// Corrupt frames are dropped and the parser hunts for the next one.
    async fn receive(&mut self) -> Result<(Role, ControllerSample), LinkError> {
        let mut byte = [0u8; 1];

        loop {
            self.uart
                .read(&mut byte)
                .await
                .map_err(uart_error_to_link_error)?;

            match self.parser.push_byte(byte[0]) {
                Ok(Some(LinkMessage::Sample(role, sample))) => {
                    self.frames = self.frames.wrapping_add(1);
                    return Ok((role, sample));
                }
                Ok(Some(LinkMessage::Ack(role, _))) => {
                    defmt::trace!("unexpected inbound ack for {}", role);
                }
                Ok(None) => {}
                Err(e) => {
                    self.rejected = self.rejected.wrapping_add(1);
                    defmt::trace!("frame rejected: {}", e);
                }
            }
        }
    }

    async fn handle_sample(&mut self, role: Role, sample: ControllerSample) -> Result<(), LinkError> {
        let now = Instant::now();
        self.store.publish(role, sample, now);

        let ack = self.acks.next_ack(role, now).await;
        self.uart
            .write(&encode_ack_frame(role, &ack))
            .await
            .map_err(uart_error_to_link_error)
    }

    /// Valid sample frames received so far.
    #[must_use]
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Frames dropped for bad length, role or CRC.
    #[must_use]
    pub fn rejected(&self) -> u32 {
        self.rejected
    }
}
