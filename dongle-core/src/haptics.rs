//! Haptics relay: host rumble commands to the radio link.
//!
//! Delivery is best effort. A command either lands in the transport's
//! outgoing slot, replacing whatever was there, or is dropped on the spot.

use sinput_proto::{DecodeError, HapticsCommand};

/// Error type for handing a command to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HapticsError {
    /// The outgoing slot is held by the transport right now.
    Busy,
}

/// Transport side of the haptics path.
///
/// Takes `&self` so the USB side can call it while the radio side holds its
/// own reference.
pub trait HapticsSink {
    /// Make `command` the levels sent with the next acknowledgments.
    fn set_haptics(&self, command: HapticsCommand) -> Result<(), HapticsError>;
}

/// Outcome of forwarding one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Delivery {
    Forwarded,
    Dropped,
}

/// Stateless forwarder between the USB haptics callback and the transport.
pub struct HapticsRelay<'a, S> {
    sink: &'a S,
}

impl<'a, S: HapticsSink> HapticsRelay<'a, S> {
    #[must_use]
    pub const fn new(sink: &'a S) -> Self {
        Self { sink }
    }

    /// Forward a decoded command.
    pub fn forward(&self, command: HapticsCommand) -> Delivery {
        match self.sink.set_haptics(command) {
            Ok(()) => Delivery::Forwarded,
            Err(HapticsError::Busy) => {
                trace!("haptics dropped: slot busy");
                Delivery::Dropped
            }
        }
    }

    /// Decode a host output report and forward the amplitudes it carries.
    pub fn handle_output_report(&self, report: &[u8]) -> Result<Delivery, DecodeError> {
        let command = HapticsCommand::from_output_report(report)?;
        Ok(self.forward(command))
    }
}
