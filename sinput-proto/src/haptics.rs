//! Host haptics commands carried in S-Input output report `0x03`.
//!
//! ```text
//! 0  report id (0x03)
//! 1  command id (0x01 = haptics)
//! 2  haptics type
//! 3  type-specific payload
//! ```
//!
//! Type 1 (precise stereo) carries two frequency/amplitude pairs per side as
//! little-endian `u16`s. Type 2 (ERM stereo) carries one amplitude byte and one
//! brake byte per side. Both collapse to a pair of 8-bit amplitudes.

use crate::error::DecodeError;
use crate::report::OUTPUT_REPORT_ID;

/// Output report command ID for haptics.
pub const CMD_HAPTICS: u8 = 0x01;

/// Precise stereo haptics (frequency/amplitude pairs).
pub const HAPTICS_TYPE_PRECISE: u8 = 0x01;

/// ERM stereo haptics (amplitude + brake).
pub const HAPTICS_TYPE_ERM: u8 = 0x02;

const PRECISE_PAYLOAD_LEN: usize = 16;
const ERM_PAYLOAD_LEN: usize = 4;

/// Rumble amplitudes for both controllers.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HapticsCommand {
    pub left: u8,
    pub right: u8,
}

impl HapticsCommand {
    pub const OFF: Self = Self { left: 0, right: 0 };

    #[must_use]
    pub const fn new(left: u8, right: u8) -> Self {
        Self { left, right }
    }

    /// Decode a full output report, report ID included.
    pub fn from_output_report(report: &[u8]) -> Result<Self, DecodeError> {
        match report.split_first() {
            Some((&OUTPUT_REPORT_ID, command)) => Self::from_command(command),
            Some(_) => Err(DecodeError::ReportId),
            None => Err(DecodeError::Length),
        }
    }

    /// Decode an output report body starting at the command ID.
    pub fn from_command(command: &[u8]) -> Result<Self, DecodeError> {
        let (&command_id, rest) = command.split_first().ok_or(DecodeError::Length)?;
        if command_id != CMD_HAPTICS {
            return Err(DecodeError::Command);
        }
        let (&kind, payload) = rest.split_first().ok_or(DecodeError::Length)?;

        match kind {
            HAPTICS_TYPE_PRECISE => {
                if payload.len() < PRECISE_PAYLOAD_LEN {
                    return Err(DecodeError::Length);
                }
                Ok(Self {
                    left: precise_amplitude(&payload[0..8]),
                    right: precise_amplitude(&payload[8..16]),
                })
            }
            HAPTICS_TYPE_ERM => {
                if payload.len() < ERM_PAYLOAD_LEN {
                    return Err(DecodeError::Length);
                }
                // Brake bytes (1 and 3) have no counterpart on the controllers.
                Ok(Self {
                    left: payload[0],
                    right: payload[2],
                })
            }
            _ => Err(DecodeError::HapticsType),
        }
    }
}

/// Strongest of the two amplitudes in a `freq1, amp1, freq2, amp2` block,
/// reduced to 8 bits.
fn precise_amplitude(side: &[u8]) -> u8 {
    let amp_1 = u16::from_le_bytes([side[2], side[3]]);
    let amp_2 = u16::from_le_bytes([side[6], side[7]]);
    (amp_1.max(amp_2) >> 8) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erm_haptics() {
        let report = [0x03, 0x01, 0x02, 200, 1, 17, 0];
        assert_eq!(
            HapticsCommand::from_output_report(&report),
            Ok(HapticsCommand::new(200, 17))
        );
    }

    #[test]
    fn test_precise_haptics_takes_strongest_pair() {
        let mut report = [0u8; 19];
        report[..3].copy_from_slice(&[0x03, 0x01, 0x01]);
        // left: f1=160Hz a1=0x4000, f2=320Hz a2=0x8000
        report[3..11].copy_from_slice(&[0xA0, 0x00, 0x00, 0x40, 0x40, 0x01, 0x00, 0x80]);
        // right: a1=0xFFFF, a2=0
        report[11..19].copy_from_slice(&[0xA0, 0x00, 0xFF, 0xFF, 0x40, 0x01, 0x00, 0x00]);

        assert_eq!(
            HapticsCommand::from_output_report(&report),
            Ok(HapticsCommand::new(0x80, 0xFF))
        );
    }

    #[test]
    fn test_rejects_foreign_reports() {
        assert_eq!(
            HapticsCommand::from_output_report(&[0x02, 0x01, 0x02, 0, 0, 0, 0]),
            Err(DecodeError::ReportId)
        );
        assert_eq!(
            HapticsCommand::from_output_report(&[0x03, 0x05, 0x02, 0, 0, 0, 0]),
            Err(DecodeError::Command)
        );
        assert_eq!(
            HapticsCommand::from_output_report(&[0x03, 0x01, 0x09]),
            Err(DecodeError::HapticsType)
        );
        assert_eq!(
            HapticsCommand::from_output_report(&[0x03, 0x01, 0x02, 10]),
            Err(DecodeError::Length)
        );
        assert_eq!(HapticsCommand::from_output_report(&[]), Err(DecodeError::Length));
    }
}
