//! Decode errors for inbound wire data.

/// Error returned when inbound bytes do not form a valid message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Too few bytes for the message, or a length field that does not match.
    Length,
    /// Unexpected report ID.
    ReportId,
    /// Unsupported command ID in an output report.
    Command,
    /// Unsupported haptics type.
    HapticsType,
    /// Unknown controller role byte.
    Role,
    /// Frame checksum mismatch.
    Crc,
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Length => write!(f, "invalid length"),
            Self::ReportId => write!(f, "unexpected report id"),
            Self::Command => write!(f, "unsupported command"),
            Self::HapticsType => write!(f, "unsupported haptics type"),
            Self::Role => write!(f, "unknown controller role"),
            Self::Crc => write!(f, "checksum mismatch"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}
