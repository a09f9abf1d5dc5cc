//! Ack timing payload returned to a controller on each radio exchange.

use crate::error::DecodeError;

/// Size of the ack payload on the link.
pub const ACK_SIZE: usize = 8;

/// Timing and rumble data piggybacked on the link acknowledgment.
///
/// ```text
/// 0..2  next_delay_ms    (u16) wait before the next transmission
/// 2     sequence_num     (u8)  per-controller counter
/// 3     left_rumble      (u8)
/// 4     right_rumble     (u8)
/// 5     reserved
/// 6..8  dongle_timestamp (u16) dongle uptime in ms, truncated
/// ```
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AckPayload {
    pub next_delay_ms: u16,
    pub sequence_num: u8,
    pub left_rumble: u8,
    pub right_rumble: u8,
    pub dongle_timestamp: u16,
}

impl AckPayload {
    #[must_use]
    pub fn to_bytes(&self) -> [u8; ACK_SIZE] {
        let delay = self.next_delay_ms.to_le_bytes();
        let stamp = self.dongle_timestamp.to_le_bytes();
        [
            delay[0],
            delay[1],
            self.sequence_num,
            self.left_rumble,
            self.right_rumble,
            0,
            stamp[0],
            stamp[1],
        ]
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != ACK_SIZE {
            return Err(DecodeError::Length);
        }
        Ok(Self {
            next_delay_ms: u16::from_le_bytes([bytes[0], bytes[1]]),
            sequence_num: bytes[2],
            left_rumble: bytes[3],
            right_rumble: bytes[4],
            dongle_timestamp: u16::from_le_bytes([bytes[6], bytes[7]]),
        })
    }
}
