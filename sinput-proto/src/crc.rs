//! CRC-8/SMBUS over radio-link frame headers and payloads.

use crc::{Crc, CRC_8_SMBUS};

const CRC8: Crc<u8> = Crc::<u8>::new(&CRC_8_SMBUS);

/// Calculate CRC-8 checksum of a byte slice.
#[inline]
#[must_use]
pub fn calculate_crc8(data: &[u8]) -> u8 {
    CRC8.checksum(data)
}

/// Checksum of one frame: role byte, length byte, then the payload.
#[must_use]
pub fn frame_crc(role: u8, payload: &[u8]) -> u8 {
    let mut digest = CRC8.digest();
    digest.update(&[role, payload.len() as u8]);
    digest.update(payload);
    digest.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc8_empty() {
        assert_eq!(calculate_crc8(&[]), 0x00);
    }

    #[test]
    fn test_frame_crc_covers_header() {
        let payload = [0x00, 0x80, 0xFD, 0x03, 0xF4, 0x01];
        let mut contiguous = [0u8; 8];
        contiguous[0] = 0x01;
        contiguous[1] = payload.len() as u8;
        contiguous[2..].copy_from_slice(&payload);

        assert_eq!(frame_crc(0x01, &payload), calculate_crc8(&contiguous));
        assert_ne!(frame_crc(0x01, &payload), frame_crc(0x00, &payload));
    }

    #[test]
    fn test_crc8_detects_single_bit_flip() {
        let frame = [0x01, 0x15, 0x40, 0x80, 0x03];
        let mut flipped = frame;
        flipped[2] ^= 0x01;
        assert_ne!(calculate_crc8(&frame), calculate_crc8(&flipped));
    }
}
