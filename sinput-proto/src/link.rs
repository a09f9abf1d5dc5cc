//! Framing between the dongle MCU and its radio co-processor.
//!
//! ```text
//! 0xA5 <role> <len> <payload: len bytes> <crc8>
//! ```
//!
//! The CRC-8/SMBUS covers `role`, `len` and the payload. A payload of
//! [`SAMPLE_WIRE_SIZE`] bytes is a controller sample travelling towards the
//! dongle; [`ACK_SIZE`] bytes is an ack payload travelling towards a controller.

use crate::ack::{AckPayload, ACK_SIZE};
use crate::crc::frame_crc;
use crate::error::DecodeError;
use crate::sample::{ControllerSample, Role, SAMPLE_WIRE_SIZE};

/// Frame start byte.
pub const FRAME_SYNC: u8 = 0xA5;

/// Largest payload a frame may carry.
pub const MAX_PAYLOAD: usize = 32;

/// Sync + role + len + crc.
const FRAME_OVERHEAD: usize = 4;

/// Encoded size of a sample frame.
pub const SAMPLE_FRAME_SIZE: usize = SAMPLE_WIRE_SIZE + FRAME_OVERHEAD;

/// Encoded size of an ack frame.
pub const ACK_FRAME_SIZE: usize = ACK_SIZE + FRAME_OVERHEAD;

/// A decoded link frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkMessage {
    Sample(Role, ControllerSample),
    Ack(Role, AckPayload),
}

/// Encode a controller sample frame.
#[must_use]
pub fn encode_sample_frame(role: Role, sample: &ControllerSample) -> [u8; SAMPLE_FRAME_SIZE] {
    let mut frame = [0u8; SAMPLE_FRAME_SIZE];
    write_frame(&mut frame, role, &sample.to_wire());
    frame
}

/// Encode an ack frame.
#[must_use]
pub fn encode_ack_frame(role: Role, ack: &AckPayload) -> [u8; ACK_FRAME_SIZE] {
    let mut frame = [0u8; ACK_FRAME_SIZE];
    write_frame(&mut frame, role, &ack.to_bytes());
    frame
}

fn write_frame(frame: &mut [u8], role: Role, payload: &[u8]) {
    let end = 3 + payload.len();
    frame[0] = FRAME_SYNC;
    frame[1] = role.to_byte();
    frame[2] = payload.len() as u8;
    frame[3..end].copy_from_slice(payload);
    frame[end] = frame_crc(frame[1], payload);
}

#[derive(Clone, Copy)]
enum ParserState {
    WaitingForSync,
    ReadingRole,
    ReadingLength,
    ReadingPayload,
    ReadingCrc,
}

/// Byte-at-a-time frame parser.
///
/// Errors reset the parser to hunt for the next sync byte, so a corrupted
/// frame costs at most that frame.
pub struct FrameParser {
    payload: [u8; MAX_PAYLOAD],
    role: u8,
    len: usize,
    pos: usize,
    state: ParserState,
}

impl FrameParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            payload: [0u8; MAX_PAYLOAD],
            role: 0,
            len: 0,
            pos: 0,
            state: ParserState::WaitingForSync,
        }
    }

    pub fn reset(&mut self) {
        self.pos = 0;
        self.len = 0;
        self.state = ParserState::WaitingForSync;
    }

    /// Feed a byte to the parser.
    ///
    /// Returns `Some(message)` once a complete, checksummed frame was parsed.
    pub fn push_byte(&mut self, byte: u8) -> Result<Option<LinkMessage>, DecodeError> {
        match self.state {
            ParserState::WaitingForSync => {
                if byte == FRAME_SYNC {
                    self.state = ParserState::ReadingRole;
                }
                Ok(None)
            }
            ParserState::ReadingRole => {
                self.role = byte;
                self.state = ParserState::ReadingLength;
                Ok(None)
            }
            ParserState::ReadingLength => {
                let len = byte as usize;
                if len == 0 || len > MAX_PAYLOAD {
                    self.reset();
                    return Err(DecodeError::Length);
                }
                self.len = len;
                self.pos = 0;
                self.state = ParserState::ReadingPayload;
                Ok(None)
            }
            ParserState::ReadingPayload => {
                self.payload[self.pos] = byte;
                self.pos += 1;
                if self.pos == self.len {
                    self.state = ParserState::ReadingCrc;
                }
                Ok(None)
            }
            ParserState::ReadingCrc => {
                let result = if frame_crc(self.role, &self.payload[..self.len]) == byte {
                    self.decode().map(Some)
                } else {
                    Err(DecodeError::Crc)
                };
                self.reset();
                result
            }
        }
    }

    fn decode(&self) -> Result<LinkMessage, DecodeError> {
        let role = Role::try_from(self.role)?;
        let payload = &self.payload[..self.len];
        match self.len {
            SAMPLE_WIRE_SIZE => Ok(LinkMessage::Sample(role, ControllerSample::from_wire(payload)?)),
            ACK_SIZE => Ok(LinkMessage::Ack(role, AckPayload::from_bytes(payload)?)),
            _ => Err(DecodeError::Length),
        }
    }
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(parser: &mut FrameParser, bytes: &[u8]) -> Option<Result<LinkMessage, DecodeError>> {
        let mut last = None;
        for &b in bytes {
            match parser.push_byte(b) {
                Ok(None) => {}
                Ok(Some(msg)) => last = Some(Ok(msg)),
                Err(e) => last = Some(Err(e)),
            }
        }
        last
    }

    #[test]
    fn test_sample_frame_after_line_noise() {
        let sample = ControllerSample {
            trigger: 200,
            stick_x: 3,
            stick_y: -3,
            ..ControllerSample::IDLE
        };
        let frame = encode_sample_frame(Role::Right, &sample);

        let mut parser = FrameParser::new();
        let mut stream = [0u8; SAMPLE_FRAME_SIZE + 3];
        stream[..3].copy_from_slice(&[0x00, 0x13, 0x37]);
        stream[3..].copy_from_slice(&frame);

        assert_eq!(
            feed(&mut parser, &stream),
            Some(Ok(LinkMessage::Sample(Role::Right, sample)))
        );
    }

    #[test]
    fn test_ack_frame() {
        let ack = AckPayload {
            next_delay_ms: 3,
            sequence_num: 9,
            left_rumble: 1,
            right_rumble: 2,
            dongle_timestamp: 1234,
        };
        let frame = encode_ack_frame(Role::Left, &ack);
        assert_eq!(frame[0], FRAME_SYNC);
        assert_eq!(frame[2], ACK_SIZE as u8);

        let mut parser = FrameParser::new();
        assert_eq!(
            feed(&mut parser, &frame),
            Some(Ok(LinkMessage::Ack(Role::Left, ack)))
        );
    }

    #[test]
    fn test_corrupt_frame_then_recovery() {
        let mut frame = encode_sample_frame(Role::Left, &ControllerSample::IDLE);
        frame[10] ^= 0xFF;

        let mut parser = FrameParser::new();
        assert_eq!(feed(&mut parser, &frame), Some(Err(DecodeError::Crc)));

        let good = encode_sample_frame(Role::Left, &ControllerSample::IDLE);
        assert_eq!(
            feed(&mut parser, &good),
            Some(Ok(LinkMessage::Sample(Role::Left, ControllerSample::IDLE)))
        );
    }

    #[test]
    fn test_rejects_oversized_length() {
        let mut parser = FrameParser::new();
        assert_eq!(
            feed(&mut parser, &[FRAME_SYNC, 0x00, 0xFF]),
            Some(Err(DecodeError::Length))
        );
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let mut frame = encode_ack_frame(Role::Left, &AckPayload::default());
        frame[1] = 7;
        let end = ACK_FRAME_SIZE - 1;
        frame[end] = frame_crc(7, &frame[3..end]);

        let mut parser = FrameParser::new();
        assert_eq!(feed(&mut parser, &frame), Some(Err(DecodeError::Role)));
    }
}
