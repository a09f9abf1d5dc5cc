//! Controller sample as delivered by the radio link.

use crate::error::DecodeError;

/// Size of a packed controller sample on the link.
pub const SAMPLE_WIRE_SIZE: usize = 21;

/// Which physical controller a sample or ack belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    Left,
    Right,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Left, Role::Right];

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Role::Left => 0,
            Role::Right => 1,
        }
    }

    #[inline]
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        self.index() as u8
    }
}

impl TryFrom<u8> for Role {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Role::Left),
            1 => Ok(Role::Right),
            _ => Err(DecodeError::Role),
        }
    }
}

/// `flags` bits.
pub mod flags {
    pub const PADDLE_1: u8 = 0x01;
    pub const PADDLE_2: u8 = 0x02;
    pub const GUIDE: u8 = 0x40;
}

/// `buttons` bits as wired on the left controller.
pub mod left_buttons {
    pub const DPAD_UP: u8 = 0x01;
    pub const DPAD_LEFT: u8 = 0x02;
    pub const DPAD_RIGHT: u8 = 0x04;
    pub const DPAD_DOWN: u8 = 0x08;
    pub const SHOULDER: u8 = 0x10;
    pub const STICK: u8 = 0x20;
    pub const TOUCH_CLICK: u8 = 0x40;
    pub const SELECT: u8 = 0x80;
}

/// `buttons` bits as wired on the right controller.
pub mod right_buttons {
    pub const NORTH: u8 = 0x01;
    pub const WEST: u8 = 0x02;
    pub const EAST: u8 = 0x04;
    pub const SOUTH: u8 = 0x08;
    pub const SHOULDER: u8 = 0x10;
    pub const STICK: u8 = 0x20;
    pub const TOUCH_CLICK: u8 = 0x40;
    pub const START: u8 = 0x80;
}

/// One decoded snapshot of a controller.
///
/// The wire fields are followed by two fields the state store maintains:
/// `fresh` is set when a sample is published and cleared when the pipeline
/// consumes it, and `last_seen_ms` is the dongle uptime at reception.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerSample {
    pub flags: u8,
    pub trigger: u8,
    pub stick_x: i8,
    pub stick_y: i8,
    /// Touchpad axes, 0..=1023 on the device (0/0 means no touch).
    pub pad_x: i16,
    pub pad_y: i16,
    pub buttons: u8,
    pub accel_x: i16,
    pub accel_y: i16,
    pub accel_z: i16,
    pub gyro_x: i16,
    pub gyro_y: i16,
    pub gyro_z: i16,
    pub fresh: bool,
    pub last_seen_ms: u32,
}

impl ControllerSample {
    /// Sample with nothing received yet.
    pub const IDLE: Self = Self {
        flags: 0,
        trigger: 0,
        stick_x: 0,
        stick_y: 0,
        pad_x: 0,
        pad_y: 0,
        buttons: 0,
        accel_x: 0,
        accel_y: 0,
        accel_z: 0,
        gyro_x: 0,
        gyro_y: 0,
        gyro_z: 0,
        fresh: false,
        last_seen_ms: 0,
    };

    /// Decode the packed wire form. `fresh` and `last_seen_ms` are left unset.
    pub fn from_wire(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != SAMPLE_WIRE_SIZE {
            return Err(DecodeError::Length);
        }
        let i16_at = |at: usize| i16::from_le_bytes([bytes[at], bytes[at + 1]]);

        Ok(Self {
            flags: bytes[0],
            trigger: bytes[1],
            stick_x: bytes[2] as i8,
            stick_y: bytes[3] as i8,
            pad_x: i16_at(4),
            pad_y: i16_at(6),
            buttons: bytes[8],
            accel_x: i16_at(9),
            accel_y: i16_at(11),
            accel_z: i16_at(13),
            gyro_x: i16_at(15),
            gyro_y: i16_at(17),
            gyro_z: i16_at(19),
            ..Self::IDLE
        })
    }

    /// Encode to the packed wire form, as a controller would send it.
    #[must_use]
    pub fn to_wire(&self) -> [u8; SAMPLE_WIRE_SIZE] {
        let mut buf = [0u8; SAMPLE_WIRE_SIZE];
        buf[0] = self.flags;
        buf[1] = self.trigger;
        buf[2] = self.stick_x as u8;
        buf[3] = self.stick_y as u8;
        buf[4..6].copy_from_slice(&self.pad_x.to_le_bytes());
        buf[6..8].copy_from_slice(&self.pad_y.to_le_bytes());
        buf[8] = self.buttons;
        let imu = [
            self.accel_x,
            self.accel_y,
            self.accel_z,
            self.gyro_x,
            self.gyro_y,
            self.gyro_z,
        ];
        for (chunk, value) in buf[9..].chunks_exact_mut(2).zip(imu) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_packed_layout() {
        let mut wire = [0u8; SAMPLE_WIRE_SIZE];
        wire[0] = flags::GUIDE | flags::PADDLE_2;
        wire[1] = 200;
        wire[2] = 0xFD; // -3
        wire[3] = 0x7F;
        wire[4..6].copy_from_slice(&500i16.to_le_bytes());
        wire[6..8].copy_from_slice(&1023i16.to_le_bytes());
        wire[8] = right_buttons::SOUTH;
        wire[13..15].copy_from_slice(&(-16000i16).to_le_bytes());
        wire[19..21].copy_from_slice(&42i16.to_le_bytes());

        let sample = ControllerSample::from_wire(&wire).unwrap();
        assert_eq!(sample.flags, 0x42);
        assert_eq!(sample.trigger, 200);
        assert_eq!(sample.stick_x, -3);
        assert_eq!(sample.stick_y, 127);
        assert_eq!(sample.pad_x, 500);
        assert_eq!(sample.pad_y, 1023);
        assert_eq!(sample.buttons, 0x08);
        assert_eq!(sample.accel_z, -16000);
        assert_eq!(sample.gyro_z, 42);
        assert!(!sample.fresh);

        assert_eq!(sample.to_wire(), wire);
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        assert_eq!(
            ControllerSample::from_wire(&[0u8; 20]),
            Err(DecodeError::Length)
        );
    }

    #[test]
    fn test_role_bytes() {
        assert_eq!(Role::try_from(0), Ok(Role::Left));
        assert_eq!(Role::try_from(1), Ok(Role::Right));
        assert_eq!(Role::try_from(2), Err(DecodeError::Role));
        assert_eq!(Role::Right.to_byte(), 1);
    }
}
