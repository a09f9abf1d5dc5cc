//! S-Input input report (ID `0x01`, 64 bytes).
//!
//! Byte layout, all multi-byte fields little-endian:
//!
//! ```text
//!  0      report id (0x01)
//!  1      plug status (bit 0: USB connected)
//!  2      charge percent
//!  3..7   buttons (see [`Buttons`])
//!  7..19  left x, left y, right x, right y, trigger l, trigger r (i16)
//! 19..23  IMU timestamp (u32, microseconds)
//! 23..35  accel x/y/z, gyro x/y/z (i16)
//! 35..47  touchpad 1 x/y/pressure, touchpad 2 x/y/pressure (i16)
//! 47..64  reserved
//! ```

use crate::buttons::Buttons;

/// Report ID of the S-Input gamepad input report.
pub const INPUT_REPORT_ID: u8 = 0x01;

/// Report ID of host command requests.
pub const COMMAND_REPORT_ID: u8 = 0x02;

/// Report ID of host output reports (haptics).
pub const OUTPUT_REPORT_ID: u8 = 0x03;

/// Size of every S-Input report on the wire.
pub const REPORT_SIZE: usize = 64;

/// Plug status bit: powered from USB.
pub const PLUG_USB_CONNECTED: u8 = 0x01;

/// Analog stick with X/Y axes, centered at 0.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogStick {
    pub x: i16,
    pub y: i16,
}

impl AnalogStick {
    pub const NEUTRAL: Self = Self { x: 0, y: 0 };

    #[must_use]
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

/// Three-axis IMU reading in report frame.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Axes3 {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl Axes3 {
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };

    #[must_use]
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }
}

/// One touchpad contact slot.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchPoint {
    pub x: i16,
    pub y: i16,
    pub pressure: i16,
}

impl TouchPoint {
    pub const RELEASED: Self = Self {
        x: 0,
        y: 0,
        pressure: 0,
    };
}

/// The S-Input gamepad input report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputReport {
    pub plug_status: u8,
    pub charge_percent: u8,
    pub buttons: Buttons,
    pub left_stick: AnalogStick,
    pub right_stick: AnalogStick,
    pub trigger_l: i16,
    pub trigger_r: i16,
    pub imu_timestamp_us: u32,
    pub accel: Axes3,
    pub gyro: Axes3,
    pub touchpad_1: TouchPoint,
    pub touchpad_2: TouchPoint,
}

impl InputReport {
    /// Report at power-up: USB powered, fully charged, all inputs at rest.
    ///
    /// Triggers start at 0 (half travel on the centered scale) until a
    /// controller delivers its first sample.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            plug_status: PLUG_USB_CONNECTED,
            charge_percent: 100,
            buttons: Buttons::NONE,
            left_stick: AnalogStick::NEUTRAL,
            right_stick: AnalogStick::NEUTRAL,
            trigger_l: 0,
            trigger_r: 0,
            imu_timestamp_us: 0,
            accel: Axes3::ZERO,
            gyro: Axes3::ZERO,
            touchpad_1: TouchPoint::RELEASED,
            touchpad_2: TouchPoint::RELEASED,
        }
    }

    /// Serialize to the 64-byte wire form.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; REPORT_SIZE] {
        let mut buf = [0u8; REPORT_SIZE];
        buf[0] = INPUT_REPORT_ID;
        buf[1] = self.plug_status;
        buf[2] = self.charge_percent;
        buf[3..7].copy_from_slice(&self.buttons.to_le_bytes());

        let words = [
            self.left_stick.x,
            self.left_stick.y,
            self.right_stick.x,
            self.right_stick.y,
            self.trigger_l,
            self.trigger_r,
        ];
        put_i16s(&mut buf[7..19], &words);

        buf[19..23].copy_from_slice(&self.imu_timestamp_us.to_le_bytes());

        let imu = [
            self.accel.x,
            self.accel.y,
            self.accel.z,
            self.gyro.x,
            self.gyro.y,
            self.gyro.z,
        ];
        put_i16s(&mut buf[23..35], &imu);

        let touch = [
            self.touchpad_1.x,
            self.touchpad_1.y,
            self.touchpad_1.pressure,
            self.touchpad_2.x,
            self.touchpad_2.y,
            self.touchpad_2.pressure,
        ];
        put_i16s(&mut buf[35..47], &touch);

        // 47..64 stays zero (reserved for command responses)
        buf
    }
}

impl Default for InputReport {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn put_i16s(dst: &mut [u8], values: &[i16]) {
    for (chunk, value) in dst.chunks_exact_mut(2).zip(values) {
        chunk.copy_from_slice(&value.to_le_bytes());
    }
}
