//! Report synthesis: two controller samples in, one S-Input report out.
//!
//! The report is an accumulator. Each tick only the fields whose source
//! controller delivered a fresh sample are rewritten; everything else keeps
//! the previous tick's value. The guide and touchpad-click bits are shared
//! by both controllers and are cleared at the start of every tick before
//! either controller contributes. The touchpad slots are recomputed every tick.

use sinput_proto::sample::{flags, left_buttons, right_buttons};
use sinput_proto::{AnalogStick, Axes3, Buttons, ControllerSample, InputReport, Role, TouchPoint};

use crate::conditioning::{deadzone, low_pass};
use crate::config::{
    ACCEL_ALPHA, ACCEL_DIVISOR, GYRO_ALPHA, GYRO_SCALE, STICK_DEADZONE, TRIGGER_PRESSED_ABOVE,
};
use crate::touchpad::TouchpadFusion;

/// Buttons either controller may raise.
const SHARED_BUTTONS: Buttons = Buttons(Buttons::GUIDE.0 | Buttons::TOUCHPAD_1.0);

/// Filter memory carried from tick to tick.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FilterState {
    pub accel: Axes3,
    pub gyro: Axes3,
    pub touchpad: TouchpadFusion,
}

impl FilterState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            accel: Axes3::ZERO,
            gyro: Axes3::ZERO,
            touchpad: TouchpadFusion::new(),
        }
    }
}

/// Owns the persistent report and filter state.
pub struct ReportSynthesizer {
    report: InputReport,
    filters: FilterState,
}

impl ReportSynthesizer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            report: InputReport::new(),
            filters: FilterState::new(),
        }
    }

    /// The report as of the last tick.
    #[must_use]
    pub fn report(&self) -> &InputReport {
        &self.report
    }

    #[must_use]
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Run one tick of synthesis.
    pub fn synthesize(
        &mut self,
        left: &ControllerSample,
        right: &ControllerSample,
    ) -> &InputReport {
        self.report.buttons &= !SHARED_BUTTONS;

        if left.fresh {
            self.apply_left(left);
            self.filters.touchpad.ingest(Role::Left, left);
        }
        if right.fresh {
            self.apply_right(right);
            self.filters.touchpad.ingest(Role::Right, right);
        }

        self.report.touchpad_1 = self.filters.touchpad.fuse();
        self.report.touchpad_2 = TouchPoint::RELEASED;

        &self.report
    }

    fn apply_left(&mut self, sample: &ControllerSample) {
        let report = &mut self.report;
        report.left_stick = stick(sample);
        report.trigger_l = trigger_axis(sample.trigger);

        let b = sample.buttons;
        let buttons = &mut report.buttons;
        buttons.set(Buttons::DPAD_UP, b & left_buttons::DPAD_UP != 0);
        buttons.set(Buttons::DPAD_DOWN, b & left_buttons::DPAD_DOWN != 0);
        buttons.set(Buttons::DPAD_LEFT, b & left_buttons::DPAD_LEFT != 0);
        buttons.set(Buttons::DPAD_RIGHT, b & left_buttons::DPAD_RIGHT != 0);
        buttons.set(Buttons::L_SHOULDER, b & left_buttons::SHOULDER != 0);
        buttons.set(Buttons::L_TRIGGER, sample.trigger > TRIGGER_PRESSED_ABOVE);
        buttons.set(Buttons::STICK_LEFT, b & left_buttons::STICK != 0);
        buttons.set(Buttons::SELECT, b & left_buttons::SELECT != 0);
        buttons.set(Buttons::L_PADDLE_1, sample.flags & flags::PADDLE_1 != 0);
        buttons.set(Buttons::L_PADDLE_2, sample.flags & flags::PADDLE_2 != 0);

        if b & left_buttons::TOUCH_CLICK != 0 {
            *buttons |= Buttons::TOUCHPAD_1;
            debug!("left touchpad clicked");
        }
        if sample.flags & flags::GUIDE != 0 {
            *buttons |= Buttons::GUIDE;
        }
    }

    fn apply_right(&mut self, sample: &ControllerSample) {
        let report = &mut self.report;
        report.right_stick = stick(sample);
        report.trigger_r = trigger_axis(sample.trigger);

        let filters = &mut self.filters;
        filters.accel = Axes3::new(
            low_pass(sample.accel_x / ACCEL_DIVISOR, filters.accel.x, ACCEL_ALPHA),
            low_pass(sample.accel_z / ACCEL_DIVISOR, filters.accel.y, ACCEL_ALPHA),
            low_pass(sample.accel_y / ACCEL_DIVISOR, filters.accel.z, ACCEL_ALPHA),
        );
        // gyro x: pitch, y: yaw, z: roll in report frame
        filters.gyro = Axes3::new(
            low_pass(sample.gyro_x.wrapping_mul(-GYRO_SCALE), filters.gyro.x, GYRO_ALPHA),
            low_pass(sample.gyro_z.wrapping_mul(GYRO_SCALE), filters.gyro.y, GYRO_ALPHA),
            low_pass(sample.gyro_y.wrapping_mul(-GYRO_SCALE), filters.gyro.z, GYRO_ALPHA),
        );
        report.accel = filters.accel;
        report.gyro = filters.gyro;

        let b = sample.buttons;
        let buttons = &mut report.buttons;
        buttons.set(Buttons::NORTH, b & right_buttons::NORTH != 0);
        buttons.set(Buttons::WEST, b & right_buttons::WEST != 0);
        buttons.set(Buttons::EAST, b & right_buttons::EAST != 0);
        buttons.set(Buttons::SOUTH, b & right_buttons::SOUTH != 0);
        buttons.set(Buttons::R_SHOULDER, b & right_buttons::SHOULDER != 0);
        buttons.set(Buttons::R_TRIGGER, sample.trigger > TRIGGER_PRESSED_ABOVE);
        buttons.set(Buttons::STICK_RIGHT, b & right_buttons::STICK != 0);
        buttons.set(Buttons::START, b & right_buttons::START != 0);
        buttons.set(Buttons::R_PADDLE_1, sample.flags & flags::PADDLE_1 != 0);
        buttons.set(Buttons::R_PADDLE_2, sample.flags & flags::PADDLE_2 != 0);

        if b & right_buttons::TOUCH_CLICK != 0 {
            *buttons |= Buttons::TOUCHPAD_1;
            debug!("right touchpad clicked");
        }
        if sample.flags & flags::GUIDE != 0 {
            *buttons |= Buttons::GUIDE;
        }
    }
}

impl Default for ReportSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn stick(sample: &ControllerSample) -> AnalogStick {
    AnalogStick::new(
        deadzone(sample.stick_x, STICK_DEADZONE),
        deadzone(sample.stick_y, STICK_DEADZONE),
    )
}

/// 0..=255 onto the centered scale: 0 -> -32768, 128 -> 0, 255 -> 32512.
#[inline]
fn trigger_axis(raw: u8) -> i16 {
    (i16::from(raw) - 128) * 256
}
