//! Build-time tuning and calibration constants.

use embassy_time::Duration;
use fixed_macro::fixed;

use crate::conditioning::Alpha;

/// Report cadence: 250 Hz.
pub const TICK_INTERVAL: Duration = Duration::from_millis(4);

/// Pause between loop iterations. Not a timing reference.
pub const LOOP_YIELD: Duration = Duration::from_micros(500);

/// Tick processing time above which an overrun is logged.
pub const TICK_BUDGET: Duration = Duration::from_millis(5);

/// Loop iteration time above which an overrun is logged.
pub const ITERATION_BUDGET: Duration = Duration::from_millis(10);

/// Period of the link status log line.
pub const STATUS_PERIOD: Duration = Duration::from_secs(1);

/// A controller with no sample for this long is reported as stale.
pub const STALE_AFTER: Duration = Duration::from_millis(100);

/// Stick values strictly inside (-5, 5) snap to center.
pub const STICK_DEADZONE: i8 = 5;

/// Trigger values above this set the digital trigger button.
pub const TRIGGER_PRESSED_ABOVE: u8 = 128;

pub const GYRO_ALPHA: Alpha = fixed!(0.08: I32F32);
pub const ACCEL_ALPHA: Alpha = fixed!(0.5: I32F32);
pub const TOUCHPAD_ALPHA: Alpha = fixed!(0.2: I32F32);

/// Raw accelerometer counts per report unit.
///
/// Empirical calibration of the current controller hardware, as is the axis
/// permutation applied with it. May need per-unit recalibration.
pub const ACCEL_DIVISOR: i16 = 800;

/// Gyro gain; the sign per axis encodes the IMU mounting.
pub const GYRO_SCALE: i16 = 5;

/// Device range of the touchpad axes.
pub const PAD_RAW_MAX: i32 = 1023;

/// Mapped touch coordinates at or below this on both axes count as no touch.
pub const TOUCH_DEADZONE: u16 = 10;

/// Virtual touchpad X range covered by the left controller.
pub const TOUCH_LEFT_X: (i32, i32) = (0, 479);

/// Virtual touchpad X range covered by the right controller.
pub const TOUCH_RIGHT_X: (i32, i32) = (480, 959);

/// Virtual touchpad Y range shared by both controllers.
pub const TOUCH_Y: (i32, i32) = (0, 942);

/// Center of the virtual touchpad.
pub const TOUCH_CENTER: (i32, i32) = (479, 471);

/// Span of the virtual touchpad.
pub const TOUCH_SPAN: (i32, i32) = (959, 942);

/// Pressure reported for an active contact.
pub const TOUCH_PRESSURE: i16 = 255;
