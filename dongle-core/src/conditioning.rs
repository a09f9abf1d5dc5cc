//! Signal conditioners: stick deadzone, single-pole low-pass, linear remap.
//!
//! All three are pure functions; callers own any state carried between ticks.

use fixed::types::I32F32;

/// Low-pass coefficient. Smaller values smooth more and lag more.
///
/// 32 fractional bits keep the quantization error of decimal alphas far
/// below the 1/50 margin the gyro and touchpad alphas leave around a
/// rounding boundary, across the whole `i16` range.
pub type Alpha = I32F32;

/// Snap small stick deflections to center and widen the rest to 16 bits.
///
/// Values strictly between `-threshold` and `threshold` return 0, everything
/// else returns `value * 256`.
#[inline]
#[must_use]
pub fn deadzone(value: i8, threshold: i8) -> i16 {
    let value = i16::from(value);
    let threshold = i16::from(threshold);
    if value > -threshold && value < threshold {
        0
    } else {
        value * 256
    }
}

/// Exponential smoothing: `round(alpha * new + (1 - alpha) * prev)`.
///
/// Rounds half away from zero; the result always lies between `new` and
/// `prev`. With `new == prev` the result is `prev`.
#[inline]
#[must_use]
pub fn low_pass(new: i16, prev: i16, alpha: Alpha) -> i16 {
    let new = Alpha::from_num(new);
    let prev = Alpha::from_num(prev);
    let blended = alpha * new + (Alpha::ONE - alpha) * prev;
    blended.round().saturating_to_num::<i16>()
}

/// Affine remap of `x` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// Integer arithmetic with division truncating toward zero, so reversed
/// output ranges and negative intermediates round the same way every time.
/// A degenerate input range maps everything to `out_min`.
#[inline]
#[must_use]
pub fn linear_map(x: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    let in_span = in_max - in_min;
    if in_span == 0 {
        return out_min;
    }
    (x - in_min) * (out_max - out_min) / in_span + out_min
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ACCEL_ALPHA, GYRO_ALPHA, STICK_DEADZONE, TOUCHPAD_ALPHA};

    #[test]
    fn test_deadzone_snaps_center_band() {
        for v in -4i8..=4 {
            assert_eq!(deadzone(v, STICK_DEADZONE), 0, "value {v}");
        }
    }

    #[test]
    fn test_deadzone_edges_pass_through() {
        assert_eq!(deadzone(5, STICK_DEADZONE), 1280);
        assert_eq!(deadzone(-5, STICK_DEADZONE), -1280);
    }

    #[test]
    fn test_deadzone_full_scale() {
        assert_eq!(deadzone(-128, STICK_DEADZONE), -128 * 256);
        assert_eq!(deadzone(127, STICK_DEADZONE), 127 * 256);
    }

    #[test]
    fn test_low_pass_fixed_point() {
        for alpha in [GYRO_ALPHA, ACCEL_ALPHA, TOUCHPAD_ALPHA, Alpha::ONE] {
            for v in [i16::MIN, -32733, -765, -1, 0, 1, 100, 18432, i16::MAX] {
                assert_eq!(low_pass(v, v, alpha), v);
            }
        }
    }

    #[test]
    fn test_low_pass_blends_and_rounds() {
        // 0.5 * 11 + 0.5 * 0 = 5.5 -> 6
        assert_eq!(low_pass(11, 0, ACCEL_ALPHA), 6);
        // 0.5 * -11 = -5.5 -> -6
        assert_eq!(low_pass(-11, 0, ACCEL_ALPHA), -6);
        // 0.2 * 1000 + 0.8 * 0 = 200
        assert_eq!(low_pass(1000, 0, TOUCHPAD_ALPHA), 200);
        // 0.08 * 1000 + 0.92 * 500 = 540
        assert_eq!(low_pass(1000, 500, GYRO_ALPHA), 540);
    }

    /// `round(num / den * new + (1 - num / den) * prev)` in exact integers.
    fn exact_low_pass(new: i16, prev: i16, num: i64, den: i64) -> i16 {
        let scaled = num * i64::from(new) + (den - num) * i64::from(prev);
        let magnitude = (2 * scaled.abs() + den) / (2 * den);
        (scaled.signum() * magnitude) as i16
    }

    #[test]
    fn test_low_pass_large_steps() {
        // -32768 + 0.08 * 11581 = -31841.52
        assert_eq!(low_pass(-21187, i16::MIN, GYRO_ALPHA), -31842);
        // 32767 - 0.2 * 65498 = 19667.4
        assert_eq!(low_pass(-32731, i16::MAX, TOUCHPAD_ALPHA), 19667);
        assert_eq!(low_pass(i16::MIN, i16::MAX, TOUCHPAD_ALPHA), 19660);
    }

    #[test]
    fn test_low_pass_matches_exact_blend_over_full_range() {
        let cases = [(GYRO_ALPHA, 8, 100), (ACCEL_ALPHA, 1, 2), (TOUCHPAD_ALPHA, 1, 5)];
        let grid = (i16::MIN..=i16::MAX).step_by(251).chain([i16::MAX]);
        for (alpha, num, den) in cases {
            for new in grid.clone() {
                for prev in grid.clone() {
                    assert_eq!(
                        low_pass(new, prev, alpha),
                        exact_low_pass(new, prev, num, den),
                        "new {new}, prev {prev}, alpha {num}/{den}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_low_pass_alpha_one_tracks_input() {
        assert_eq!(low_pass(-32768, 32767, Alpha::ONE), -32768);
        assert_eq!(low_pass(32767, -32768, Alpha::ONE), 32767);
    }

    #[test]
    fn test_linear_map_forward_and_reversed() {
        assert_eq!(linear_map(0, 0, 1023, 480, 959), 480);
        assert_eq!(linear_map(1023, 0, 1023, 480, 959), 959);
        assert_eq!(linear_map(0, 0, 1023, 942, 0), 942);
        assert_eq!(linear_map(1023, 0, 1023, 942, 0), 0);
        // 500 * -479 / 1023 = -234.1 -> -234 (toward zero), + 479
        assert_eq!(linear_map(500, 0, 1023, 479, 0), 245);
        assert_eq!(linear_map(500, 0, 1023, 0, 942), 460);
    }

    #[test]
    fn test_linear_map_degenerate_range() {
        assert_eq!(linear_map(7, 3, 3, -1, 1), -1);
    }
}
