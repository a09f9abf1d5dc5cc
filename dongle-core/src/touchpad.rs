//! Touchpad fusion: two physical surfaces, one virtual touchpad.
//!
//! The right controller's surface covers X 480..=959 of the virtual pad and
//! the left controller's covers X 0..=479; both span Y 0..=942. The axis
//! swaps and inversions below follow how the sensors sit in each shell.
//! When both surfaces are touched the right one drives the output.

use sinput_proto::{ControllerSample, Role, TouchPoint};

use crate::conditioning::{linear_map, low_pass};
use crate::config::{
    PAD_RAW_MAX, TOUCHPAD_ALPHA, TOUCH_CENTER, TOUCH_DEADZONE, TOUCH_LEFT_X, TOUCH_PRESSURE,
    TOUCH_RIGHT_X, TOUCH_SPAN, TOUCH_Y,
};

/// A surface reading mapped into virtual touchpad coordinates.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawTouch {
    pub x: u16,
    pub y: u16,
}

impl RawTouch {
    pub const NONE: Self = Self { x: 0, y: 0 };

    /// Map one controller's surface reading. A reading of exactly (0, 0)
    /// means no contact.
    #[must_use]
    pub fn from_sample(role: Role, sample: &ControllerSample) -> Self {
        if sample.pad_x == 0 && sample.pad_y == 0 {
            return Self::NONE;
        }
        let pad_x = i32::from(sample.pad_x);
        let pad_y = i32::from(sample.pad_y);

        let (x, y) = match role {
            Role::Right => (
                linear_map(pad_y, 0, PAD_RAW_MAX, TOUCH_RIGHT_X.0, TOUCH_RIGHT_X.1),
                linear_map(pad_x, 0, PAD_RAW_MAX, TOUCH_Y.1, TOUCH_Y.0),
            ),
            Role::Left => (
                linear_map(pad_y, 0, PAD_RAW_MAX, TOUCH_LEFT_X.1, TOUCH_LEFT_X.0),
                linear_map(pad_x, 0, PAD_RAW_MAX, TOUCH_Y.0, TOUCH_Y.1),
            ),
        };
        // Truncating casts keep out-of-range device readings on the same
        // coordinates the controllers were calibrated against.
        Self {
            x: x as u16,
            y: y as u16,
        }
    }

    /// Contact test on mapped coordinates; filters near-origin noise that
    /// survived the raw zero check.
    #[inline]
    #[must_use]
    pub const fn is_active(self) -> bool {
        self.x > TOUCH_DEADZONE || self.y > TOUCH_DEADZONE
    }

    /// Centered signed coordinates: `(raw - center) * 65535 / span`.
    #[must_use]
    pub fn centered(self) -> (i16, i16) {
        (
            center_axis(self.x, TOUCH_CENTER.0, TOUCH_SPAN.0),
            center_axis(self.y, TOUCH_CENTER.1, TOUCH_SPAN.1),
        )
    }
}

#[inline]
fn center_axis(raw: u16, center: i32, span: i32) -> i16 {
    let scaled = (i32::from(raw) - center) * 65535 / span;
    // Only the far right column (x = 959) exceeds i16::MAX
    scaled.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

/// Persistent touchpad state.
///
/// Keeps each controller's last mapped reading (a controller without fresh
/// data keeps its contact), the smoothed output and whether the previous
/// tick had a contact.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchpadFusion {
    raw: [RawTouch; 2],
    smoothed_x: i16,
    smoothed_y: i16,
    was_touching: bool,
}

impl TouchpadFusion {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            raw: [RawTouch::NONE; 2],
            smoothed_x: 0,
            smoothed_y: 0,
            was_touching: false,
        }
    }

    /// Record a fresh sample's surface reading.
    pub fn ingest(&mut self, role: Role, sample: &ControllerSample) {
        self.raw[role.index()] = RawTouch::from_sample(role, sample);
    }

    /// Last mapped reading of one surface.
    #[must_use]
    pub fn raw(&self, role: Role) -> RawTouch {
        self.raw[role.index()]
    }

    #[must_use]
    pub fn was_touching(&self) -> bool {
        self.was_touching
    }

    /// Surface driving the output this tick, if any.
    #[must_use]
    pub fn active_surface(&self) -> Option<RawTouch> {
        let right = self.raw(Role::Right);
        let left = self.raw(Role::Left);
        if right.is_active() {
            Some(right)
        } else if left.is_active() {
            Some(left)
        } else {
            None
        }
    }

    /// Advance one tick and produce the touchpad slot of the report.
    ///
    /// Touch-down snaps straight to the contact, movement is smoothed, and
    /// release drops to zero on the same tick.
    pub fn fuse(&mut self) -> TouchPoint {
        let Some(surface) = self.active_surface() else {
            self.smoothed_x = 0;
            self.smoothed_y = 0;
            self.was_touching = false;
            return TouchPoint::RELEASED;
        };

        let (target_x, target_y) = surface.centered();
        if self.was_touching {
            self.smoothed_x = low_pass(target_x, self.smoothed_x, TOUCHPAD_ALPHA);
            self.smoothed_y = low_pass(target_y, self.smoothed_y, TOUCHPAD_ALPHA);
        } else {
            self.smoothed_x = target_x;
            self.smoothed_y = target_y;
            self.was_touching = true;
        }

        TouchPoint {
            x: self.smoothed_x,
            y: self.smoothed_y,
            pressure: TOUCH_PRESSURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(pad_x: i16, pad_y: i16) -> ControllerSample {
        ControllerSample {
            pad_x,
            pad_y,
            fresh: true,
            ..ControllerSample::IDLE
        }
    }

    #[test]
    fn test_surface_mapping_per_role() {
        let s = touch(500, 500);
        assert_eq!(RawTouch::from_sample(Role::Left, &s), RawTouch { x: 245, y: 460 });
        // x = 500 * 479 / 1023 + 480 = 714, y = 500 * -942 / 1023 + 942 = 482
        assert_eq!(RawTouch::from_sample(Role::Right, &s), RawTouch { x: 714, y: 482 });
        assert_eq!(RawTouch::from_sample(Role::Right, &touch(0, 0)), RawTouch::NONE);
    }

    #[test]
    fn test_near_origin_mapping_is_not_a_touch() {
        // Left surface: pad_y = 1023 maps to x = 0 and pad_x = 5 to y = 4
        let raw = RawTouch::from_sample(Role::Left, &touch(5, 1023));
        assert_eq!(raw, RawTouch { x: 0, y: 4 });
        assert!(!raw.is_active());
    }

    #[test]
    fn test_centered_coordinates() {
        assert_eq!(RawTouch { x: 245, y: 460 }.centered(), (-15990, -765));
        assert_eq!(RawTouch { x: 479, y: 471 }.centered(), (0, 0));
        assert_eq!(RawTouch { x: 0, y: 942 }.centered(), (-32733, 32767));
        assert_eq!(RawTouch { x: 959, y: 0 }.centered(), (32767, -32767));
    }

    #[test]
    fn test_touch_down_snaps_without_lag() {
        let mut fusion = TouchpadFusion::new();
        fusion.ingest(Role::Left, &touch(500, 500));
        assert_eq!(
            fusion.fuse(),
            TouchPoint {
                x: -15990,
                y: -765,
                pressure: 255
            }
        );
        assert!(fusion.was_touching());
    }

    #[test]
    fn test_movement_is_smoothed() {
        let mut fusion = TouchpadFusion::new();
        fusion.ingest(Role::Right, &touch(500, 500));
        let first = fusion.fuse();

        fusion.ingest(Role::Right, &touch(200, 900));
        let second = fusion.fuse();
        let (target_x, target_y) = RawTouch::from_sample(Role::Right, &touch(200, 900)).centered();

        assert_eq!(second.x, low_pass(target_x, first.x, TOUCHPAD_ALPHA));
        assert_eq!(second.y, low_pass(target_y, first.y, TOUCHPAD_ALPHA));
        assert_ne!(second.x, target_x);
    }

    #[test]
    fn test_release_is_immediate() {
        let mut fusion = TouchpadFusion::new();
        fusion.ingest(Role::Right, &touch(900, 100));
        fusion.fuse();
        fusion.ingest(Role::Right, &touch(850, 150));
        assert_ne!(fusion.fuse(), TouchPoint::RELEASED);

        fusion.ingest(Role::Right, &touch(0, 0));
        assert_eq!(fusion.fuse(), TouchPoint::RELEASED);
        assert!(!fusion.was_touching());

        // Next contact snaps again rather than blending from zero
        fusion.ingest(Role::Right, &touch(300, 300));
        let (x, y) = RawTouch::from_sample(Role::Right, &touch(300, 300)).centered();
        assert_eq!(
            fusion.fuse(),
            TouchPoint {
                x,
                y,
                pressure: 255
            }
        );
    }

    #[test]
    fn test_right_surface_wins_simultaneous_touch() {
        let mut fusion = TouchpadFusion::new();
        fusion.ingest(Role::Left, &touch(100, 100));
        fusion.ingest(Role::Right, &touch(700, 400));
        let (x, y) = RawTouch::from_sample(Role::Right, &touch(700, 400)).centered();
        assert_eq!(
            fusion.fuse(),
            TouchPoint {
                x,
                y,
                pressure: 255
            }
        );
    }

    #[test]
    fn test_stale_surface_keeps_contact() {
        let mut fusion = TouchpadFusion::new();
        fusion.ingest(Role::Left, &touch(500, 500));
        let first = fusion.fuse();
        // No fresh data on the next tick: the last reading still holds
        let second = fusion.fuse();
        assert_eq!(first, second);
        assert_eq!(second.pressure, 255);
    }
}
