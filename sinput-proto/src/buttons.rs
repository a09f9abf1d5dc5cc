//! S-Input button bitfield.

use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

/// The four button bytes of the S-Input input report, as one little-endian `u32`.
///
/// Bit `n` lands in report byte `3 + n / 8`, bit `n % 8`.
///
/// # Example
///
/// ```
/// use sinput_proto::Buttons;
///
/// let buttons = Buttons::SOUTH | Buttons::GUIDE;
/// assert!(buttons.contains(Buttons::GUIDE));
/// assert_eq!(buttons.to_le_bytes(), [0x01, 0x00, 0x04, 0x00]);
/// ```
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Buttons(pub u32);

impl Buttons {
    // Byte 0
    pub const SOUTH: Self = Self(1 << 0);
    pub const EAST: Self = Self(1 << 1);
    pub const WEST: Self = Self(1 << 2);
    pub const NORTH: Self = Self(1 << 3);
    pub const DPAD_UP: Self = Self(1 << 4);
    pub const DPAD_DOWN: Self = Self(1 << 5);
    pub const DPAD_LEFT: Self = Self(1 << 6);
    pub const DPAD_RIGHT: Self = Self(1 << 7);

    // Byte 1
    pub const STICK_LEFT: Self = Self(1 << 8);
    pub const STICK_RIGHT: Self = Self(1 << 9);
    pub const L_SHOULDER: Self = Self(1 << 10);
    pub const R_SHOULDER: Self = Self(1 << 11);
    pub const L_TRIGGER: Self = Self(1 << 12);
    pub const R_TRIGGER: Self = Self(1 << 13);
    pub const L_PADDLE_1: Self = Self(1 << 14);
    pub const R_PADDLE_1: Self = Self(1 << 15);

    // Byte 2
    pub const START: Self = Self(1 << 16);
    pub const SELECT: Self = Self(1 << 17);
    pub const GUIDE: Self = Self(1 << 18);
    pub const CAPTURE: Self = Self(1 << 19);
    pub const L_PADDLE_2: Self = Self(1 << 20);
    pub const R_PADDLE_2: Self = Self(1 << 21);
    pub const TOUCHPAD_1: Self = Self(1 << 22);
    pub const TOUCHPAD_2: Self = Self(1 << 23);

    // Byte 3
    pub const POWER: Self = Self(1 << 24);
    pub const MISC_4: Self = Self(1 << 25);
    pub const MISC_5: Self = Self(1 << 26);
    pub const MISC_6: Self = Self(1 << 27);

    /// No buttons pressed.
    pub const NONE: Self = Self(0);

    /// Check if the given button(s) are pressed.
    #[inline]
    #[must_use]
    pub const fn contains(self, button: Buttons) -> bool {
        (self.0 & button.0) == button.0
    }

    /// Set or clear button(s).
    #[inline]
    pub fn set(&mut self, button: Buttons, pressed: bool) {
        if pressed {
            self.0 |= button.0;
        } else {
            self.0 &= !button.0;
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Report byte order (offsets 3..=6).
    #[inline]
    #[must_use]
    pub const fn to_le_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }
}

impl BitOr for Buttons {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Buttons {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Buttons {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for Buttons {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl Not for Buttons {
    type Output = Self;

    #[inline]
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}
