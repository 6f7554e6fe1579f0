//! Panel button bitmask
//!
//! Panels report their eight buttons as one byte: bit 0 is S1, bit 7 is S8.
//! The mask is raw - no debouncing, no edge detection.

/// Number of buttons on a panel
pub const BUTTON_COUNT: u8 = 8;

/// Raw button state as reported by a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonMask(pub u8);

impl ButtonMask {
    /// No buttons pressed
    pub const NONE: ButtonMask = ButtonMask(0);

    /// Raw bits
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Check if a button is pressed (0-based index, 0 = S1)
    pub const fn is_pressed(self, index: u8) -> bool {
        index < BUTTON_COUNT && self.0 & (1 << index) != 0
    }

    /// Check if no button is pressed
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Buttons pressed now that were not pressed in `previous`
    pub const fn newly_pressed(self, previous: ButtonMask) -> ButtonMask {
        ButtonMask(self.0 & !previous.0)
    }

    /// Index of the lowest pressed button
    pub const fn first_pressed(self) -> Option<u8> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as u8)
        }
    }
}

impl From<u8> for ButtonMask {
    fn from(bits: u8) -> Self {
        ButtonMask(bits)
    }
}
