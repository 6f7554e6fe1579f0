//! Fixed-width text frame sent to a panel
//!
//! Frame format (8 ASCII characters):
//! - PANEL ID (1 char): identifying character chosen per panel
//! - MODE (1 char): `d`, `f` or `b`
//! - VALUE (6 chars): signed decimal, zero-padded, right-aligned
//!
//! A minus sign takes one of the six value slots, so negative values keep
//! only five digits. Values outside `VALUE_MIN..=VALUE_MAX` are saturated to
//! the nearest bound; the frame never grows.

use crate::mode::DisplayMode;

/// Total frame length in characters
pub const FRAME_LEN: usize = 8;

/// Width of the numeric field
pub const VALUE_WIDTH: usize = 6;

/// Largest value the numeric field can show
pub const VALUE_MAX: i64 = 999_999;

/// Smallest value the numeric field can show
pub const VALUE_MIN: i64 = -99_999;

/// Replacement for panel ids that are not printable ASCII
pub const FALLBACK_PANEL_ID: char = '?';

/// Clamp a value into the printable range of the numeric field
pub const fn saturate(value: i64) -> i64 {
    if value > VALUE_MAX {
        VALUE_MAX
    } else if value < VALUE_MIN {
        VALUE_MIN
    } else {
        value
    }
}

/// Normalize a panel id to a single printable ASCII character
pub const fn sanitize_panel_id(id: char) -> char {
    if id.is_ascii_graphic() {
        id
    } else {
        FALLBACK_PANEL_ID
    }
}

/// A rendered panel frame
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    bytes: [u8; FRAME_LEN],
}

impl Frame {
    /// Build the frame for a panel, mode and value
    pub fn new(panel_id: char, mode: DisplayMode, value: i64) -> Self {
        Self::with_code(panel_id, mode.code(), value)
    }

    /// Build the frame for a raw mode selector
    ///
    /// Unknown selectors render with the backward character.
    pub fn for_selector(panel_id: char, selector: i32, value: i64) -> Self {
        Self::with_code(panel_id, DisplayMode::code_for_selector(selector), value)
    }

    fn with_code(panel_id: char, mode_code: char, value: i64) -> Self {
        let mut bytes = [b'0'; FRAME_LEN];
        // Both characters are ASCII: the id is sanitized, mode codes are fixed
        bytes[0] = sanitize_panel_id(panel_id) as u8;
        bytes[1] = mode_code as u8;

        let value = saturate(value);
        let mut magnitude = value.unsigned_abs();
        for slot in bytes[2..].iter_mut().rev() {
            *slot = b'0' + (magnitude % 10) as u8;
            magnitude /= 10;
        }
        if value < 0 {
            bytes[2] = b'-';
        }

        Self { bytes }
    }

    /// Raw frame bytes
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.bytes
    }

    /// Frame as text
    pub fn as_str(&self) -> &str {
        // Always ASCII by construction
        core::str::from_utf8(&self.bytes).unwrap_or("")
    }

    /// Panel id character
    pub fn panel_id(&self) -> char {
        self.bytes[0] as char
    }

    /// Mode character
    pub fn mode_code(&self) -> char {
        self.bytes[1] as char
    }

    /// The six-character numeric field
    pub fn value_field(&self) -> &str {
        &self.as_str()[2..]
    }
}

impl core::fmt::Debug for Frame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Frame({:?})", self.as_str())
    }
}

impl core::fmt::Display for Frame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Frame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Frame[{=str}]", self.as_str());
    }
}
