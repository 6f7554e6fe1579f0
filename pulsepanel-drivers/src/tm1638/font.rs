//! Seven-segment font
//!
//! Bit 0 is segment A, bit 6 is segment G, bit 7 the decimal point.
//! Letters without a readable seven-segment form render blank.

/// Decimal point segment
pub const SEG_DP: u8 = 0x80;

/// Segment pattern for an ASCII character
pub const fn segments(c: u8) -> u8 {
    match c {
        b'0' | b'O' => 0x3F,
        b'1' => 0x06,
        b'2' => 0x5B,
        b'3' => 0x4F,
        b'4' => 0x66,
        b'5' | b'S' | b's' => 0x6D,
        b'6' => 0x7D,
        b'7' => 0x07,
        b'8' => 0x7F,
        b'9' => 0x6F,
        b'-' => 0x40,
        b'_' => 0x08,
        b'=' => 0x48,
        b'?' => 0x53,
        b'A' | b'a' => 0x77,
        b'B' | b'b' => 0x7C,
        b'C' => 0x39,
        b'c' => 0x58,
        b'D' | b'd' => 0x5E,
        b'E' | b'e' => 0x79,
        b'F' | b'f' => 0x71,
        b'G' | b'g' => 0x3D,
        b'H' => 0x76,
        b'h' => 0x74,
        b'I' => 0x30,
        b'i' => 0x10,
        b'J' | b'j' => 0x1E,
        b'L' | b'l' => 0x38,
        b'N' | b'n' => 0x54,
        b'o' => 0x5C,
        b'P' | b'p' => 0x73,
        b'Q' | b'q' => 0x67,
        b'R' | b'r' => 0x50,
        b'T' | b't' => 0x78,
        b'U' => 0x3E,
        b'u' => 0x1C,
        b'Y' | b'y' => 0x6E,
        _ => 0x00,
    }
}
