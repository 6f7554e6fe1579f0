//! Panel device trait
//!
//! Defines the interface a segment panel driver provides.

/// Number of character positions on a panel
pub const PANEL_DIGITS: u8 = 8;

/// Highest brightness level a panel accepts
pub const MAX_BRIGHTNESS: u8 = 7;

/// Panel device errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError {
    /// Driving or sampling a bus pin failed
    Bus,
    /// Digit or LED position out of range
    InvalidPosition,
}

/// Segment panel with eight character positions and eight buttons
///
/// Implementations own their pins exclusively. All operations are
/// synchronous and short; the panel is driven from the main path only.
pub trait PanelDevice {
    /// Bring the bus to idle levels and switch the display on
    fn init(&mut self) -> Result<(), PanelError>;

    /// Clear every digit and LED
    fn reset(&mut self) -> Result<(), PanelError>;

    /// Set brightness, 0 (dimmest) to [`MAX_BRIGHTNESS`]
    ///
    /// Larger levels are clamped.
    fn set_brightness(&mut self, level: u8) -> Result<(), PanelError>;

    /// Show text starting at the leftmost position
    ///
    /// Characters the panel cannot draw render blank; anything beyond
    /// [`PANEL_DIGITS`] positions is dropped.
    fn write_text(&mut self, text: &str) -> Result<(), PanelError>;

    /// Sample the buttons
    ///
    /// Bit 0 is S1, bit 7 is S8. Raw state, no debouncing.
    fn read_buttons(&mut self) -> Result<u8, PanelError>;
}
