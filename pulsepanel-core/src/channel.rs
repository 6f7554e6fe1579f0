//! Channel logic
//!
//! A channel pairs one encoder with one panel. The panel's buttons pick the
//! display mode and clear the counters; this module turns raw button masks
//! into actions and decides when the panel needs a fresh frame.

use pulsepanel_protocol::{ButtonMask, DisplayMode};

/// Button that selects [`DisplayMode::Difference`] (S1)
pub const BUTTON_DIFFERENCE: u8 = 0;
/// Button that selects [`DisplayMode::ForwardOnly`] (S2)
pub const BUTTON_FORWARD: u8 = 1;
/// Button that selects [`DisplayMode::BackwardOnly`] (S3)
pub const BUTTON_BACKWARD: u8 = 2;
/// Button that cycles to the next mode (S4)
pub const BUTTON_CYCLE: u8 = 3;
/// Button that clears the encoder counters (S8)
pub const BUTTON_RESET: u8 = 7;

/// Mode buttons S1..S4
const MODE_BUTTONS: u8 = 0b0000_1111;

/// Action requested by the panel buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelAction {
    /// Display mode changed (already applied to the state)
    SelectMode(DisplayMode),
    /// Caller must reset the channel's encoder
    Reset,
}

/// Per-channel display state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelState {
    mode: DisplayMode,
    previous_buttons: ButtonMask,
    last_rendered: Option<(i64, DisplayMode)>,
}

impl ChannelState {
    /// Start in `mode` with nothing rendered yet
    pub const fn new(mode: DisplayMode) -> Self {
        Self {
            mode,
            previous_buttons: ButtonMask::NONE,
            last_rendered: None,
        }
    }

    /// Current display mode
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Feed the latest raw button mask
    ///
    /// Only buttons that went from released to pressed since the previous
    /// call count. Holding a button does nothing further. When several new
    /// presses arrive together, reset wins, then the lowest mode button.
    pub fn on_buttons(&mut self, raw: u8) -> Option<ChannelAction> {
        let current = ButtonMask::from(raw);
        let pressed = current.newly_pressed(self.previous_buttons);
        self.previous_buttons = current;

        if pressed.is_pressed(BUTTON_RESET) {
            self.last_rendered = None;
            return Some(ChannelAction::Reset);
        }

        let mode = match ButtonMask(pressed.bits() & MODE_BUTTONS).first_pressed()? {
            BUTTON_DIFFERENCE => DisplayMode::Difference,
            BUTTON_FORWARD => DisplayMode::ForwardOnly,
            BUTTON_BACKWARD => DisplayMode::BackwardOnly,
            _ => self.mode.next(),
        };
        self.mode = mode;
        Some(ChannelAction::SelectMode(mode))
    }

    /// Check whether `value` in the current mode differs from the last frame
    pub fn should_render(&self, value: i64) -> bool {
        self.last_rendered != Some((value, self.mode))
    }

    /// Remember that `value` was rendered in the current mode
    pub fn mark_rendered(&mut self, value: i64) {
        self.last_rendered = Some((value, self.mode));
    }
}
