//! Panel controller
//!
//! Owns one panel device and renders encoder values onto it as frames of
//! the form `<id><mode><value>`, e.g. `Ld000123`.

use pulsepanel_protocol::frame::sanitize_panel_id;
use pulsepanel_protocol::{DisplayMode, Frame};

use crate::backend::{PanelDevice, PanelError};

/// Brightness applied by [`PanelController::begin`]
pub const PANEL_BRIGHTNESS: u8 = 2;

/// One panel and the id it shows in every frame
pub struct PanelController<D> {
    device: D,
    panel_id: char,
}

impl<D: PanelDevice> PanelController<D> {
    /// Take ownership of a constructed but uninitialized device
    ///
    /// Ids that are not printable ASCII become `'?'`.
    pub fn new(device: D, panel_id: char) -> Self {
        Self {
            device,
            panel_id: sanitize_panel_id(panel_id),
        }
    }

    /// Initialize the device, clear it and set the default brightness
    pub fn begin(&mut self) -> Result<(), PanelError> {
        self.device.init()?;
        self.device.reset()?;
        self.device.set_brightness(PANEL_BRIGHTNESS)
    }

    /// Render `value` in `mode`
    ///
    /// Values outside the 6-character field are saturated.
    pub fn render_value(&mut self, value: i64, mode: DisplayMode) -> Result<(), PanelError> {
        let frame = Frame::new(self.panel_id, mode, value);
        self.device.write_text(frame.as_str())
    }

    /// Render `value` for a raw mode selector
    ///
    /// Unknown selectors render with the backward character.
    pub fn render_selector(&mut self, value: i64, selector: i32) -> Result<(), PanelError> {
        let frame = Frame::for_selector(self.panel_id, selector, value);
        self.device.write_text(frame.as_str())
    }

    /// Raw button bitmask from the device
    pub fn read_buttons(&mut self) -> Result<u8, PanelError> {
        self.device.read_buttons()
    }

    /// Clear the panel
    pub fn reset(&mut self) -> Result<(), PanelError> {
        self.device.reset()
    }

    /// Id shown in every frame
    pub fn panel_id(&self) -> char {
        self.panel_id
    }

    /// Borrow the device
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Give the device back
    pub fn release(self) -> D {
        self.device
    }
}
