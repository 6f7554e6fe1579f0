//! GPIO inputs
//!
//! Wraps embassy-rp inputs so the board-agnostic encoder can sample them.

use embassy_rp::gpio::Input;

/// Digital input implementing [`pulsepanel_hal::InputPin`]
pub struct RpInput {
    pin: Input<'static>,
}

impl RpInput {
    /// Wrap a configured input
    pub fn new(pin: Input<'static>) -> Self {
        Self { pin }
    }
}

impl pulsepanel_hal::InputPin for RpInput {
    fn is_high(&self) -> bool {
        // Reads the SIO input register, no waiting
        self.pin.is_high()
    }
}
