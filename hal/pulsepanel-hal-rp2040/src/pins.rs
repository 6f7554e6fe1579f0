//! Dynamic pin allocation for config-driven hardware setup
//!
//! Pin numbers come from the board config at runtime, so GPIOs are handed
//! out by number instead of by peripheral field.

use embassy_rp::gpio::{AnyPin, Input, Level, Output, OutputOpenDrain, Pull};
use embassy_rp::{Peri, Peripherals};

/// Number of user GPIOs on the RP2040
pub const GPIO_COUNT: usize = 30;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken
    AlreadyTaken,
}

/// Every GPIO, each taken at most once
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT],
}

macro_rules! bank {
    ($p:ident: $($pin:ident),* $(,)?) => {
        [$(Some(Peri::<'static, AnyPin>::from($p.$pin))),*]
    };
}

impl PinBank {
    /// Move all GPIOs out of the peripherals
    pub fn from_peripherals(p: Peripherals) -> Self {
        Self {
            pins: bank!(p:
                PIN_0, PIN_1, PIN_2, PIN_3, PIN_4, PIN_5, PIN_6, PIN_7, PIN_8, PIN_9,
                PIN_10, PIN_11, PIN_12, PIN_13, PIN_14, PIN_15, PIN_16, PIN_17, PIN_18, PIN_19,
                PIN_20, PIN_21, PIN_22, PIN_23, PIN_24, PIN_25, PIN_26, PIN_27, PIN_28, PIN_29,
            ),
        }
    }

    /// Take a pin by number
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        self.pins
            .get_mut(pin_num as usize)
            .ok_or(PinError::InvalidPin)?
            .take()
            .ok_or(PinError::AlreadyTaken)
    }

    /// Take a pin as an input, optionally with the internal pull-up
    pub fn take_input(&mut self, pin_num: u8, pull_up: bool) -> Result<Input<'static>, PinError> {
        let pull = if pull_up { Pull::Up } else { Pull::None };
        Ok(Input::new(self.take(pin_num)?, pull))
    }

    /// Take a pin as a push-pull output
    pub fn take_output(&mut self, pin_num: u8, initial: Level) -> Result<Output<'static>, PinError> {
        Ok(Output::new(self.take(pin_num)?, initial))
    }

    /// Take a pin as an open-drain output that can also be read
    ///
    /// Starts released (high).
    pub fn take_open_drain(&mut self, pin_num: u8) -> Result<OutputOpenDrain<'static>, PinError> {
        Ok(OutputOpenDrain::new(self.take(pin_num)?, Level::High))
    }
}
