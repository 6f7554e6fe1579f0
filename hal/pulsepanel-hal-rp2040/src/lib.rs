//! RP2040-specific HAL for the pulse counting firmware
//!
//! This crate provides RP2040 implementations of the shared
//! `pulsepanel-hal` traits, plus RP2040-specific functionality:
//!
//! - GPIO inputs usable as encoder companion channels
//! - Millisecond tick source backed by the embassy time driver
//! - Dynamic pin allocation for config-driven setup

#![no_std]

pub mod gpio;
pub mod pins;
pub mod time;

pub use gpio::RpInput;
pub use pins::{PinBank, PinError};
pub use time::EmbassyClock;

// Re-export shared traits from pulsepanel-hal for convenience
pub use pulsepanel_hal::{InputPin, TickSource};
