//! Board-agnostic core logic for the pulse counting firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Interrupt-safe pulse counters and direction inference
//! - Channel logic pairing an encoder with a panel (mode and reset buttons)
//! - Board configuration types and the embedded config parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod channel;
pub mod config;
pub mod encoder;

pub use channel::{ChannelAction, ChannelState};
pub use encoder::{Direction, Encoder, EncoderPins, EncoderSnapshot, PulseCounter};
pub use pulsepanel_protocol::DisplayMode;
