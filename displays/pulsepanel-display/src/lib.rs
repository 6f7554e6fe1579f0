//! Panel abstraction for Pulsepanel
//!
//! This crate provides:
//! - `PanelDevice` trait for 8-character segment panels with buttons
//! - `PanelController` which formats encoder values into frames
//!
//! # Architecture
//!
//! The controller knows the frame format but nothing about the wire. Panel
//! drivers (e.g. the TM1638 driver in `pulsepanel-drivers`) implement
//! `PanelDevice` and are moved into a controller, one controller per panel.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod backend;
pub mod controller;

// Re-export key types
pub use backend::{PanelDevice, PanelError, MAX_BRIGHTNESS, PANEL_DIGITS};
pub use controller::{PanelController, PANEL_BRIGHTNESS};
