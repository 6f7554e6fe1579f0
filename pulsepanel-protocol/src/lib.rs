//! Pulsepanel Panel Protocol
//!
//! This crate defines the contract shared by the pulse counting side and the
//! panel rendering side of the firmware. Neither side depends on the other;
//! both agree on the types defined here.
//!
//! # Frame Overview
//!
//! Every render sends exactly one fixed-width text frame to a panel:
//! ```text
//! ┌──────────┬──────────┬──────────────────────────────┐
//! │ PANEL ID │ MODE     │ VALUE                        │
//! │ 1 char   │ 1 char   │ 6 chars, zero-padded, signed │
//! └──────────┴──────────┴──────────────────────────────┘
//! ```
//!
//! For example panel `L` showing the difference count 123 sends `Ld000123`.
//!
//! # Mode Selector
//!
//! | Selector | Mode           | Char |
//! |----------|----------------|------|
//! | 0        | Difference     | `d`  |
//! | 1        | Forward only   | `f`  |
//! | 2        | Backward only  | `b`  |
//!
//! Selectors outside that table are tolerated: the counter reports 0 and the
//! panel renders them with the `b` character.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod buttons;
pub mod frame;
pub mod mode;

pub use buttons::ButtonMask;
pub use frame::{saturate, Frame, FRAME_LEN, VALUE_MAX, VALUE_MIN, VALUE_WIDTH};
pub use mode::DisplayMode;
