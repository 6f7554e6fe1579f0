//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in pulsepanel-display for panel hardware:
//!
//! - TM1638 LED&KEY boards (8 digits, 8 LEDs, 8 buttons), bit-banged over
//!   three GPIOs

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod tm1638;
