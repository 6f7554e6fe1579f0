//! Shared per-channel state
//!
//! Counters are written by the edge tasks on the interrupt executor and read
//! and reset by the panel tasks on the thread executor.

use pulsepanel_core::config::MAX_CHANNELS;
use pulsepanel_core::PulseCounter;

/// Pulse counters, indexed by channel
pub static COUNTERS: [PulseCounter; MAX_CHANNELS] = [PulseCounter::new(), PulseCounter::new()];
