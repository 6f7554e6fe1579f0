//! Tick source backed by the embassy time driver

use embassy_time::Instant;

/// Milliseconds since boot from the RP2040 timer
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl pulsepanel_hal::TickSource for EmbassyClock {
    fn now_ticks(&self) -> u64 {
        Instant::now().as_millis()
    }
}
