//! Encoder edge task
//!
//! Runs on the interrupt executor, so `handle_edge` executes at raised
//! priority and never waits behind panel traffic.
//!
//! Edges are not latched between waits. Each `wait_for_rising_edge` call
//! clears the pin's edge latch before arming, so a rising edge that arrives
//! after one wake-up and before the next wait is armed (executor pend, poll,
//! `handle_edge`, loop) is not counted. That window is a few microseconds,
//! far shorter than the pulse spacing of a hand-turned encoder, but a fast
//! or bouncing source can lose pulses.

use defmt::*;
use embassy_rp::gpio::Input;
use pulsepanel_core::Encoder;
use pulsepanel_hal_rp2040::{EmbassyClock, RpInput};

/// Encoder bound to the RP2040 companion input and clock
pub type BoardEncoder = Encoder<'static, RpInput, EmbassyClock>;

/// Count each rising edge the wait observes on the primary channel
#[embassy_executor::task(pool_size = 2)]
pub async fn edge_task(mut primary: Input<'static>, encoder: BoardEncoder) {
    let pins = encoder.pins();
    info!(
        "Edge task started (primary GPIO{}, companion GPIO{})",
        pins.primary, pins.companion
    );

    loop {
        primary.wait_for_rising_edge().await;
        encoder.handle_edge();
    }
}
