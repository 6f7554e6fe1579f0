//! Panel task
//!
//! Polls the panel buttons, applies mode changes and resets, and renders the
//! channel's value whenever it changed. Runs on the thread executor.

use defmt::*;
use embassy_rp::gpio::{Output, OutputOpenDrain};
use embassy_time::{Delay, Duration, Ticker};
use pulsepanel_core::{ChannelAction, ChannelState, DisplayMode, PulseCounter};
use pulsepanel_display::PanelController;
use pulsepanel_drivers::tm1638::Tm1638;
use pulsepanel_hal_rp2040::{EmbassyClock, TickSource};

/// TM1638 panel on RP2040 pins
pub type Panel =
    PanelController<Tm1638<Output<'static>, Output<'static>, OutputOpenDrain<'static>, Delay>>;

/// Timing shared by all panel tasks
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelTiming {
    /// Poll and render period
    pub refresh_ms: u32,
    /// No edge for this long counts as idle
    pub idle_timeout_ms: u32,
}

#[embassy_executor::task(pool_size = 2)]
pub async fn panel_task(mut panel: Panel, counter: &'static PulseCounter, timing: PanelTiming) {
    let id = panel.panel_id();
    info!("Panel {} task started", id);

    if let Err(e) = panel.begin() {
        error!("Panel {} init failed: {}", id, e);
    }

    let clock = EmbassyClock;
    let mut state = ChannelState::new(DisplayMode::default());
    let mut was_idle = true;
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(timing.refresh_ms)));

    loop {
        ticker.next().await;

        match panel.read_buttons() {
            Ok(buttons) => match state.on_buttons(buttons) {
                Some(ChannelAction::Reset) => {
                    counter.reset();
                    info!("Panel {}: counters reset", id);
                }
                Some(ChannelAction::SelectMode(mode)) => {
                    info!("Panel {}: mode {}", id, mode);
                }
                None => {}
            },
            Err(e) => warn!("Panel {}: button read failed: {}", id, e),
        }

        let snapshot = counter.snapshot();

        let idle = snapshot.is_idle(clock.now_ticks(), u64::from(timing.idle_timeout_ms));
        if idle != was_idle {
            if idle {
                debug!("Panel {}: encoder idle at {}", id, snapshot.value(state.mode()));
            } else {
                debug!("Panel {}: encoder moving {}", id, snapshot.direction);
            }
            was_idle = idle;
        }

        let value = snapshot.value(state.mode());
        if state.should_render(value) {
            match panel.render_value(value, state.mode()) {
                Ok(()) => state.mark_rendered(value),
                Err(e) => warn!("Panel {}: render failed: {}", id, e),
            }
        }
    }
}
