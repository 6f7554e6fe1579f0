//! Pulsepanel - rotary encoder counter firmware
//!
//! Counts pulses from up to two rotary encoders and shows the counts on
//! TM1638 LED&KEY panels. Pin assignment comes from `board.toml`.
//!
//! Encoder edges are handled on an interrupt executor (SWI_IRQ_1) so that
//! counting preempts panel traffic; panels run on the thread executor.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, SendSpawner, Spawner};
use embassy_rp::gpio::{Input, Level};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use pulsepanel_core::config::ChannelConfig;
use pulsepanel_core::{Encoder, EncoderPins, PulseCounter};
use pulsepanel_display::PanelController;
use pulsepanel_drivers::tm1638::Tm1638;
use pulsepanel_hal_rp2040::{EmbassyClock, PinBank, PinError, RpInput};

use crate::tasks::edge::BoardEncoder;
use crate::tasks::{Panel, PanelTiming};

mod channels;
mod config;
mod tasks;

/// Executor for encoder edges, above thread mode
static EXECUTOR_EDGE: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_EDGE.on_interrupt()
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Pulsepanel firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let board = config::load_board_config();
    let timing = PanelTiming {
        refresh_ms: board.refresh_ms,
        idle_timeout_ms: board.idle_timeout_ms,
    };

    let mut bank = PinBank::from_peripherals(p);

    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let edge_spawner = EXECUTOR_EDGE.start(interrupt::SWI_IRQ_1);

    for (index, channel) in board.channels.iter().enumerate() {
        let counter = &channels::COUNTERS[index];
        match setup_channel(&mut bank, channel, counter) {
            Ok((primary, encoder, panel)) => {
                spawn_channel(spawner, edge_spawner, primary, encoder, panel, counter, timing);
                info!("Channel {} ('{}') running", index, channel.panel.id);
            }
            Err(e) => error!("Channel {} setup failed: {}", index, e),
        }
    }

    info!("All tasks spawned");
}

/// Take and configure the pins of one channel
fn setup_channel(
    bank: &mut PinBank,
    channel: &ChannelConfig,
    counter: &'static PulseCounter,
) -> Result<(Input<'static>, BoardEncoder, Panel), PinError> {
    let enc = &channel.encoder;
    let primary = bank.take_input(enc.primary, enc.pull_up)?;
    let companion = RpInput::new(bank.take_input(enc.companion, enc.pull_up)?);
    let encoder = Encoder::new(
        counter,
        EncoderPins {
            primary: enc.primary,
            companion: enc.companion,
        },
        companion,
        EmbassyClock,
    );

    let pan = &channel.panel;
    let stb = bank.take_output(pan.stb, Level::High)?;
    let clk = bank.take_output(pan.clk, Level::Low)?;
    let dio = bank.take_open_drain(pan.dio)?;
    let device = Tm1638::new(stb, clk, dio, Delay, pan.high_freq);

    Ok((primary, encoder, PanelController::new(device, pan.id)))
}

fn spawn_channel(
    spawner: Spawner,
    edge_spawner: SendSpawner,
    primary: Input<'static>,
    encoder: BoardEncoder,
    panel: Panel,
    counter: &'static PulseCounter,
    timing: PanelTiming,
) {
    edge_spawner
        .spawn(tasks::edge_task(primary, encoder))
        .unwrap();
    spawner
        .spawn(tasks::panel_task(panel, counter, timing))
        .unwrap();
}
