//! Board configuration loading
//!
//! The board config is compiled into the firmware. The build script runs
//! `parse_board_config` on the same file and fails the build on any error,
//! so the fallback below is not reachable from a successful build.

use defmt::*;
use pulsepanel_core::config::{parse_board_config, BoardConfig};

/// Embedded board configuration (compiled into firmware)
/// Edit board.toml and rebuild to rewire
const EMBEDDED_CONFIG: &str = include_str!("../board.toml");

/// Parse the embedded config, falling back to the built-in wiring
pub fn load_board_config() -> BoardConfig {
    match parse_board_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Board config: {} channel(s), refresh {}ms, idle after {}ms",
                config.channels.len(),
                config.refresh_ms,
                config.idle_timeout_ms
            );
            config
        }
        Err(e) => {
            error!("board.toml rejected ({}), using built-in wiring", e);
            BoardConfig::fallback()
        }
    }
}
