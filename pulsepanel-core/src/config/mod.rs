//! Board configuration
//!
//! Which pins each channel uses and how often panels refresh. The firmware
//! embeds a `board.toml` and parses it at startup with [`parse_board_config`].

pub mod parse;
pub mod types;

pub use parse::parse_board_config;
pub use types::*;
