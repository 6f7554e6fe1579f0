//! Minimal TOML parser for board configuration
//!
//! Handles only the subset `board.toml` uses and needs no allocator:
//!
//! - `key = value` pairs (integer, boolean, quoted string)
//! - `[[channel]]` array-of-tables headers, one per channel
//! - `# comments`, whole-line or trailing (outside quotes)
//!
//! Pins may be written as bare numbers (`panel_clk = 5`) or as GPIO names
//! (`panel_clk = "gpio5"`).
//!
//! ```toml
//! refresh_ms = 50
//!
//! [[channel]]
//! encoder_primary = "gpio2"
//! encoder_companion = "gpio3"
//! encoder_pull_up = true
//! panel_stb = 4
//! panel_clk = 5
//! panel_dio = 6
//! panel_id = "L"
//! ```

use super::types::{
    BoardConfig, ChannelConfig, ConfigError, EncoderPinConfig, PanelPinConfig, PIN_COUNT,
};

/// Channel table being filled in
#[derive(Default)]
struct ChannelBuilder {
    encoder_primary: Option<u8>,
    encoder_companion: Option<u8>,
    encoder_pull_up: bool,
    panel_stb: Option<u8>,
    panel_clk: Option<u8>,
    panel_dio: Option<u8>,
    panel_id: Option<char>,
    panel_high_freq: bool,
}

impl ChannelBuilder {
    fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "encoder_primary" => self.encoder_primary = Some(parse_pin(value)?),
            "encoder_companion" => self.encoder_companion = Some(parse_pin(value)?),
            "encoder_pull_up" => self.encoder_pull_up = parse_bool(value)?,
            "panel_stb" => self.panel_stb = Some(parse_pin(value)?),
            "panel_clk" => self.panel_clk = Some(parse_pin(value)?),
            "panel_dio" => self.panel_dio = Some(parse_pin(value)?),
            "panel_id" => self.panel_id = Some(parse_panel_id(value)?),
            "panel_high_freq" => self.panel_high_freq = parse_bool(value)?,
            _ => return Err(ConfigError::UnknownKey),
        }
        Ok(())
    }

    fn build(self) -> Result<ChannelConfig, ConfigError> {
        let required = |pin: Option<u8>| pin.ok_or(ConfigError::MissingKey);
        Ok(ChannelConfig {
            encoder: EncoderPinConfig {
                primary: required(self.encoder_primary)?,
                companion: required(self.encoder_companion)?,
                pull_up: self.encoder_pull_up,
            },
            panel: PanelPinConfig {
                stb: required(self.panel_stb)?,
                clk: required(self.panel_clk)?,
                dio: required(self.panel_dio)?,
                id: self.panel_id.ok_or(ConfigError::MissingKey)?,
                high_freq: self.panel_high_freq,
            },
        })
    }
}

/// Parse and validate a board configuration
pub fn parse_board_config(input: &str) -> Result<BoardConfig, ConfigError> {
    let mut config = BoardConfig::new();
    let mut current: Option<ChannelBuilder> = None;

    for line in input.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            if line != "[[channel]]" {
                return Err(ConfigError::InvalidSection);
            }
            if let Some(channel) = current.take() {
                push_channel(&mut config, channel)?;
            }
            current = Some(ChannelBuilder::default());
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ConfigError::InvalidValue)?;
        match current.as_mut() {
            Some(channel) => channel.apply(key, value)?,
            None => apply_root(&mut config, key, value)?,
        }
    }

    if let Some(channel) = current.take() {
        push_channel(&mut config, channel)?;
    }

    config.validate()?;
    Ok(config)
}

fn apply_root(config: &mut BoardConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "refresh_ms" => config.refresh_ms = parse_int(value)?,
        "idle_timeout_ms" => config.idle_timeout_ms = parse_int(value)?,
        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}

fn push_channel(config: &mut BoardConfig, channel: ChannelBuilder) -> Result<(), ConfigError> {
    config
        .channels
        .push(channel.build()?)
        .map_err(|_| ConfigError::TooManyChannels)
}

/// Drop a trailing `#` comment unless the `#` sits inside quotes
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Split a `key = value` line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Strip surrounding quotes
fn parse_string(value: &str) -> Result<&str, ConfigError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ConfigError::InvalidValue)
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue),
    }
}

/// Parse a pin given as `7` or `"gpio7"`
fn parse_pin(value: &str) -> Result<u8, ConfigError> {
    let number = if value.starts_with('"') {
        parse_string(value)?
            .strip_prefix("gpio")
            .ok_or(ConfigError::InvalidPin)?
    } else {
        value
    };

    let pin: u32 = number.parse().map_err(|_| ConfigError::InvalidPin)?;
    if pin >= u32::from(PIN_COUNT) {
        return Err(ConfigError::InvalidPin);
    }
    Ok(pin as u8)
}

/// Parse a one-character quoted panel id
fn parse_panel_id(value: &str) -> Result<char, ConfigError> {
    let mut chars = parse_string(value)?.chars();
    match (chars.next(), chars.next()) {
        (Some(id), None) if id.is_ascii_graphic() => Ok(id),
        _ => Err(ConfigError::InvalidPanelId),
    }
}
