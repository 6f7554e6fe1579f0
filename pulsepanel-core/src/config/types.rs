//! Board configuration types
//!
//! Pin numbers here are plain GPIO numbers; the chip HAL turns them into
//! configured pins at startup.

use heapless::Vec;
use pulsepanel_protocol::frame::sanitize_panel_id;

/// Maximum channels per board (one encoder + one panel each)
pub const MAX_CHANNELS: usize = 2;

/// Highest usable GPIO number + 1 (RP2040 exposes GPIO0-29)
pub const PIN_COUNT: u8 = 30;

/// Default panel refresh period
pub const DEFAULT_REFRESH_MS: u32 = 50;

/// Default time without edges before an encoder counts as idle
pub const DEFAULT_IDLE_TIMEOUT_MS: u32 = 2_000;

/// Configuration error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Key not valid in its section
    UnknownKey,
    /// Required key absent from a channel table
    MissingKey,
    /// More than [`MAX_CHANNELS`] channels
    TooManyChannels,
    /// No channel configured
    NoChannels,
    /// Pin number outside the chip's GPIO range
    InvalidPin,
    /// Same pin assigned twice
    DuplicatePin,
    /// Panel id is not a printable ASCII character
    InvalidPanelId,
}

/// Encoder pin assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderPinConfig {
    /// Edge-triggering channel
    pub primary: u8,
    /// Direction-sampling channel
    pub companion: u8,
    /// Enable internal pull-ups on both channels
    pub pull_up: bool,
}

/// Panel pin assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelPinConfig {
    /// Strobe
    pub stb: u8,
    /// Clock
    pub clk: u8,
    /// Bidirectional data
    pub dio: u8,
    /// Identifier shown in the first frame position
    pub id: char,
    /// Add bit delays for fast MCUs
    pub high_freq: bool,
}

/// One encoder paired with one panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// Encoder pins
    pub encoder: EncoderPinConfig,
    /// Panel pins
    pub panel: PanelPinConfig,
}

impl ChannelConfig {
    /// All five pins of the channel
    pub fn pins(&self) -> [u8; 5] {
        [
            self.encoder.primary,
            self.encoder.companion,
            self.panel.stb,
            self.panel.clk,
            self.panel.dio,
        ]
    }
}

/// Complete board configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardConfig {
    /// Configured channels
    pub channels: Vec<ChannelConfig, MAX_CHANNELS>,
    /// Panel refresh period in milliseconds
    pub refresh_ms: u32,
    /// Idle timeout in milliseconds
    pub idle_timeout_ms: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardConfig {
    /// Empty board with default timings
    pub const fn new() -> Self {
        Self {
            channels: Vec::new(),
            refresh_ms: DEFAULT_REFRESH_MS,
            idle_timeout_ms: DEFAULT_IDLE_TIMEOUT_MS,
        }
    }

    /// Built-in two-channel wiring used when the embedded config is broken
    pub fn fallback() -> Self {
        let mut config = Self::new();
        let channels = [
            ChannelConfig {
                encoder: EncoderPinConfig {
                    primary: 2,
                    companion: 3,
                    pull_up: true,
                },
                panel: PanelPinConfig {
                    stb: 4,
                    clk: 5,
                    dio: 6,
                    id: 'L',
                    high_freq: true,
                },
            },
            ChannelConfig {
                encoder: EncoderPinConfig {
                    primary: 10,
                    companion: 11,
                    pull_up: true,
                },
                panel: PanelPinConfig {
                    stb: 12,
                    clk: 13,
                    dio: 14,
                    id: 'r',
                    high_freq: true,
                },
            },
        ];
        for channel in channels {
            // Capacity matches the array length
            let _ = config.channels.push(channel);
        }
        config
    }

    /// Check pin ranges, pin reuse, panel ids and channel count
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channels.is_empty() {
            return Err(ConfigError::NoChannels);
        }
        if self.refresh_ms == 0 {
            return Err(ConfigError::InvalidValue);
        }

        // One bit per GPIO
        let mut used: u32 = 0;
        for channel in &self.channels {
            for pin in channel.pins() {
                if pin >= PIN_COUNT {
                    return Err(ConfigError::InvalidPin);
                }
                let bit = 1u32 << pin;
                if used & bit != 0 {
                    return Err(ConfigError::DuplicatePin);
                }
                used |= bit;
            }

            if sanitize_panel_id(channel.panel.id) != channel.panel.id {
                return Err(ConfigError::InvalidPanelId);
            }
        }

        Ok(())
    }
}
