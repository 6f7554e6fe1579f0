//! Build script for pulsepanel-firmware
//!
//! - Sets up linker search paths and scripts
//! - Validates board.toml at compile time, first as TOML, then with the
//!   same parser the firmware runs at boot

use std::collections::HashSet;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

// Links the host critical-section impl that pulsepanel-core needs
use critical_section as _;

/// Channels a board can drive
const MAX_CHANNELS: usize = 2;

/// RP2040 user GPIOs
const PIN_COUNT: i64 = 30;

const PIN_KEYS: [&str; 5] = [
    "encoder_primary",
    "encoder_companion",
    "panel_stb",
    "panel_clk",
    "panel_dio",
];

const BOOL_KEYS: [&str; 2] = ["encoder_pull_up", "panel_high_freq"];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

fn fail(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Validate board.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read board.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            let lines: Vec<String> = e.to_string().lines().map(str::to_owned).collect();
            fail("Invalid TOML syntax in board.toml", &lines);
        }
    };

    let mut errors = Vec::new();
    validate_root(&config, &mut errors);
    validate_channels(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid board configuration", &errors);
    }

    // The firmware only reads a TOML subset; anything it would reject at boot
    // must fail here instead of falling back to the built-in wiring
    if let Err(e) = pulsepanel_core::config::parse_board_config(&content) {
        fail(
            "board.toml not readable by the firmware parser",
            &[
                format!("parser error: {:?}", e),
                "use [[channel]], double-quoted strings,".into(),
                "plain decimal integers, true/false".into(),
            ],
        );
    }
}

fn validate_root(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = config.as_table() else {
        errors.push("top level must be a table".into());
        return;
    };

    for (key, value) in table {
        match key.as_str() {
            "refresh_ms" => match value.as_integer() {
                Some(ms) if ms > 0 && ms <= i64::from(u32::MAX) => {}
                _ => errors.push("refresh_ms must be a positive integer".into()),
            },
            "idle_timeout_ms" => match value.as_integer() {
                Some(ms) if (0..=i64::from(u32::MAX)).contains(&ms) => {}
                _ => errors.push("idle_timeout_ms must be a non-negative integer".into()),
            },
            "channel" => {}
            other => errors.push(format!("unknown key '{}'", other)),
        }
    }
}

/// Pin number from `7` or `"gpio7"`
fn pin_number(value: &toml::Value) -> Option<i64> {
    match value {
        toml::Value::Integer(n) => Some(*n),
        toml::Value::String(s) => s.strip_prefix("gpio")?.parse().ok(),
        _ => None,
    }
}

fn validate_channels(config: &toml::Value, errors: &mut Vec<String>) {
    let channels = match config.get("channel") {
        Some(toml::Value::Array(channels)) => channels,
        Some(_) => {
            errors.push("channel must be an array of tables ([[channel]])".into());
            return;
        }
        None => {
            errors.push("at least one [[channel]] is required".into());
            return;
        }
    };

    if channels.is_empty() {
        errors.push("at least one [[channel]] is required".into());
    }
    if channels.len() > MAX_CHANNELS {
        errors.push(format!("at most {} channels are supported", MAX_CHANNELS));
    }

    let mut used = HashSet::new();
    for (i, channel) in channels.iter().enumerate() {
        let Some(channel) = channel.as_table() else {
            errors.push(format!("[[channel]] {} must be a table", i));
            continue;
        };

        for key in PIN_KEYS {
            match channel.get(key).map(pin_number) {
                None => errors.push(format!("[[channel]] {} missing '{}'", i, key)),
                Some(None) => errors.push(format!("[[channel]] {} '{}' is not a pin", i, key)),
                Some(Some(pin)) if !(0..PIN_COUNT).contains(&pin) => {
                    errors.push(format!("[[channel]] {} '{}' must be GPIO0-29", i, key))
                }
                Some(Some(pin)) => {
                    if !used.insert(pin) {
                        errors.push(format!("[[channel]] {} reuses GPIO{}", i, pin));
                    }
                }
            }
        }

        for key in BOOL_KEYS {
            if let Some(value) = channel.get(key) {
                if !value.is_bool() {
                    errors.push(format!("[[channel]] {} '{}' must be true/false", i, key));
                }
            }
        }

        match channel.get("panel_id").and_then(|v| v.as_str()) {
            Some(id) if id.chars().count() == 1 && id.chars().all(|c| c.is_ascii_graphic()) => {}
            Some(_) => errors.push(format!(
                "[[channel]] {} panel_id must be one printable ASCII character",
                i
            )),
            None => errors.push(format!("[[channel]] {} missing 'panel_id'", i)),
        }

        for key in channel.keys() {
            let known = PIN_KEYS.contains(&key.as_str())
                || BOOL_KEYS.contains(&key.as_str())
                || key == "panel_id";
            if !known {
                errors.push(format!("[[channel]] {} unknown key '{}'", i, key));
            }
        }
    }
}
