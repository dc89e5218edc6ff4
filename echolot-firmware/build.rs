//! Build script for echolot-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates echolot.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
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

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate echolot.toml at compile time
///
/// Mirrors the checks `EcholotConfig::validate` runs at boot, so a bad value
/// fails the build instead of silently falling back to defaults.
fn validate_config() {
    println!("cargo:rerun-if-changed=echolot.toml");

    let content = match fs::read_to_string(Path::new("echolot.toml")) {
        Ok(content) => content,
        Err(e) => fail(&[format!("cannot read echolot.toml: {}", e)]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(&[format!("invalid TOML: {}", e)]),
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_pins(&config, &mut errors);
    validate_ranges(&config, &mut errors);

    if !errors.is_empty() {
        fail(&errors);
    }

    warn_on_panel_mismatch(&config);
}

/// Abort the build with one line per problem
fn fail(errors: &[String]) -> ! {
    let lines: Vec<String> = errors.iter().map(|e| format!("  {}", e)).collect();
    panic!("\n\necholot.toml rejected:\n{}\n", lines.join("\n"));
}

const SECTIONS: &[(&str, &[&str])] = &[
    ("pins", &["trigger", "echo"]),
    ("sensor", &["max_range_cm", "speed_of_sound_cm_per_us"]),
    ("trigger", &["period_ms", "pulse_us"]),
    ("display", &["width", "height"]),
];

/// Only known sections and keys; every section must be a table
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        errors.push("top level must be a table".to_string());
        return;
    };

    for (name, value) in root {
        let Some((_, keys)) = SECTIONS.iter().find(|(section, _)| section == name) else {
            errors.push(format!("unknown section [{}]", name));
            continue;
        };
        let Some(table) = value.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };
        for key in table.keys() {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", name, key));
            }
        }
    }
}

/// Parse "gpioN" or a bare integer
fn pin_number(value: &toml::Value) -> Option<i64> {
    match value {
        toml::Value::Integer(n) => Some(*n),
        toml::Value::String(s) => s.strip_prefix("gpio").unwrap_or(s).parse().ok(),
        _ => None,
    }
}

fn validate_pins(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(pins) = config.get("pins") else {
        return;
    };

    let mut seen = Vec::new();
    for key in ["trigger", "echo"] {
        let Some(value) = pins.get(key) else {
            continue;
        };
        match pin_number(value) {
            Some(pin) if !(0..30).contains(&pin) => {
                errors.push(format!("[pins] {} must be gpio0-gpio29", key));
            }
            Some(14) | Some(15) => {
                errors.push(format!("[pins] {} uses the display bus (gpio14/15)", key));
            }
            Some(pin) => {
                if seen.contains(&pin) {
                    errors.push(format!("[pins] gpio{} assigned twice", pin));
                }
                seen.push(pin);
            }
            None => errors.push(format!("[pins] {} must be \"gpioN\"", key)),
        }
    }
}

/// Check an integer field against an inclusive range
fn check_int(config: &toml::Value, section: &str, key: &str, min: i64, max: i64) -> Option<String> {
    let value = config.get(section)?.get(key)?;
    match value.as_integer() {
        Some(n) if (min..=max).contains(&n) => None,
        Some(_) => Some(format!("[{}] {} must be {}-{}", section, key, min, max)),
        None => Some(format!("[{}] {} must be an integer", section, key)),
    }
}

fn validate_ranges(config: &toml::Value, errors: &mut Vec<String>) {
    let checks = [
        ("sensor", "max_range_cm", 1, 1000),
        ("trigger", "period_ms", 60, 60_000),
        ("trigger", "pulse_us", 10, 100),
        ("display", "width", 2, 256),
        ("display", "height", 11, 256),
    ];
    errors.extend(
        checks
            .iter()
            .filter_map(|(section, key, min, max)| check_int(config, section, key, *min, *max)),
    );

    if let Some(speed) = config
        .get("sensor")
        .and_then(|s| s.get("speed_of_sound_cm_per_us"))
    {
        // The boot parser reads `1` and `1.0` alike
        let value = speed
            .as_float()
            .or_else(|| speed.as_integer().map(|n| n as f64));
        match value {
            Some(v) if v.is_finite() && v > 0.0 => {}
            _ => errors.push("[sensor] speed_of_sound_cm_per_us must be a positive number".to_string()),
        }
    }
}

/// The firmware drives a 128x32 SSD1306 and lays out for it regardless
fn warn_on_panel_mismatch(config: &toml::Value) {
    let Some(display) = config.get("display") else {
        return;
    };
    let width = display.get("width").and_then(|v| v.as_integer()).unwrap_or(128);
    let height = display.get("height").and_then(|v| v.as_integer()).unwrap_or(32);
    if (width, height) != (128, 32) {
        println!(
            "cargo:warning=echolot.toml [display] is {}x{}; the 128x32 panel size is used instead",
            width, height
        );
    }
}
