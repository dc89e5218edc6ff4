//! Simple TOML parser for rangefinder configuration
//!
//! This is a minimal line-oriented parser that handles only the subset needed
//! for Echolot configuration. It does NOT support the full TOML grammar and
//! needs no allocator.
//!
//! Supported features:
//! - Key = value pairs (string, integer, float)
//! - [section] headers
//! - Comments (# ...), including trailing comments
//!
//! Keys that are absent keep their default value.

use super::types::{EcholotConfig, GPIO_COUNT};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Section header is not one of pins, sensor, trigger, display
    InvalidSection,
    /// Key is not known in the current section
    UnknownKey,
    /// Line is neither a header nor a key = value pair
    MalformedLine,
    /// Value could not be converted to the field type
    InvalidValue,
    /// Pin string is not of the form "gpioN"
    InvalidPin,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Pins,
    Sensor,
    Trigger,
    Display,
}

/// Parse TOML configuration into EcholotConfig
///
/// The result is not validated; call [`EcholotConfig::validate`] before use.
pub fn parse_config(input: &str) -> Result<EcholotConfig, ParseError> {
    let mut config = EcholotConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::MalformedLine)?;
        apply_value(section, key, value, &mut config)?;
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "pins" => Ok(Section::Pins),
        "sensor" => Ok(Section::Sensor),
        "trigger" => Ok(Section::Trigger),
        "display" => Ok(Section::Display),
        _ => Err(ParseError::InvalidSection),
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

fn parse_number<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    // TOML allows underscores as digit separators
    let mut digits: heapless::String<24> = heapless::String::new();
    for c in value.chars().filter(|c| *c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a pin string from config
///
/// Accepts "gpio12" (quoted or not) or a bare integer.
pub fn parse_pin(value: &str) -> Result<u8, ParseError> {
    let s = parse_string(value).trim();
    let num_str = s.strip_prefix("gpio").unwrap_or(s);
    let pin: u8 = num_str.parse().map_err(|_| ParseError::InvalidPin)?;

    if pin >= GPIO_COUNT {
        return Err(ParseError::InvalidPin);
    }

    Ok(pin)
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut EcholotConfig,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Pins, "trigger") => config.pins.trigger = parse_pin(value)?,
        (Section::Pins, "echo") => config.pins.echo = parse_pin(value)?,
        (Section::Sensor, "max_range_cm") => config.sensor.max_range_cm = parse_number(value)?,
        (Section::Sensor, "speed_of_sound_cm_per_us") => {
            config.sensor.speed_of_sound_cm_per_us = parse_number(value)?
        }
        (Section::Trigger, "period_ms") => config.trigger.period_ms = parse_number(value)?,
        (Section::Trigger, "pulse_us") => config.trigger.pulse_us = parse_number(value)?,
        (Section::Display, "width") => config.display.width = parse_number(value)?,
        (Section::Display, "height") => config.display.height = parse_number(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}
