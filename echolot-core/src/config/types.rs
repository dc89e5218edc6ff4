//! Configuration type definitions
//!
//! These types represent the rangefinder configuration. The firmware embeds
//! a TOML file at compile time and parses it into these structures at boot.

/// Number of GPIO pins on the RP2040
pub const GPIO_COUNT: u8 = 30;

/// Pins wired to the display bus (I2C1 SDA, SCL) on the reference board
pub const RESERVED_PINS: [u8; 2] = [14, 15];

/// Minimum interval between pings; the HC-SR04 needs 60 ms to settle
pub const MIN_PERIOD_MS: u32 = 60;

/// Row offset of the range bar from the bottom of the display
pub const BAR_ROW_OFFSET: u16 = 10;

/// Sensor pin assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinsConfig {
    /// Trigger output GPIO
    pub trigger: u8,
    /// Echo input GPIO
    pub echo: u8,
}

impl Default for PinsConfig {
    fn default() -> Self {
        Self {
            trigger: 12,
            echo: 13,
        }
    }
}

/// Distance conversion parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorConfig {
    /// Readings beyond this distance are reported as out of range (cm)
    pub max_range_cm: u16,
    /// Speed of sound in cm per microsecond
    pub speed_of_sound_cm_per_us: f32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            max_range_cm: 400,
            speed_of_sound_cm_per_us: 0.0343,
        }
    }
}

/// Trigger cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TriggerConfig {
    /// Cycle period in milliseconds
    pub period_ms: u32,
    /// Trigger pulse width in microseconds
    pub pulse_us: u32,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            period_ms: 1000,
            pulse_us: 10,
        }
    }
}

/// Display geometry in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayGeometry {
    pub width: u16,
    pub height: u16,
}

impl Default for DisplayGeometry {
    fn default() -> Self {
        Self {
            width: 128,
            height: 32,
        }
    }
}

impl DisplayGeometry {
    /// Y coordinate of the range bar
    pub fn bar_row(&self) -> u16 {
        self.height.saturating_sub(BAR_ROW_OFFSET)
    }

    /// Rightmost addressable column
    pub fn max_x(&self) -> u16 {
        self.width.saturating_sub(1)
    }
}

/// Complete rangefinder configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EcholotConfig {
    pub pins: PinsConfig,
    pub sensor: SensorConfig,
    pub trigger: TriggerConfig,
    pub display: DisplayGeometry,
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Pin number outside 0-29
    InvalidPin(u8),
    /// Pin is wired to the display bus
    ReservedPin(u8),
    /// Trigger and echo share a pin
    PinConflict(u8),
    /// Max range must be 1-1000 cm
    MaxRangeOutOfBounds,
    /// Speed of sound must be finite and positive
    InvalidSpeedOfSound,
    /// Period must be 60-60000 ms
    PeriodOutOfBounds,
    /// Pulse width must be 10-100 us
    PulseWidthOutOfBounds,
    /// Display must be 2-256 wide and 11-256 tall
    GeometryOutOfBounds,
}

impl EcholotConfig {
    /// Replace the configured geometry with the attached panel's
    ///
    /// The presenter lays out against `display`, so it must match the glass.
    /// Returns the configured geometry if it had to be overridden.
    pub fn fit_to_panel(&mut self, panel: DisplayGeometry) -> Option<DisplayGeometry> {
        if self.display == panel {
            return None;
        }
        let configured = self.display;
        self.display = panel;
        Some(configured)
    }

    /// Check every field against its allowed range
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for pin in [self.pins.trigger, self.pins.echo] {
            if pin >= GPIO_COUNT {
                return Err(ConfigError::InvalidPin(pin));
            }
            if RESERVED_PINS.contains(&pin) {
                return Err(ConfigError::ReservedPin(pin));
            }
        }
        if self.pins.trigger == self.pins.echo {
            return Err(ConfigError::PinConflict(self.pins.trigger));
        }

        if !(1..=1000).contains(&self.sensor.max_range_cm) {
            return Err(ConfigError::MaxRangeOutOfBounds);
        }
        let speed = self.sensor.speed_of_sound_cm_per_us;
        if !speed.is_finite() || speed <= 0.0 {
            return Err(ConfigError::InvalidSpeedOfSound);
        }

        if !(MIN_PERIOD_MS..=60_000).contains(&self.trigger.period_ms) {
            return Err(ConfigError::PeriodOutOfBounds);
        }
        if !(10..=100).contains(&self.trigger.pulse_us) {
            return Err(ConfigError::PulseWidthOutOfBounds);
        }

        let geometry = self.display;
        if !(2..=256).contains(&geometry.width) || !(BAR_ROW_OFFSET + 1..=256).contains(&geometry.height)
        {
            return Err(ConfigError::GeometryOutOfBounds);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EcholotConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.pins.trigger, 12);
        assert_eq!(config.pins.echo, 13);
        assert_eq!(config.sensor.max_range_cm, 400);
        assert_eq!(config.trigger.period_ms, 1000);
        assert_eq!(config.trigger.pulse_us, 10);
        assert_eq!(config.display.bar_row(), 22);
        assert_eq!(config.display.max_x(), 127);
    }

    #[test]
    fn test_pin_conflict() {
        let mut config = EcholotConfig::default();
        config.pins.echo = config.pins.trigger;
        assert_eq!(config.validate(), Err(ConfigError::PinConflict(12)));
    }

    #[test]
    fn test_reserved_and_invalid_pins() {
        let mut config = EcholotConfig::default();
        config.pins.trigger = 14;
        assert_eq!(config.validate(), Err(ConfigError::ReservedPin(14)));

        config.pins.trigger = 30;
        assert_eq!(config.validate(), Err(ConfigError::InvalidPin(30)));
    }

    #[test]
    fn test_fit_to_panel() {
        let panel = DisplayGeometry::default();

        let mut config = EcholotConfig::default();
        assert_eq!(config.fit_to_panel(panel), None);

        config.display.height = 64;
        assert_eq!(
            config.fit_to_panel(panel),
            Some(DisplayGeometry {
                width: 128,
                height: 64
            })
        );
        assert_eq!(config.display, panel);
        assert_eq!(config.display.bar_row(), 22);
    }

    #[test]
    fn test_range_limits() {
        let mut config = EcholotConfig::default();
        config.sensor.max_range_cm = 0;
        assert_eq!(config.validate(), Err(ConfigError::MaxRangeOutOfBounds));

        let mut config = EcholotConfig::default();
        config.sensor.speed_of_sound_cm_per_us = f32::NAN;
        assert_eq!(config.validate(), Err(ConfigError::InvalidSpeedOfSound));

        let mut config = EcholotConfig::default();
        config.trigger.period_ms = 59;
        assert_eq!(config.validate(), Err(ConfigError::PeriodOutOfBounds));

        let mut config = EcholotConfig::default();
        config.trigger.pulse_us = 5;
        assert_eq!(config.validate(), Err(ConfigError::PulseWidthOutOfBounds));

        let mut config = EcholotConfig::default();
        config.display.height = 10;
        assert_eq!(config.validate(), Err(ConfigError::GeometryOutOfBounds));
    }
}
