//! Configuration loading
//!
//! The TOML file is embedded at compile time (and checked by build.rs), then
//! parsed and validated at boot. Any failure falls back to the built-in
//! defaults so the rangefinder still comes up.

use defmt::*;

use echolot_core::config::{parse_config, EcholotConfig};

/// Embedded configuration (compiled into firmware)
/// Edit echolot.toml and rebuild to customize
pub const EMBEDDED_CONFIG: &str = include_str!("../../echolot.toml");

/// Parse and validate the embedded configuration
pub fn load_config() -> EcholotConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to parse embedded config: {}", e);
            error!("Using default configuration");
            return EcholotConfig::default();
        }
    };

    match config.validate() {
        Ok(()) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Invalid embedded config: {}", e);
            error!("Using default configuration");
            EcholotConfig::default()
        }
    }
}
