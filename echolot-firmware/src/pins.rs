//! Config-driven pin allocation
//!
//! Sensor pins come from echolot.toml, so they are taken by number at
//! runtime. The display bus pins never enter the bank.

use embassy_rp::gpio::AnyPin;
use embassy_rp::Peri;

use echolot_core::config::{GPIO_COUNT, RESERVED_PINS};

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken
    AlreadyTaken,
    /// Pin reserved for the display bus
    Reserved,
}

/// Pin bank that holds the free GPIO pins and hands them out by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT as usize],
}

impl PinBank {
    /// Create a bank from the free pins, indexed by GPIO number
    pub fn new(pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT as usize]) -> Self {
        Self { pins }
    }

    /// Take a pin by number
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        if pin_num >= GPIO_COUNT {
            return Err(PinError::InvalidPin);
        }
        if RESERVED_PINS.contains(&pin_num) {
            return Err(PinError::Reserved);
        }
        self.pins[pin_num as usize]
            .take()
            .ok_or(PinError::AlreadyTaken)
    }
}
