//! HC-SR04 ultrasonic sensor
//!
//! The sensor fires a ping on a >=10 us high pulse on TRIG and answers with a
//! high pulse on ECHO whose width is the round-trip time. The trigger side is
//! a short blocking pulse; the echo side is awaited edge by edge so the
//! timestamps can be taken as close to the interrupt as possible.

use echolot_core::echo::Edge;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::digital::Wait;

/// Trigger pin errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerError {
    /// Pin could not be driven high
    SetHigh,
    /// Pin could not be driven low
    SetLow,
}

/// Trigger pulse generator
///
/// Drives TRIG high for `pulse_us` microseconds, then low. The wait is a
/// busy delay since the pulse is far shorter than a scheduler tick.
pub struct TriggerPulse<PIN, DELAY> {
    pin: PIN,
    delay: DELAY,
    pulse_us: u32,
    pulses: u32,
}

impl<PIN: OutputPin, DELAY: DelayNs> TriggerPulse<PIN, DELAY> {
    /// Create a trigger and park the pin low
    ///
    /// # Arguments
    /// - `pin`: TRIG output
    /// - `delay`: Blocking microsecond delay
    /// - `pulse_us`: High time per ping (10 us per the datasheet)
    pub fn new(mut pin: PIN, delay: DELAY, pulse_us: u32) -> Result<Self, TriggerError> {
        pin.set_low().map_err(|_| TriggerError::SetLow)?;
        Ok(Self {
            pin,
            delay,
            pulse_us,
            pulses: 0,
        })
    }

    /// Emit one trigger pulse
    pub fn fire(&mut self) -> Result<(), TriggerError> {
        self.pin.set_high().map_err(|_| TriggerError::SetHigh)?;
        self.delay.delay_us(self.pulse_us);
        self.pin.set_low().map_err(|_| TriggerError::SetLow)?;
        self.pulses = self.pulses.wrapping_add(1);
        Ok(())
    }

    /// Run one measurement cycle
    ///
    /// Fires the pulse, then calls `signal` even if the pulse failed so
    /// the cycle consumer never misses a tick. Returns the pulse result.
    pub fn cycle(&mut self, signal: impl FnOnce()) -> Result<(), TriggerError> {
        let result = self.fire();
        signal();
        result
    }

    /// Pulses emitted since creation
    pub fn pulses(&self) -> u32 {
        self.pulses
    }

    pub fn pulse_us(&self) -> u32 {
        self.pulse_us
    }
}

/// Echo line edge source
///
/// Each call waits for the next transition and classifies it by the level
/// read right after, so a rising edge reads high and a falling edge low.
pub struct EchoEdges<PIN> {
    pin: PIN,
}

impl<PIN: InputPin + Wait> EchoEdges<PIN> {
    pub fn new(pin: PIN) -> Self {
        Self { pin }
    }

    /// Wait for the next edge on the echo line
    pub async fn next_edge(&mut self) -> Result<Edge, PIN::Error> {
        self.pin.wait_for_any_edge().await?;
        Ok(Edge::from_level(self.pin.is_high()?))
    }
}
