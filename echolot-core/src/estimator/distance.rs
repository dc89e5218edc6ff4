//! Pulse width to distance conversion
//!
//! The echo pulse covers the round trip, so the one-way distance is
//! `pulse_us * speed_of_sound / 2`. Anything beyond the configured maximum
//! range is reported as [`DistanceSample::OutOfRange`] rather than a number.

use crate::config::SensorConfig;
use crate::echo::PulseWidth;

/// Classified distance reading
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DistanceSample {
    /// Distance in centimeters, within `0..=max_range_cm`
    Valid(f32),
    /// Echo longer than the maximum range (or no object in range)
    OutOfRange,
}

impl DistanceSample {
    /// Distance in centimeters, if the reading is valid
    pub fn centimeters(&self) -> Option<f32> {
        match self {
            DistanceSample::Valid(cm) => Some(*cm),
            DistanceSample::OutOfRange => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, DistanceSample::Valid(_))
    }
}

/// Stateless pulse width converter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceEstimator {
    speed_cm_per_us: f32,
    max_range_cm: f32,
}

impl DistanceEstimator {
    /// Create an estimator
    ///
    /// # Arguments
    /// - `speed_cm_per_us`: Speed of sound (0.0343 at ~20°C)
    /// - `max_range_cm`: Longest distance reported as valid
    pub const fn new(speed_cm_per_us: f32, max_range_cm: f32) -> Self {
        Self {
            speed_cm_per_us,
            max_range_cm,
        }
    }

    pub fn from_config(config: &SensorConfig) -> Self {
        Self::new(
            config.speed_of_sound_cm_per_us,
            config.max_range_cm as f32,
        )
    }

    /// One-way distance in centimeters for a round-trip pulse
    pub fn distance_cm(&self, pulse: PulseWidth) -> f32 {
        pulse.as_micros() as f32 * self.speed_cm_per_us / 2.0
    }

    /// Convert and classify a pulse
    pub fn estimate(&self, pulse: PulseWidth) -> DistanceSample {
        let distance_cm = self.distance_cm(pulse);
        if distance_cm <= self.max_range_cm {
            DistanceSample::Valid(distance_cm)
        } else {
            DistanceSample::OutOfRange
        }
    }

    pub fn max_range_cm(&self) -> f32 {
        self.max_range_cm
    }
}

impl Default for DistanceEstimator {
    fn default() -> Self {
        Self::from_config(&SensorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SPEED: f64 = 0.0343;
    const MAX_RANGE: f64 = 400.0;

    fn reference_cm(pulse_us: u64) -> f64 {
        pulse_us as f64 * SPEED / 2.0
    }

    #[test]
    fn test_one_millisecond_echo() {
        let estimator = DistanceEstimator::default();
        let sample = estimator.estimate(PulseWidth::from_micros(1_000));
        let cm = sample.centimeters().unwrap();
        assert!((cm - 17.15).abs() < 1e-3);
    }

    #[test]
    fn test_long_echo_is_out_of_range() {
        let estimator = DistanceEstimator::default();
        // 30 ms -> 514.5 cm
        assert!((estimator.distance_cm(PulseWidth::from_micros(30_000)) - 514.5).abs() < 1e-2);
        assert_eq!(
            estimator.estimate(PulseWidth::from_micros(30_000)),
            DistanceSample::OutOfRange
        );
    }

    #[test]
    fn test_zero_pulse_is_zero_distance() {
        let estimator = DistanceEstimator::default();
        assert_eq!(
            estimator.estimate(PulseWidth::from_micros(0)),
            DistanceSample::Valid(0.0)
        );
    }

    #[test]
    fn test_max_range_is_inclusive() {
        // speed 0.5 cm/us -> 4 us is exactly 1 cm
        let estimator = DistanceEstimator::new(0.5, 1.0);
        assert_eq!(
            estimator.estimate(PulseWidth::from_micros(4)),
            DistanceSample::Valid(1.0)
        );
        assert_eq!(
            estimator.estimate(PulseWidth::from_micros(5)),
            DistanceSample::OutOfRange
        );
    }

    #[test]
    fn test_from_config() {
        let config = SensorConfig {
            max_range_cm: 200,
            speed_of_sound_cm_per_us: 0.0343,
        };
        let estimator = DistanceEstimator::from_config(&config);
        assert_eq!(estimator.max_range_cm(), 200.0);
        // 400 cm worth of echo is beyond a 200 cm limit
        assert_eq!(
            estimator.estimate(PulseWidth::from_micros(23_300)),
            DistanceSample::OutOfRange
        );
    }

    proptest! {
        #[test]
        fn prop_in_range_pulses_are_valid(pulse_us in 0u64..=23_323) {
            let expected = reference_cm(pulse_us);
            prop_assume!(expected <= MAX_RANGE);

            let sample = DistanceEstimator::default().estimate(PulseWidth::from_micros(pulse_us));
            match sample {
                DistanceSample::Valid(cm) => {
                    prop_assert!((cm as f64 - expected).abs() <= 1e-3);
                    prop_assert!(cm >= 0.0);
                }
                DistanceSample::OutOfRange => prop_assert!(false, "expected valid sample"),
            }
        }

        #[test]
        fn prop_out_of_range_pulses_are_marked(pulse_us in 23_324u64..10_000_000) {
            prop_assume!(reference_cm(pulse_us) > MAX_RANGE);

            let sample = DistanceEstimator::default().estimate(PulseWidth::from_micros(pulse_us));
            prop_assert_eq!(sample, DistanceSample::OutOfRange);
        }
    }
}
