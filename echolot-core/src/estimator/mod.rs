//! Distance estimation
//!
//! Converts echo pulse widths to distances and classifies them.

pub mod distance;

pub use distance::{DistanceEstimator, DistanceSample};
