//! Distance estimator task
//!
//! Every pulse width becomes exactly one distance sample. The send blocks
//! when the distance channel is full rather than dropping the sample.

use defmt::*;
use portable_atomic::Ordering;

use echolot_core::estimator::DistanceEstimator;

use crate::channels::{DISTANCE_CHANNEL, PULSE_CHANNEL, STATS};

#[embassy_executor::task]
pub async fn estimator_task(estimator: DistanceEstimator) {
    info!(
        "Estimator task started (max range {} cm)",
        estimator.max_range_cm()
    );

    loop {
        let pulse = PULSE_CHANNEL.receive().await;
        let sample = estimator.estimate(pulse);
        debug!("{} us -> {}", pulse.as_micros(), sample);

        DISTANCE_CHANNEL.send(sample).await;
        STATS.samples.fetch_add(1, Ordering::Relaxed);
    }
}
