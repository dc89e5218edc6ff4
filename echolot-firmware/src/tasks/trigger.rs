//! Trigger scheduler task
//!
//! One ping per period. The cycle signal goes out whether or not the pulse
//! itself succeeded, so the presenter keeps its cadence.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::{Delay, Duration, Ticker};
use portable_atomic::Ordering;

use echolot_drivers::sensor::TriggerPulse;

use crate::channels::{CYCLE_SIGNAL, STATS};

/// HC-SR04 trigger on an RP2040 output
pub type Trigger = TriggerPulse<Output<'static>, Delay>;

#[embassy_executor::task]
pub async fn trigger_task(mut trigger: Trigger, period_ms: u32) {
    info!("Trigger task started ({} ms period)", period_ms);

    let mut ticker = Ticker::every(Duration::from_millis(period_ms as u64));

    loop {
        STATS.cycles.fetch_add(1, Ordering::Relaxed);
        if let Err(e) = trigger.cycle(|| CYCLE_SIGNAL.signal(())) {
            warn!("Trigger pulse failed: {}", e);
        }

        ticker.next().await;
    }
}
