//! Echo edge timer task
//!
//! Runs on the high-priority interrupt executor so it preempts every other
//! task as soon as the echo line changes. It never waits on anything but the
//! pin: completed pulses go out with `try_send`.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Instant;

use echolot_core::echo::EdgeOutcome;
use echolot_drivers::sensor::EchoEdges;

use crate::channels::{EDGE_TIMER, PULSE_CHANNEL};

#[embassy_executor::task]
pub async fn edge_timer_task(echo: Input<'static>) {
    info!("Edge timer task started");

    let mut edges = EchoEdges::new(echo);

    loop {
        let edge = match edges.next_edge().await {
            Ok(edge) => edge,
            // RP2040 inputs are infallible
            Err(e) => match e {},
        };
        let now_us = Instant::now().as_micros();

        match EDGE_TIMER.handle_edge(edge, now_us, |pulse| PULSE_CHANNEL.try_send(pulse)) {
            EdgeOutcome::Armed => {}
            EdgeOutcome::Published(pulse) => trace!("Echo pulse {} us", pulse.as_micros()),
            EdgeOutcome::Dropped(pulse) => {
                warn!("Pulse channel full, dropped {} us", pulse.as_micros())
            }
            EdgeOutcome::Ignored => debug!("Falling edge with no rising edge"),
        }
    }
}
