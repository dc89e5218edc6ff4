//! Display presenter task
//!
//! Paced by the trigger: waits for the cycle signal, then takes whatever the
//! estimator has queued without waiting. An empty channel leaves the last
//! frame on the panel.

use defmt::*;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C1;
use portable_atomic::Ordering;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::{DisplaySize128x32, I2CInterface};
use ssd1306::Ssd1306;

use echolot_core::config::EcholotConfig;
use echolot_core::presenter::{Presenter, RenderOutcome};
use echolot_drivers::display::GraphicsDisplay;

use crate::channels::{CYCLE_SIGNAL, DISTANCE_CHANNEL, STATS};

/// SSD1306 128x32 on I2C1
pub type OledDisplay = GraphicsDisplay<
    Ssd1306<
        I2CInterface<I2c<'static, I2C1, Blocking>>,
        DisplaySize128x32,
        BufferedGraphicsMode<DisplaySize128x32>,
    >,
>;

#[embassy_executor::task]
pub async fn presenter_task(mut display: OledDisplay, config: &'static EcholotConfig) {
    info!("Presenter task started");

    let mut presenter = Presenter::new(config);
    if let Err(e) = presenter.init(&mut display) {
        error!("Display init failed: {}", e);
    }

    loop {
        CYCLE_SIGNAL.wait().await;

        let result = presenter.present_latest(
            || DISTANCE_CHANNEL.try_receive().ok(),
            &mut display,
        );
        match result {
            Ok(RenderOutcome::Valid { bar_length }) => trace!("Rendered reading, bar {} px", bar_length),
            Ok(RenderOutcome::Failure) => debug!("Rendered out-of-range"),
            Ok(RenderOutcome::Retained) => debug!("No sample this cycle"),
            Err(e) => warn!("Display error: {}", e),
        }

        STATS
            .frames
            .store(presenter.frames_rendered(), Ordering::Relaxed);
        STATS
            .empty_cycles
            .store(presenter.empty_cycles(), Ordering::Relaxed);
        STATS
            .superseded
            .store(presenter.superseded_samples(), Ordering::Relaxed);
    }
}
