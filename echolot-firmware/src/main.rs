//! Echolot - Ultrasonic Rangefinder Firmware
//!
//! Main firmware binary for RP2040 boards with an HC-SR04 sensor and an
//! SSD1306 128x32 OLED. A trigger task pings the sensor on a fixed period,
//! an interrupt-priority task times the echo, an estimator turns the pulse
//! into a distance, and a presenter draws it once per ping.
//!
//! Named after the German "Echolot" (echo sounder).

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_time::{Delay, Duration, Ticker};
use portable_atomic::Ordering;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use echolot_core::config::EcholotConfig;
use echolot_core::estimator::DistanceEstimator;
use echolot_drivers::display::GraphicsDisplay;
use echolot_drivers::sensor::TriggerPulse;

use crate::channels::{EDGE_TIMER, STATS};
use crate::config::load_config;
use crate::pins::PinBank;

mod channels;
mod config;
mod pins;
mod tasks;

/// Display bus clock
const I2C_FREQUENCY_HZ: u32 = 400_000;

/// Interval between heartbeat log lines
const HEARTBEAT_INTERVAL_S: u64 = 10;

/// Executor for the echo edge timer; preempts the thread-mode executor
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

// Static cell for configuration (must live forever for task references)
static CONFIG: StaticCell<EcholotConfig> = StaticCell::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Echolot firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let mut loaded = load_config();

    // Display on I2C1 (board-fixed: SDA=GPIO14, SCL=GPIO15)
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2C_FREQUENCY_HZ;
    let i2c = I2c::new_blocking(p.I2C1, p.PIN_15, p.PIN_14, i2c_config);
    let oled = Ssd1306::new(
        I2CDisplayInterface::new(i2c),
        DisplaySize128x32,
        DisplayRotation::Rotate0,
    )
    .into_buffered_graphics_mode();
    let display = GraphicsDisplay::new(oled);
    info!("Display bus initialized");

    // Layout follows the attached panel, not the config file
    if let Some(configured) = loaded.fit_to_panel(display.geometry()) {
        warn!(
            "Configured geometry {}x{} does not match the panel, using {}x{}",
            configured.width,
            configured.height,
            loaded.display.width,
            loaded.display.height
        );
    }

    let config: &'static EcholotConfig = CONFIG.init(loaded);
    info!(
        "Config: trig=gpio{} echo=gpio{} period={}ms range={}cm",
        config.pins.trigger, config.pins.echo, config.trigger.period_ms, config.sensor.max_range_cm
    );

    // Sensor pins from config
    let mut bank = PinBank::new([
        Some(p.PIN_0.into()),
        Some(p.PIN_1.into()),
        Some(p.PIN_2.into()),
        Some(p.PIN_3.into()),
        Some(p.PIN_4.into()),
        Some(p.PIN_5.into()),
        Some(p.PIN_6.into()),
        Some(p.PIN_7.into()),
        Some(p.PIN_8.into()),
        Some(p.PIN_9.into()),
        Some(p.PIN_10.into()),
        Some(p.PIN_11.into()),
        Some(p.PIN_12.into()),
        Some(p.PIN_13.into()),
        None, // I2C1 SDA
        None, // I2C1 SCL
        Some(p.PIN_16.into()),
        Some(p.PIN_17.into()),
        Some(p.PIN_18.into()),
        Some(p.PIN_19.into()),
        Some(p.PIN_20.into()),
        Some(p.PIN_21.into()),
        Some(p.PIN_22.into()),
        Some(p.PIN_23.into()),
        Some(p.PIN_24.into()),
        Some(p.PIN_25.into()),
        Some(p.PIN_26.into()),
        Some(p.PIN_27.into()),
        Some(p.PIN_28.into()),
        Some(p.PIN_29.into()),
    ]);

    // validate() already rejected bad pins, so these only fail on a bug
    let trigger_pin = match bank.take(config.pins.trigger) {
        Ok(pin) => pin,
        Err(e) => defmt::panic!("Trigger pin gpio{}: {}", config.pins.trigger, e),
    };
    let echo_pin = match bank.take(config.pins.echo) {
        Ok(pin) => pin,
        Err(e) => defmt::panic!("Echo pin gpio{}: {}", config.pins.echo, e),
    };

    let trigger = match TriggerPulse::new(
        Output::new(trigger_pin, Level::Low),
        Delay,
        config.trigger.pulse_us,
    ) {
        Ok(trigger) => trigger,
        Err(e) => defmt::panic!("Trigger init failed: {}", e),
    };
    let echo = Input::new(echo_pin, Pull::None);
    info!("Sensor pins initialized");

    // Edge timer on the interrupt executor
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    high_spawner.spawn(tasks::edge_timer_task(echo)).unwrap();

    // Pipeline tasks on the thread executor
    spawner
        .spawn(tasks::estimator_task(DistanceEstimator::from_config(
            &config.sensor,
        )))
        .unwrap();
    spawner
        .spawn(tasks::presenter_task(display, config))
        .unwrap();
    spawner
        .spawn(tasks::trigger_task(trigger, config.trigger.period_ms))
        .unwrap();

    info!("All tasks spawned, firmware running");

    let mut ticker = Ticker::every(Duration::from_secs(HEARTBEAT_INTERVAL_S));
    loop {
        ticker.next().await;
        info!(
            "Heartbeat: cycles={} samples={} frames={} empty={} superseded={} stray={} dropped={}",
            STATS.cycles.load(Ordering::Relaxed),
            STATS.samples.load(Ordering::Relaxed),
            STATS.frames.load(Ordering::Relaxed),
            STATS.empty_cycles.load(Ordering::Relaxed),
            STATS.superseded.load(Ordering::Relaxed),
            EDGE_TIMER.stray_edges(),
            EDGE_TIMER.dropped_pulses(),
        );
    }
}
