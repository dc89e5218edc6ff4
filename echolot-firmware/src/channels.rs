//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use portable_atomic::AtomicU32;

use echolot_core::echo::{EdgeTimer, PulseWidth};
use echolot_core::estimator::DistanceSample;

/// Channel capacity for pulse widths from the edge timer
const PULSE_CHANNEL_SIZE: usize = 10;

/// Channel capacity for distance samples
const DISTANCE_CHANNEL_SIZE: usize = 10;

/// Echo pulse widths (edge timer -> estimator)
///
/// Written with `try_send` only, so the edge timer never waits on it.
pub static PULSE_CHANNEL: Channel<CriticalSectionRawMutex, PulseWidth, PULSE_CHANNEL_SIZE> =
    Channel::new();

/// Classified distances (estimator -> presenter)
pub static DISTANCE_CHANNEL: Channel<
    CriticalSectionRawMutex,
    DistanceSample,
    DISTANCE_CHANNEL_SIZE,
> = Channel::new();

/// Signal that a trigger pulse went out
///
/// Saturating: signals raised before the presenter waits collapse into one.
pub static CYCLE_SIGNAL: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Echo edge timer state, written only by the edge timer task
pub static EDGE_TIMER: EdgeTimer = EdgeTimer::new();

/// Pipeline counters reported by the heartbeat
pub static STATS: PipelineStats = PipelineStats::new();

pub struct PipelineStats {
    /// Trigger pulses emitted
    pub cycles: AtomicU32,
    /// Distance samples published by the estimator
    pub samples: AtomicU32,
    /// Frames committed to the display
    pub frames: AtomicU32,
    /// Cycles with no sample waiting
    pub empty_cycles: AtomicU32,
    /// Samples skipped for a newer one
    pub superseded: AtomicU32,
}

impl PipelineStats {
    const fn new() -> Self {
        Self {
            cycles: AtomicU32::new(0),
            samples: AtomicU32::new(0),
            frames: AtomicU32::new(0),
            empty_cycles: AtomicU32::new(0),
            superseded: AtomicU32::new(0),
        }
    }
}
