//! Distance readout renderer
//!
//! Layout on a 128x32 panel:
//!
//! ```text
//! Dist: 17.15 cm          <- row 0, small font
//!
//! ▬▬▬▬▬                   <- row height-10, bar scaled to max range
//! ```

use core::fmt::Write;

use heapless::String;

use super::machine::{PresenterEvent, PresenterState};
use crate::config::{DisplayGeometry, EcholotConfig};
use crate::estimator::DistanceSample;
use crate::traits::{DisplayDriver, DisplayError};

/// Text shown when the echo came back from beyond the maximum range
pub const FAILURE_TEXT: &str = "Sensor failed";

/// Text scale for the readout
const TEXT_SCALE: u8 = 1;

/// Readout buffer size; holds any distance up to the 1000 cm range limit
const TEXT_CAPACITY: usize = 32;

/// What a cycle put on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderOutcome {
    /// Readout and bar drawn
    Valid { bar_length: u16 },
    /// Failure text drawn
    Failure,
    /// Nothing drawn; previous frame retained
    Retained,
}

/// Length of the range bar in pixels for a distance
///
/// Truncates toward zero and never exceeds the rightmost column.
pub fn bar_length(distance_cm: f32, max_range_cm: f32, geometry: &DisplayGeometry) -> u16 {
    let max_x = geometry.max_x();
    if max_range_cm <= 0.0 {
        return 0;
    }
    // Float to int casts saturate, so negatives and NaN land on 0
    let length = (distance_cm / max_range_cm * max_x as f32) as u16;
    length.min(max_x)
}

/// Display presenter
///
/// Owns the presenter state machine and the pipeline counters the
/// heartbeat reports.
pub struct Presenter {
    geometry: DisplayGeometry,
    max_range_cm: f32,
    state: PresenterState,
    frames_rendered: u32,
    empty_cycles: u32,
    superseded_samples: u32,
}

impl Presenter {
    pub fn new(config: &EcholotConfig) -> Self {
        Self {
            geometry: config.display,
            max_range_cm: config.sensor.max_range_cm as f32,
            state: PresenterState::WaitSignal,
            frames_rendered: 0,
            empty_cycles: 0,
            superseded_samples: 0,
        }
    }

    /// Initialize the display; call once before the first cycle
    pub fn init<D: DisplayDriver>(&mut self, display: &mut D) -> Result<(), DisplayError> {
        display.init()
    }

    /// Run one cycle with the newest sample from a non-blocking poll
    ///
    /// `poll` is called until it returns `None`. Every sample but the last
    /// is counted as superseded and never drawn.
    pub fn present_latest<D, F>(
        &mut self,
        mut poll: F,
        display: &mut D,
    ) -> Result<RenderOutcome, DisplayError>
    where
        D: DisplayDriver,
        F: FnMut() -> Option<DistanceSample>,
    {
        let mut latest = None;
        while let Some(sample) = poll() {
            if latest.replace(sample).is_some() {
                self.superseded_samples = self.superseded_samples.wrapping_add(1);
            }
        }
        self.present(latest, display)
    }

    /// Run one cycle with the result of a single poll
    ///
    /// The state machine always ends back in `WaitSignal`, including when
    /// the display reports an error.
    pub fn present<D: DisplayDriver>(
        &mut self,
        sample: Option<DistanceSample>,
        display: &mut D,
    ) -> Result<RenderOutcome, DisplayError> {
        self.state = self.state.transition(PresenterEvent::CycleSignaled);
        self.state = self
            .state
            .transition(PresenterEvent::from_poll(sample.as_ref()));

        let result = match (self.state, sample) {
            (PresenterState::RenderValid, Some(DistanceSample::Valid(cm))) => {
                self.render_valid(cm, display)
            }
            (PresenterState::RenderFailure, _) => self.render_failure(display),
            _ => {
                self.empty_cycles = self.empty_cycles.wrapping_add(1);
                Ok(RenderOutcome::Retained)
            }
        };

        self.state = self.state.transition(PresenterEvent::RenderDone);
        if matches!(result, Ok(RenderOutcome::Valid { .. } | RenderOutcome::Failure)) {
            self.frames_rendered = self.frames_rendered.wrapping_add(1);
        }
        result
    }

    fn render_valid<D: DisplayDriver>(
        &self,
        distance_cm: f32,
        display: &mut D,
    ) -> Result<RenderOutcome, DisplayError> {
        let mut text: String<TEXT_CAPACITY> = String::new();
        write!(text, "Dist: {:.2} cm", distance_cm).map_err(|_| DisplayError::TextOverflow)?;

        let bar = bar_length(distance_cm, self.max_range_cm, &self.geometry);
        let row = self.geometry.bar_row();

        display.clear_buffer()?;
        display.draw_text(0, 0, TEXT_SCALE, &text)?;
        display.draw_line(0, row, bar, row)?;
        display.commit()?;

        Ok(RenderOutcome::Valid { bar_length: bar })
    }

    fn render_failure<D: DisplayDriver>(
        &self,
        display: &mut D,
    ) -> Result<RenderOutcome, DisplayError> {
        display.clear_buffer()?;
        display.draw_text(0, 0, TEXT_SCALE, FAILURE_TEXT)?;
        display.commit()?;

        Ok(RenderOutcome::Failure)
    }

    pub fn state(&self) -> PresenterState {
        self.state
    }

    /// Cycles that drew and committed a frame
    pub fn frames_rendered(&self) -> u32 {
        self.frames_rendered
    }

    /// Cycles where the channel was empty
    pub fn empty_cycles(&self) -> u32 {
        self.empty_cycles
    }

    /// Queued samples skipped in favor of a newer one
    pub fn superseded_samples(&self) -> u32 {
        self.superseded_samples
    }
}
