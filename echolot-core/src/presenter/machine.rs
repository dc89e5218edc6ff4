//! Presenter state machine
//!
//! One pass per trigger cycle: wait for the cycle signal, poll the distance
//! channel once, render whatever the poll produced, then wait again. There
//! is no terminal state.

use crate::estimator::DistanceSample;

/// Presenter states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PresenterState {
    /// Blocked on the cycle signal
    #[default]
    WaitSignal,
    /// Signal received; polling the distance channel without blocking
    TryReadSample,
    /// Drawing a valid reading and its range bar
    RenderValid,
    /// Drawing the out-of-range message
    RenderFailure,
    /// No sample this cycle; previous frame stays on screen
    RenderNone,
}

/// Events that drive the presenter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PresenterEvent {
    /// Trigger scheduler started a new cycle
    CycleSignaled,
    /// Poll returned a valid sample
    SampleValid,
    /// Poll returned an out-of-range sample
    SampleOutOfRange,
    /// Poll found the channel empty
    NoSample,
    /// Render step finished (successfully or not)
    RenderDone,
}

impl PresenterEvent {
    /// Map the result of a channel poll to an event
    pub fn from_poll(sample: Option<&DistanceSample>) -> Self {
        match sample {
            Some(DistanceSample::Valid(_)) => PresenterEvent::SampleValid,
            Some(DistanceSample::OutOfRange) => PresenterEvent::SampleOutOfRange,
            None => PresenterEvent::NoSample,
        }
    }
}

impl PresenterState {
    /// Check if this state draws to the display
    pub fn is_rendering(&self) -> bool {
        matches!(self, PresenterState::RenderValid | PresenterState::RenderFailure)
    }

    /// Process an event and return the next state
    ///
    /// Events that do not apply to the current state leave it unchanged.
    pub fn transition(self, event: PresenterEvent) -> Self {
        use PresenterEvent::*;
        use PresenterState::*;

        match (self, event) {
            (WaitSignal, CycleSignaled) => TryReadSample,

            (TryReadSample, SampleValid) => RenderValid,
            (TryReadSample, SampleOutOfRange) => RenderFailure,
            (TryReadSample, NoSample) => RenderNone,

            (RenderValid | RenderFailure | RenderNone, RenderDone) => WaitSignal,

            _ => self,
        }
    }
}
