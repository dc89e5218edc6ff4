//! Display presenter
//!
//! Paced by the trigger cycle: each cycle renders at most one distance
//! sample, or leaves the previous frame alone when none arrived.

pub mod machine;
pub mod render;

pub use machine::{PresenterEvent, PresenterState};
pub use render::{bar_length, Presenter, RenderOutcome, FAILURE_TEXT};
