//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod edge_timer;
pub mod estimator;
pub mod presenter;
pub mod trigger;

pub use edge_timer::edge_timer_task;
pub use estimator::estimator_task;
pub use presenter::{presenter_task, OledDisplay};
pub use trigger::{trigger_task, Trigger};
