//! Echo capture
//!
//! Turns rising/falling edges on the echo line into pulse widths.

pub mod edge_timer;

pub use edge_timer::{Edge, EdgeOutcome, EdgeTimer, PulseWidth};
