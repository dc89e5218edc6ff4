//! Configuration types
//!
//! Board-agnostic configuration structures and the `no_std` parser that
//! fills them from the embedded TOML file.

pub mod parse;
pub mod types;

pub use parse::{parse_config, parse_pin, ParseError};
pub use types::*;
