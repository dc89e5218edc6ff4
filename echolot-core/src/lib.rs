//! Board-agnostic core logic for the Echolot rangefinder firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Echo edge timing (interrupt-safe pulse capture)
//! - Pulse width to distance conversion
//! - Display presenter and its state machine
//! - Display driver trait
//! - Configuration types and parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod echo;
pub mod estimator;
pub mod presenter;
pub mod traits;
