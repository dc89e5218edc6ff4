//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in echolot-core for the rangefinder hardware:
//!
//! - HC-SR04 trigger pulse and echo edge source
//! - Pixel display adapter over embedded-graphics
//! - SSD1306 panel binding and an in-memory frame buffer

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod sensor;
