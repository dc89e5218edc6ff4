//! Pixel display drivers
//!
//! [`GraphicsDisplay`] implements the core `DisplayDriver` trait on top of any
//! [`Panel`]: a buffered monochrome `DrawTarget` that can also be brought up
//! and flushed. The SSD1306 in buffered graphics mode is one such panel,
//! [`FrameBuffer`] is another that lives entirely in RAM.

pub mod framebuffer;
pub mod graphics;
pub mod ssd1306;

pub use framebuffer::FrameBuffer;
pub use graphics::{font_for_scale, GraphicsDisplay, Panel};
