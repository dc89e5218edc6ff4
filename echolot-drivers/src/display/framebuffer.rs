//! In-memory panel
//!
//! Same page layout as the SSD1306 (one byte per 8 vertical pixels, pages
//! stacked top to bottom), with a second buffer holding the last flushed
//! frame in place of the glass.

use core::convert::Infallible;

use echolot_core::traits::DisplayError;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use super::graphics::Panel;

/// Largest supported panel: 256x256 at one bit per pixel
const MAX_BYTES: usize = 256 * 256 / 8;

/// RAM-backed [`Panel`]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    working: [u8; MAX_BYTES],
    displayed: [u8; MAX_BYTES],
    flushes: u32,
}

impl FrameBuffer {
    /// Create a blank frame buffer; dimensions are clamped to 256x256
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: width.min(256),
            height: height.min(256),
            working: [0; MAX_BYTES],
            displayed: [0; MAX_BYTES],
            flushes: 0,
        }
    }

    fn len(&self) -> usize {
        self.width as usize * (self.height as usize).div_ceil(8)
    }

    fn locate(&self, x: u16, y: u16) -> Option<(usize, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y as usize / 8) * self.width as usize + x as usize;
        Some((index, 1 << (y % 8)))
    }

    /// Pixel in the off-screen buffer
    pub fn pixel(&self, x: u16, y: u16) -> bool {
        self.locate(x, y)
            .is_some_and(|(index, mask)| self.working[index] & mask != 0)
    }

    /// Pixel in the last flushed frame
    pub fn displayed_pixel(&self, x: u16, y: u16) -> bool {
        self.locate(x, y)
            .is_some_and(|(index, mask)| self.displayed[index] & mask != 0)
    }

    /// Raw bytes of the last flushed frame
    pub fn displayed(&self) -> &[u8] {
        &self.displayed[..self.len()]
    }

    /// Number of flushes so far
    pub fn flushes(&self) -> u32 {
        self.flushes
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            // Pixels outside the panel are clipped
            let Some((index, mask)) = self.locate(point.x as u16, point.y as u16) else {
                continue;
            };
            if color.is_on() {
                self.working[index] |= mask;
            } else {
                self.working[index] &= !mask;
            }
        }
        Ok(())
    }
}

impl Panel for FrameBuffer {
    fn init_panel(&mut self) -> Result<(), DisplayError> {
        self.working = [0; MAX_BYTES];
        self.displayed = [0; MAX_BYTES];
        Ok(())
    }

    fn flush_frame(&mut self) -> Result<(), DisplayError> {
        let len = self.len();
        self.displayed[..len].copy_from_slice(&self.working[..len]);
        self.flushes = self.flushes.wrapping_add(1);
        Ok(())
    }
}
