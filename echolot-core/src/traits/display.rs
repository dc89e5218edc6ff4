//! Display driver trait for the pixel display
//!
//! The presenter draws into an off-screen buffer and commits it in one go.
//! Nothing reaches the panel until [`DisplayDriver::commit`] is called, so a
//! cycle that skips the commit leaves the previous frame on screen.

/// Errors that can occur with the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Panel did not accept the init sequence
    InitFailed,
    /// Bus transfer failed during commit
    BusError,
    /// Draw call outside the frame buffer
    OutOfBounds,
    /// Formatted text does not fit the line buffer
    TextOverflow,
}

/// Trait for a buffered monochrome display
///
/// Coordinates are pixels with the origin at the top left.
pub trait DisplayDriver {
    /// Bring up the panel; called once before the first frame
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Clear the off-screen buffer
    fn clear_buffer(&mut self) -> Result<(), DisplayError>;

    /// Draw text with its top-left corner at (x, y)
    ///
    /// - `scale`: 1 for the small font, 2 or more for the large font
    fn draw_text(&mut self, x: u16, y: u16, scale: u8, text: &str) -> Result<(), DisplayError>;

    /// Draw a one-pixel line between two points, inclusive
    fn draw_line(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), DisplayError>;

    /// Push the buffer to the panel
    fn commit(&mut self) -> Result<(), DisplayError>;
}
