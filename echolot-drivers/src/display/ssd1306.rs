//! SSD1306 panel binding
//!
//! The driver in buffered graphics mode already keeps an off-screen buffer
//! and implements `DrawTarget`; this only maps its init and flush onto
//! [`Panel`].

use display_interface::WriteOnlyDataCommand;
use echolot_core::traits::DisplayError;
use ::ssd1306::mode::{BufferedGraphicsMode, DisplayConfig};
use ::ssd1306::size::DisplaySize;
use ::ssd1306::Ssd1306;

use super::graphics::Panel;

impl<DI, SIZE> Panel for Ssd1306<DI, SIZE, BufferedGraphicsMode<SIZE>>
where
    DI: WriteOnlyDataCommand,
    SIZE: DisplaySize,
{
    fn init_panel(&mut self) -> Result<(), DisplayError> {
        self.init().map_err(|_| DisplayError::InitFailed)
    }

    fn flush_frame(&mut self) -> Result<(), DisplayError> {
        self.flush().map_err(|_| DisplayError::BusError)
    }
}
