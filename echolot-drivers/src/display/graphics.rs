//! embedded-graphics adapter
//!
//! Text uses the built-in mono fonts, anchored at the top-left corner so a
//! readout at (0, 0) sits flush with the top of the panel.

use echolot_core::config::DisplayGeometry;
use echolot_core::traits::{DisplayDriver, DisplayError};
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use embedded_graphics::text::{Baseline, Text};

/// Buffered monochrome panel
///
/// Drawing goes to an off-screen buffer; nothing is visible until
/// [`Panel::flush_frame`].
pub trait Panel: DrawTarget<Color = BinaryColor> {
    /// Send the panel its init sequence
    fn init_panel(&mut self) -> Result<(), DisplayError>;

    /// Push the off-screen buffer to the glass
    fn flush_frame(&mut self) -> Result<(), DisplayError>;
}

/// Font for a text scale: 6x10 at scale 1, 10x20 above
pub fn font_for_scale(scale: u8) -> &'static MonoFont<'static> {
    if scale <= 1 {
        &FONT_6X10
    } else {
        &FONT_10X20
    }
}

/// `DisplayDriver` over any [`Panel`]
pub struct GraphicsDisplay<P> {
    panel: P,
}

impl<P: Panel> GraphicsDisplay<P> {
    pub fn new(panel: P) -> Self {
        Self { panel }
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn release(self) -> P {
        self.panel
    }

    /// Pixel size of the attached panel
    pub fn geometry(&self) -> DisplayGeometry {
        let size = self.panel.bounding_box().size;
        DisplayGeometry {
            width: size.width.min(u16::MAX as u32) as u16,
            height: size.height.min(u16::MAX as u32) as u16,
        }
    }

    fn contains(&self, x: u16, y: u16) -> bool {
        self.panel
            .bounding_box()
            .contains(Point::new(x as i32, y as i32))
    }
}

impl<P: Panel> DisplayDriver for GraphicsDisplay<P> {
    fn init(&mut self) -> Result<(), DisplayError> {
        self.panel.init_panel()
    }

    fn clear_buffer(&mut self) -> Result<(), DisplayError> {
        self.panel
            .clear(BinaryColor::Off)
            .map_err(|_| DisplayError::BusError)
    }

    fn draw_text(&mut self, x: u16, y: u16, scale: u8, text: &str) -> Result<(), DisplayError> {
        if !self.contains(x, y) {
            return Err(DisplayError::OutOfBounds);
        }

        let style = MonoTextStyle::new(font_for_scale(scale), BinaryColor::On);
        Text::with_baseline(text, Point::new(x as i32, y as i32), style, Baseline::Top)
            .draw(&mut self.panel)
            .map_err(|_| DisplayError::BusError)?;
        Ok(())
    }

    fn draw_line(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), DisplayError> {
        if !self.contains(x0, y0) || !self.contains(x1, y1) {
            return Err(DisplayError::OutOfBounds);
        }

        Line::new(
            Point::new(x0 as i32, y0 as i32),
            Point::new(x1 as i32, y1 as i32),
        )
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(&mut self.panel)
        .map_err(|_| DisplayError::BusError)
    }

    fn commit(&mut self) -> Result<(), DisplayError> {
        self.panel.flush_frame()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::FrameBuffer;
    use echolot_core::config::EcholotConfig;
    use echolot_core::estimator::DistanceSample;
    use echolot_core::presenter::{Presenter, RenderOutcome};

    fn display() -> GraphicsDisplay<FrameBuffer> {
        GraphicsDisplay::new(FrameBuffer::new(128, 32))
    }

    #[test]
    fn test_font_for_scale() {
        assert_eq!(font_for_scale(0).character_size, Size::new(6, 10));
        assert_eq!(font_for_scale(1).character_size, Size::new(6, 10));
        assert_eq!(font_for_scale(2).character_size, Size::new(10, 20));
        assert_eq!(font_for_scale(4).character_size, Size::new(10, 20));
    }

    #[test]
    fn test_line_is_inclusive() {
        let mut display = display();
        display.init().unwrap();
        display.draw_line(0, 22, 5, 22).unwrap();
        display.commit().unwrap();

        let panel = display.panel();
        for x in 0..=5 {
            assert!(panel.displayed_pixel(x, 22));
        }
        assert!(!panel.displayed_pixel(6, 22));
        assert!(!panel.displayed_pixel(0, 21));
    }

    #[test]
    fn test_text_stays_in_its_rows() {
        let mut display = display();
        display.draw_text(0, 0, 1, "Dist: 17.15 cm").unwrap();
        display.commit().unwrap();

        let panel = display.panel();
        let lit_rows: Vec<u16> = (0..32)
            .filter(|&y| (0..128).any(|x| panel.displayed_pixel(x, y)))
            .collect();
        assert!(!lit_rows.is_empty());
        assert!(lit_rows.iter().all(|&y| y < 10));
    }

    #[test]
    fn test_nothing_visible_before_commit() {
        let mut display = display();
        display.draw_line(0, 0, 127, 0).unwrap();
        assert!(display.panel().pixel(0, 0));
        assert!(!display.panel().displayed_pixel(0, 0));
    }

    #[test]
    fn test_clear_buffer() {
        let mut display = display();
        display.draw_line(0, 0, 127, 0).unwrap();
        display.clear_buffer().unwrap();
        assert!(!display.panel().pixel(0, 0));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut display = display();
        assert_eq!(
            display.draw_line(0, 32, 5, 32),
            Err(DisplayError::OutOfBounds)
        );
        assert_eq!(
            display.draw_text(128, 0, 1, "x"),
            Err(DisplayError::OutOfBounds)
        );
    }

    #[test]
    fn test_missing_sample_keeps_frame_byte_identical() {
        let mut display = display();
        let mut presenter = Presenter::new(&EcholotConfig::default());
        presenter.init(&mut display).unwrap();

        presenter
            .present(Some(DistanceSample::Valid(17.15)), &mut display)
            .unwrap();
        let before = display.panel().displayed().to_vec();
        let flushes = display.panel().flushes();

        let outcome = presenter.present(None, &mut display).unwrap();

        assert_eq!(outcome, RenderOutcome::Retained);
        assert_eq!(display.panel().displayed(), before.as_slice());
        assert_eq!(display.panel().flushes(), flushes);
    }

    #[test]
    fn test_geometry_matches_panel() {
        let display = display();
        assert_eq!(
            display.geometry(),
            DisplayGeometry {
                width: 128,
                height: 32
            }
        );
    }

    #[test]
    fn test_taller_configured_geometry_still_renders() {
        let mut display = display();
        let mut config = EcholotConfig::default();
        config.display.height = 64;
        assert_eq!(config.validate(), Ok(()));

        // Laid out for 64 rows, the bar lands below the glass
        let mut unfitted = Presenter::new(&config);
        assert_eq!(
            unfitted.present(Some(DistanceSample::Valid(17.15)), &mut display),
            Err(DisplayError::OutOfBounds)
        );

        assert!(config.fit_to_panel(display.geometry()).is_some());
        let mut presenter = Presenter::new(&config);
        let outcome = presenter
            .present(Some(DistanceSample::Valid(17.15)), &mut display)
            .unwrap();

        assert_eq!(outcome, RenderOutcome::Valid { bar_length: 5 });
        let panel = display.panel();
        assert!(panel.displayed_pixel(5, 22));
        assert!(!panel.displayed_pixel(6, 22));
    }

    #[test]
    fn test_failure_frame_has_no_bar() {
        let mut display = display();
        let mut presenter = Presenter::new(&EcholotConfig::default());

        presenter
            .present(Some(DistanceSample::OutOfRange), &mut display)
            .unwrap();

        let panel = display.panel();
        assert!((0..128).all(|x| !panel.displayed_pixel(x, 22)));
        assert!((0..128).any(|x| (0..10).any(|y| panel.displayed_pixel(x, y))));
    }
}
