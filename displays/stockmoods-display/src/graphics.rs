//! embedded-graphics backend
//!
//! Draws the watchface regions into any `DrawTarget<Color = BinaryColor>`.
//! Each region is clipped to its rectangle and repainted background first.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use stockmoods_core::MoodIcon;

use crate::backend::{DisplayBackend, DisplayError};
use crate::icons::draw_face;
use crate::layout::{
    wrap_quote, ICON_AREA, INK, PAPER, QUOTE_AREA, QUOTE_FONT, TIME_AREA, TIME_FONT,
};

/// Vertical offsets of the two quote lines from the region centre
const QUOTE_FIRST_LINE: Point = Point::new(0, -6);
const QUOTE_SECOND_LINE: Point = Point::new(0, 5);

/// [`DisplayBackend`] over an embedded-graphics draw target
pub struct GraphicsBackend<D> {
    target: D,
}

impl<D> GraphicsBackend<D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    pub fn new(target: D) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    fn centered_text(
        &mut self,
        text: &str,
        center: Point,
        style: MonoTextStyle<'static, BinaryColor>,
        area: &Rectangle,
    ) -> Result<(), DisplayError> {
        let text_style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        Text::with_text_style(text, center, style, text_style)
            .draw(&mut self.target.clipped(area))
            .map(|_| ())
            .map_err(|_| DisplayError::Draw)
    }
}

impl<D> DisplayBackend for GraphicsBackend<D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.target.clear(PAPER).map_err(|_| DisplayError::Draw)
    }

    fn draw_icon(&mut self, icon: MoodIcon) -> Result<(), DisplayError> {
        self.target
            .fill_solid(&ICON_AREA, PAPER)
            .map_err(|_| DisplayError::Draw)?;
        draw_face(icon, ICON_AREA.top_left, &mut self.target.clipped(&ICON_AREA))
            .map_err(|_| DisplayError::Draw)
    }

    fn draw_time(&mut self, text: &str) -> Result<(), DisplayError> {
        self.target
            .fill_solid(&TIME_AREA, PAPER)
            .map_err(|_| DisplayError::Draw)?;
        let style = MonoTextStyle::new(TIME_FONT, INK);
        self.centered_text(text, TIME_AREA.center(), style, &TIME_AREA)
    }

    fn draw_quote(&mut self, text: &str) -> Result<(), DisplayError> {
        self.target
            .fill_solid(&QUOTE_AREA, INK)
            .map_err(|_| DisplayError::Draw)?;
        let style = MonoTextStyle::new(QUOTE_FONT, PAPER);
        let center = QUOTE_AREA.center();

        match wrap_quote(text) {
            (line, None) => self.centered_text(line, center, style, &QUOTE_AREA),
            (first, Some(second)) => {
                self.centered_text(first, center + QUOTE_FIRST_LINE, style, &QUOTE_AREA)?;
                self.centered_text(second, center + QUOTE_SECOND_LINE, style, &QUOTE_AREA)
            }
        }
    }

    fn dimensions(&self) -> (u16, u16) {
        let size = self.target.bounding_box().size;
        (size.width as u16, size.height as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;
    use crate::layout::{SCREEN_HEIGHT, SCREEN_WIDTH};

    fn backend() -> GraphicsBackend<FrameBuffer> {
        GraphicsBackend::new(FrameBuffer::new())
    }

    #[test]
    fn test_dimensions() {
        assert_eq!(
            backend().dimensions(),
            (SCREEN_WIDTH as u16, SCREEN_HEIGHT as u16)
        );
    }

    #[test]
    fn test_time_drawn_inside_time_area() {
        let mut gfx = backend();
        gfx.draw_time("13:05").unwrap();

        let fb = gfx.target();
        let ink = fb.ink_count_in(&TIME_AREA);
        assert!(ink > 0);
        assert_eq!(fb.ink_count(), ink);
    }

    #[test]
    fn test_quote_is_inverted() {
        let mut gfx = backend();
        gfx.draw_quote("GOOG, 1.5%").unwrap();

        let fb = gfx.target();
        let area_pixels = QUOTE_AREA.size.width * QUOTE_AREA.size.height;
        let ink = fb.ink_count_in(&QUOTE_AREA);
        // Mostly black with white text knocked out
        assert!(ink < area_pixels);
        assert!(ink > area_pixels / 2);
        assert_eq!(fb.ink_count(), ink);
    }

    #[test]
    fn test_redraw_replaces_previous_content() {
        let mut a = backend();
        a.draw_time("12:00").unwrap();
        a.draw_time("08:41").unwrap();

        let mut b = backend();
        b.draw_time("08:41").unwrap();

        assert!(a.target().rows() == b.target().rows());
    }

    #[test]
    fn test_long_quote_wraps_within_area() {
        let mut gfx = backend();
        gfx.draw_quote("BERKSHIRE-HATHAWAY, -0.25%").unwrap();
        let fb = gfx.target();
        assert_eq!(fb.ink_count(), fb.ink_count_in(&QUOTE_AREA));
    }

    #[test]
    fn test_icon_repaint_clears_old_face() {
        let mut gfx = backend();
        gfx.draw_icon(MoodIcon::Happy).unwrap();
        gfx.draw_icon(MoodIcon::Sad).unwrap();

        let mut fresh = backend();
        fresh.draw_icon(MoodIcon::Sad).unwrap();
        assert!(gfx.target().rows() == fresh.target().rows());
    }

    #[test]
    fn test_clear() {
        let mut gfx = backend();
        gfx.draw_quote("X").unwrap();
        gfx.clear().unwrap();
        assert_eq!(gfx.target().ink_count(), 0);
    }
}
