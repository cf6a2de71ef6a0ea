//! 1-bit frame buffer
//!
//! Row-major, one bit per pixel, most significant bit is the leftmost pixel.
//! A set bit is ink. Rows written since the last [`FrameBuffer::take_dirty_rows`]
//! are tracked so the panel driver only pushes lines that changed.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::layout::{SCREEN_HEIGHT, SCREEN_WIDTH};

const WIDTH: usize = SCREEN_WIDTH as usize;
const HEIGHT: usize = SCREEN_HEIGHT as usize;

/// Bytes per display line
pub const LINE_BYTES: usize = WIDTH / 8;

/// Frame buffer for the 144×168 panel
pub struct FrameBuffer {
    rows: [[u8; LINE_BYTES]; HEIGHT],
    dirty: [bool; HEIGHT],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// Blank (all paper) buffer with every row dirty
    pub const fn new() -> Self {
        Self {
            rows: [[0; LINE_BYTES]; HEIGHT],
            dirty: [true; HEIGHT],
        }
    }

    pub fn rows(&self) -> &[[u8; LINE_BYTES]; HEIGHT] {
        &self.rows
    }

    pub fn row(&self, y: usize) -> Option<&[u8; LINE_BYTES]> {
        self.rows.get(y)
    }

    /// Is the pixel at `point` ink? Out-of-bounds reads as paper.
    pub fn pixel(&self, point: Point) -> bool {
        match Self::locate(point) {
            Some((y, byte, mask)) => self.rows[y][byte] & mask != 0,
            None => false,
        }
    }

    /// Call `f` with each dirty row index, clearing the flags
    pub fn take_dirty_rows(&mut self, mut f: impl FnMut(usize, &[u8; LINE_BYTES])) {
        for (y, dirty) in self.dirty.iter_mut().enumerate() {
            if core::mem::take(dirty) {
                f(y, &self.rows[y]);
            }
        }
    }

    pub fn has_dirty_rows(&self) -> bool {
        self.dirty.iter().any(|&d| d)
    }

    /// Mark every row dirty (e.g. after the panel was cleared)
    pub fn mark_all_dirty(&mut self) {
        self.dirty = [true; HEIGHT];
    }

    /// Number of ink pixels on screen
    pub fn ink_count(&self) -> u32 {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .map(|b| b.count_ones())
            .sum()
    }

    /// Number of ink pixels inside `area`
    pub fn ink_count_in(&self, area: &Rectangle) -> u32 {
        area.points().filter(|&p| self.pixel(p)).count() as u32
    }

    fn locate(point: Point) -> Option<(usize, usize, u8)> {
        let x = usize::try_from(point.x).ok().filter(|&x| x < WIDTH)?;
        let y = usize::try_from(point.y).ok().filter(|&y| y < HEIGHT)?;
        Some((y, x / 8, 0x80 >> (x % 8)))
    }

    fn set(&mut self, point: Point, ink: bool) {
        if let Some((y, byte, mask)) = Self::locate(point) {
            let cell = &mut self.rows[y][byte];
            let new = if ink { *cell | mask } else { *cell & !mask };
            if new != *cell {
                *cell = new;
                self.dirty[y] = true;
            }
        }
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
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
            self.set(point, color.is_on());
        }
        Ok(())
    }
}
