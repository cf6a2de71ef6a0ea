//! Mood face artwork
//!
//! Faces are built from embedded-graphics primitives rather than bitmaps so
//! they stay crisp at the 100×100 icon size. Coordinates are relative to the
//! top-left corner of the icon region.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Arc, Circle, Line, PrimitiveStyle};
use stockmoods_core::MoodIcon;

use crate::layout::INK;

const OUTLINE_WIDTH: u32 = 4;
const MOUTH_WIDTH: u32 = 4;
const EYE_DIAMETER: u32 = 10;

/// Draw the face for `icon` with its top-left corner at `origin`
///
/// Only ink pixels are drawn; the caller clears the background.
pub fn draw_face<D>(icon: MoodIcon, origin: Point, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let outline = PrimitiveStyle::with_stroke(INK, OUTLINE_WIDTH);
    let mouth = PrimitiveStyle::with_stroke(INK, MOUTH_WIDTH);
    let filled = PrimitiveStyle::with_fill(INK);

    Circle::new(origin + Point::new(2, 2), 96)
        .into_styled(outline)
        .draw(target)?;

    if icon == MoodIcon::NoConnection {
        // Struck-through empty face
        return Line::new(origin + Point::new(18, 82), origin + Point::new(82, 18))
            .into_styled(outline)
            .draw(target);
    }

    for eye_x in [30, 60] {
        Circle::new(origin + Point::new(eye_x, 32), EYE_DIAMETER)
            .into_styled(filled)
            .draw(target)?;
    }

    match icon {
        MoodIcon::Happy => Arc::new(
            origin + Point::new(25, 22),
            50,
            Angle::from_degrees(20.0),
            Angle::from_degrees(140.0),
        )
        .into_styled(mouth)
        .draw(target),
        MoodIcon::Sad => Arc::new(
            origin + Point::new(25, 64),
            50,
            Angle::from_degrees(200.0),
            Angle::from_degrees(140.0),
        )
        .into_styled(mouth)
        .draw(target),
        _ => Line::new(origin + Point::new(30, 70), origin + Point::new(70, 70))
            .into_styled(mouth)
            .draw(target),
    }
}
