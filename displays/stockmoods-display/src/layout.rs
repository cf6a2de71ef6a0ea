//! Screen layout
//!
//! 144×168 monochrome panel. `BinaryColor::On` is ink (black),
//! `BinaryColor::Off` is paper (white).
//!
//! ```text
//! ┌──────────────────┐ y=0
//! │      13:05       │ time, black on white
//! ├──────────────────┤ y=38
//! │     ┌──────┐     │
//! │     │ face │     │ icon, 100×100 at x=22
//! │     └──────┘     │
//! ├──────────────────┤ y=138
//! │    GOOG, 1.5%    │ quote, white on black
//! └──────────────────┘ y=168
//! ```

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Panel width in pixels
pub const SCREEN_WIDTH: u32 = 144;

/// Panel height in pixels
pub const SCREEN_HEIGHT: u32 = 168;

/// Ink color
pub const INK: BinaryColor = BinaryColor::On;

/// Paper color
pub const PAPER: BinaryColor = BinaryColor::Off;

/// Time text region
pub const TIME_AREA: Rectangle = Rectangle::new(Point::new(0, 0), Size::new(SCREEN_WIDTH, 38));

/// Mood face region
pub const ICON_AREA: Rectangle = Rectangle::new(Point::new(22, 38), Size::new(100, 100));

/// Quote text region
pub const QUOTE_AREA: Rectangle = Rectangle::new(Point::new(0, 138), Size::new(SCREEN_WIDTH, 30));

/// Font for the time
pub const TIME_FONT: &MonoFont<'static> = &FONT_10X20;

/// Font for the quote line
pub const QUOTE_FONT: &MonoFont<'static> = &FONT_6X10;

/// Characters of [`QUOTE_FONT`] that fit across the screen
pub const QUOTE_LINE_CHARS: usize = (SCREEN_WIDTH / 6) as usize;

/// Split a quote into at most two lines of [`QUOTE_LINE_CHARS`]
///
/// Breaks after the last space that keeps the first line within width,
/// or hard at the width if there is none. Anything past two lines is cut.
pub fn wrap_quote(text: &str) -> (&str, Option<&str>) {
    if text.chars().count() <= QUOTE_LINE_CHARS {
        return (text, None);
    }

    let hard = byte_index_of_char(text, QUOTE_LINE_CHARS);
    let space = if text[hard..].starts_with(' ') {
        Some(hard)
    } else {
        text[..hard].rfind(' ')
    };
    let (first, rest) = match space {
        Some(space) if space > 0 => (&text[..space], &text[space + 1..]),
        _ => (&text[..hard], &text[hard..]),
    };

    let rest = rest.trim_start();
    let rest = &rest[..byte_index_of_char(rest, QUOTE_LINE_CHARS)];
    (first.trim_end(), if rest.is_empty() { None } else { Some(rest) })
}

/// Byte offset of the `n`th character, or the string length if shorter
fn byte_index_of_char(text: &str, n: usize) -> usize {
    text.char_indices().nth(n).map(|(i, _)| i).unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regions_tile_the_screen() {
        assert_eq!(TIME_AREA.bottom_right().map(|p| p.y), Some(37));
        assert_eq!(ICON_AREA.top_left.y, 38);
        assert_eq!(QUOTE_AREA.top_left.y, 138);
        assert_eq!(
            QUOTE_AREA.bottom_right().map(|p| p.y),
            Some(SCREEN_HEIGHT as i32 - 1)
        );
    }

    #[test]
    fn test_short_quote_one_line() {
        assert_eq!(wrap_quote("GOOG, 1.5%"), ("GOOG, 1.5%", None));
        assert_eq!(wrap_quote(""), ("", None));
    }

    #[test]
    fn test_long_quote_breaks_at_space() {
        let (first, second) = wrap_quote("BERKSHIRE-HATHAWAY, -0.25%");
        assert_eq!(first, "BERKSHIRE-HATHAWAY,");
        assert_eq!(second, Some("-0.25%"));
    }

    #[test]
    fn test_long_word_hard_break() {
        let (first, second) = wrap_quote("ABCDEFGHIJKLMNOPQRSTUVWXYZ");
        assert_eq!(first, "ABCDEFGHIJKLMNOPQRSTUVWX");
        assert_eq!(second, Some("YZ"));
    }

    #[test]
    fn test_break_exactly_at_width() {
        let (first, second) = wrap_quote("ABCDEFGHIJKLMNOPQRSTUVWX YZ");
        assert_eq!(first, "ABCDEFGHIJKLMNOPQRSTUVWX");
        assert_eq!(second, Some("YZ"));
    }

    #[test]
    fn test_multibyte_text_does_not_split_chars() {
        let text = "ÄÖÜÄÖÜÄÖÜÄÖÜÄÖÜÄÖÜÄÖÜÄÖÜÄÖÜ";
        let (first, second) = wrap_quote(text);
        assert_eq!(first.chars().count(), QUOTE_LINE_CHARS);
        assert_eq!(second.map(|s| s.chars().count()), Some(3));
    }

    #[test]
    fn test_wrap_keeps_words_whole() {
        let text = "ABCDEFGHIJKLMNOPQRS, 1234567890123456789";
        let (first, second) = wrap_quote(text);
        assert_eq!(first, "ABCDEFGHIJKLMNOPQRS,");
        assert_eq!(second, Some("1234567890123456789"));
        assert!(first.len() <= QUOTE_LINE_CHARS);
    }
}
