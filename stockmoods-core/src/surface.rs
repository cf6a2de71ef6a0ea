//! Display surface
//!
//! Holds what the three screen regions should show. Setters only mark a
//! region dirty when its content actually changes, so repeating an update is
//! free for the renderer.

use heapless::String;

use crate::clock::{DisplayTime, TIME_TEXT_LEN};
use crate::mood::MoodIcon;
use crate::quote::MAX_QUOTE_LEN;

/// Quote text shown until the first message arrives
pub const LOADING_TEXT: &str = "Loading...";

/// Which regions changed since the last [`Surface::take_dirty`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Regions {
    pub icon: bool,
    pub time: bool,
    pub quote: bool,
}

impl Regions {
    pub const ALL: Self = Self {
        icon: true,
        time: true,
        quote: true,
    };

    pub const NONE: Self = Self {
        icon: false,
        time: false,
        quote: false,
    };

    pub const fn any(&self) -> bool {
        self.icon || self.time || self.quote
    }
}

/// Content of the watchface screen
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Surface {
    icon: MoodIcon,
    time: String<TIME_TEXT_LEN>,
    quote: String<MAX_QUOTE_LEN>,
    dirty: Regions,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    /// Startup content: no-connection face, `00:00`, `Loading...`
    ///
    /// Everything starts dirty so the first render draws the whole screen.
    pub fn new() -> Self {
        let mut time = String::new();
        let _ = time.push_str(DisplayTime::placeholder().as_str());
        let mut quote = String::new();
        let _ = quote.push_str(LOADING_TEXT);

        Self {
            icon: MoodIcon::NoConnection,
            time,
            quote,
            dirty: Regions::ALL,
        }
    }

    /// Returns true if the icon changed
    pub fn set_icon(&mut self, icon: MoodIcon) -> bool {
        if self.icon == icon {
            return false;
        }
        self.icon = icon;
        self.dirty.icon = true;
        true
    }

    /// Returns true if the time text changed
    pub fn set_time(&mut self, time: &DisplayTime) -> bool {
        if self.time.as_str() == time.as_str() {
            return false;
        }
        self.time.clear();
        let _ = self.time.push_str(time.as_str());
        self.dirty.time = true;
        true
    }

    /// Returns true if the quote text changed
    ///
    /// Text longer than the region holds is cut at a character boundary.
    pub fn set_quote(&mut self, text: &str) -> bool {
        let mut bounded = String::<MAX_QUOTE_LEN>::new();
        for ch in text.chars() {
            if bounded.push(ch).is_err() {
                break;
            }
        }
        if self.quote == bounded {
            return false;
        }
        self.quote = bounded;
        self.dirty.quote = true;
        true
    }

    pub fn icon(&self) -> MoodIcon {
        self.icon
    }

    pub fn time(&self) -> &str {
        self.time.as_str()
    }

    pub fn quote(&self) -> &str {
        self.quote.as_str()
    }

    /// Regions changed since the last call; clears the flags
    pub fn take_dirty(&mut self) -> Regions {
        core::mem::replace(&mut self.dirty, Regions::NONE)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.any()
    }

    /// Force a full redraw (e.g. after the display was reset)
    pub fn mark_all_dirty(&mut self) {
        self.dirty = Regions::ALL;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{format_time, WallTime};

    #[test]
    fn test_initial_content() {
        let mut surface = Surface::new();
        assert_eq!(surface.icon(), MoodIcon::NoConnection);
        assert_eq!(surface.time(), "00:00");
        assert_eq!(surface.quote(), "Loading...");
        assert_eq!(surface.take_dirty(), Regions::ALL);
        assert!(!surface.is_dirty());
    }

    #[test]
    fn test_same_content_is_noop() {
        let mut surface = Surface::new();
        surface.take_dirty();

        assert!(!surface.set_icon(MoodIcon::NoConnection));
        assert!(!surface.set_time(&DisplayTime::placeholder()));
        assert!(!surface.set_quote(LOADING_TEXT));
        assert!(!surface.is_dirty());
    }

    #[test]
    fn test_regions_tracked_separately() {
        let mut surface = Surface::new();
        surface.take_dirty();

        let time = format_time(WallTime::new(13, 5).unwrap(), true);
        assert!(surface.set_time(&time));
        assert_eq!(
            surface.take_dirty(),
            Regions {
                icon: false,
                time: true,
                quote: false
            }
        );

        assert!(surface.set_icon(MoodIcon::Happy));
        assert!(surface.set_quote("GOOG, 1.5%"));
        let dirty = surface.take_dirty();
        assert!(dirty.icon && dirty.quote && !dirty.time);
        assert_eq!(surface.quote(), "GOOG, 1.5%");
    }

    #[test]
    fn test_long_quote_cut() {
        let mut surface = Surface::new();
        let long = "Q".repeat(60);
        surface.set_quote(&long);
        assert_eq!(surface.quote().len(), MAX_QUOTE_LEN);
    }

    #[test]
    fn test_mark_all_dirty() {
        let mut surface = Surface::new();
        surface.take_dirty();
        surface.mark_all_dirty();
        assert_eq!(surface.take_dirty(), Regions::ALL);
    }
}
