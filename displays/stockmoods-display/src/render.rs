//! Watchface renderer
//!
//! Remembers what is on the panel and redraws only the regions whose content
//! differs from a new [`Surface`] snapshot. Snapshots may be skipped or
//! repeated; the outcome only depends on the latest one.

use heapless::String;
use stockmoods_core::clock::TIME_TEXT_LEN;
use stockmoods_core::quote::MAX_QUOTE_LEN;
use stockmoods_core::{MoodIcon, Regions, Surface};

use crate::backend::{DisplayBackend, DisplayError};

/// Content currently on the panel
#[derive(Debug, Clone, PartialEq, Eq)]
struct Drawn {
    icon: Option<MoodIcon>,
    time: Option<String<TIME_TEXT_LEN>>,
    quote: Option<String<MAX_QUOTE_LEN>>,
}

impl Drawn {
    const UNKNOWN: Self = Self {
        icon: None,
        time: None,
        quote: None,
    };
}

/// Diffing renderer
pub struct Renderer {
    drawn: Drawn,
    cleared: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub const fn new() -> Self {
        Self {
            drawn: Drawn::UNKNOWN,
            cleared: false,
        }
    }

    /// Bring the panel in line with `surface`
    ///
    /// Returns the regions that were redrawn. A region that fails to draw is
    /// retried on the next call.
    pub fn render<B: DisplayBackend>(
        &mut self,
        surface: &Surface,
        backend: &mut B,
    ) -> Result<Regions, DisplayError> {
        let mut redrawn = Regions::NONE;

        if !self.cleared {
            backend.clear()?;
            self.cleared = true;
        }

        if self.drawn.icon != Some(surface.icon()) {
            backend.draw_icon(surface.icon())?;
            self.drawn.icon = Some(surface.icon());
            redrawn.icon = true;
        }

        if self.drawn.time.as_deref() != Some(surface.time()) {
            backend.draw_time(surface.time())?;
            self.drawn.time = copy_text(surface.time());
            redrawn.time = true;
        }

        if self.drawn.quote.as_deref() != Some(surface.quote()) {
            backend.draw_quote(surface.quote())?;
            self.drawn.quote = copy_text(surface.quote());
            redrawn.quote = true;
        }

        Ok(redrawn)
    }

    /// Forget what is on the panel so the next render redraws everything
    pub fn invalidate(&mut self) {
        self.drawn = Drawn::UNKNOWN;
        self.cleared = false;
    }
}

fn copy_text<const N: usize>(text: &str) -> Option<String<N>> {
    String::try_from(text).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockmoods_core::{format_time, WallTime};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Clear,
        Icon(MoodIcon),
        Time(std::string::String),
        Quote(std::string::String),
    }

    #[derive(Default)]
    struct MockBackend {
        calls: Vec<Call>,
        fail_quote: bool,
    }

    impl DisplayBackend for MockBackend {
        fn clear(&mut self) -> Result<(), DisplayError> {
            self.calls.push(Call::Clear);
            Ok(())
        }

        fn draw_icon(&mut self, icon: MoodIcon) -> Result<(), DisplayError> {
            self.calls.push(Call::Icon(icon));
            Ok(())
        }

        fn draw_time(&mut self, text: &str) -> Result<(), DisplayError> {
            self.calls.push(Call::Time(text.into()));
            Ok(())
        }

        fn draw_quote(&mut self, text: &str) -> Result<(), DisplayError> {
            if self.fail_quote {
                return Err(DisplayError::Communication);
            }
            self.calls.push(Call::Quote(text.into()));
            Ok(())
        }

        fn dimensions(&self) -> (u16, u16) {
            (144, 168)
        }
    }

    #[test]
    fn test_first_render_draws_everything() {
        let mut renderer = Renderer::new();
        let mut backend = MockBackend::default();

        let redrawn = renderer.render(&Surface::new(), &mut backend).unwrap();
        assert_eq!(redrawn, Regions::ALL);
        assert_eq!(
            backend.calls,
            vec![
                Call::Clear,
                Call::Icon(MoodIcon::NoConnection),
                Call::Time("00:00".into()),
                Call::Quote("Loading...".into()),
            ]
        );
    }

    #[test]
    fn test_unchanged_snapshot_draws_nothing() {
        let mut renderer = Renderer::new();
        let mut backend = MockBackend::default();
        let surface = Surface::new();

        renderer.render(&surface, &mut backend).unwrap();
        backend.calls.clear();

        assert_eq!(renderer.render(&surface, &mut backend), Ok(Regions::NONE));
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn test_only_changed_region_redrawn() {
        let mut renderer = Renderer::new();
        let mut backend = MockBackend::default();
        let mut surface = Surface::new();
        renderer.render(&surface, &mut backend).unwrap();
        backend.calls.clear();

        surface.set_time(&format_time(WallTime::new(9, 30).unwrap(), true));
        let redrawn = renderer.render(&surface, &mut backend).unwrap();

        assert!(redrawn.time && !redrawn.icon && !redrawn.quote);
        assert_eq!(backend.calls, vec![Call::Time("09:30".into())]);
    }

    #[test]
    fn test_skipped_snapshots_converge() {
        let mut renderer = Renderer::new();
        let mut backend = MockBackend::default();
        let mut surface = Surface::new();
        renderer.render(&surface, &mut backend).unwrap();
        backend.calls.clear();

        // Change and change back between renders
        surface.set_icon(MoodIcon::Happy);
        surface.set_icon(MoodIcon::NoConnection);
        surface.set_quote("GOOG, 1.5%");

        renderer.render(&surface, &mut backend).unwrap();
        assert_eq!(backend.calls, vec![Call::Quote("GOOG, 1.5%".into())]);
    }

    #[test]
    fn test_failed_region_retried() {
        let mut renderer = Renderer::new();
        let mut backend = MockBackend {
            fail_quote: true,
            ..Default::default()
        };
        let surface = Surface::new();

        assert_eq!(
            renderer.render(&surface, &mut backend),
            Err(DisplayError::Communication)
        );

        backend.fail_quote = false;
        backend.calls.clear();
        let redrawn = renderer.render(&surface, &mut backend).unwrap();
        assert_eq!(
            redrawn,
            Regions {
                icon: false,
                time: false,
                quote: true
            }
        );
    }

    #[test]
    fn test_invalidate_forces_full_redraw() {
        let mut renderer = Renderer::new();
        let mut backend = MockBackend::default();
        let surface = Surface::new();
        renderer.render(&surface, &mut backend).unwrap();

        renderer.invalidate();
        backend.calls.clear();
        assert_eq!(renderer.render(&surface, &mut backend), Ok(Regions::ALL));
        assert_eq!(backend.calls.first(), Some(&Call::Clear));
    }
}
