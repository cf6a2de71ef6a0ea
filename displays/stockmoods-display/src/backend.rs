//! Display backend trait
//!
//! Defines the interface the renderer draws through.

use stockmoods_core::MoodIcon;

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Drawing into the target failed
    Draw,
    /// Communication error with the panel
    Communication,
}

/// Display backend trait
///
/// One method per watchface region. Each call repaints the whole region,
/// background included, so regions can be redrawn independently.
pub trait DisplayBackend {
    /// Clear the entire display
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw the mood face
    fn draw_icon(&mut self, icon: MoodIcon) -> Result<(), DisplayError>;

    /// Draw the `HH:MM` time text
    fn draw_time(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Draw the quote line
    fn draw_quote(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Get pixel dimensions as (width, height)
    fn dimensions(&self) -> (u16, u16);
}
