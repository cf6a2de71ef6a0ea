//! Platform abstraction traits
//!
//! These traits define what the watchface needs from the board: a way to
//! send dictionaries to the companion and the user's clock preference.

pub mod clock;
pub mod outbox;

pub use clock::ClockPreference;
pub use outbox::Outbox;
