//! Clock preference

/// Source of the 12/24-hour display preference
///
/// Read on every tick; implementations must not cache, since the user can
/// change the preference at any time.
pub trait ClockPreference {
    fn use_24h(&self) -> bool;
}

/// A fixed preference
impl ClockPreference for bool {
    fn use_24h(&self) -> bool {
        *self
    }
}
