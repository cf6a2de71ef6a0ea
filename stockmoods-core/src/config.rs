//! Configuration type definitions
//!
//! The firmware's `watch.toml` is deserialized into [`WatchConfig`] at build
//! time and compiled in as a constant.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::refresh::DEFAULT_CADENCE_MIN;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Cadence is zero or does not divide the hour evenly
    InvalidCadence(u8),
    /// Baud rate is zero
    InvalidBaudrate,
    /// ACK timeout is zero
    InvalidAckTimeout,
}

/// Clock display settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ClockConfig {
    /// Show 24-hour time at boot (the button toggles it afterwards)
    pub use_24h: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self { use_24h: true }
    }
}

/// Refresh settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct RefreshConfig {
    /// Minutes between refresh requests; must divide 60
    pub cadence_min: u8,
    /// Ask for a quote as soon as the companion link is up
    pub request_on_boot: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            cadence_min: DEFAULT_CADENCE_MIN,
            request_on_boot: true,
        }
    }
}

/// Companion UART settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct CompanionConfig {
    pub baudrate: u32,
    /// How long to wait for an ACK before reporting a send failure
    pub ack_timeout_ms: u32,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            baudrate: 115_200,
            ack_timeout_ms: 2_000,
        }
    }
}

/// Complete watch configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct WatchConfig {
    pub clock: ClockConfig,
    pub refresh: RefreshConfig,
    pub companion: CompanionConfig,
}

impl WatchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cadence = self.refresh.cadence_min;
        if cadence == 0 || 60 % cadence != 0 {
            return Err(ConfigError::InvalidCadence(cadence));
        }
        if self.companion.baudrate == 0 {
            return Err(ConfigError::InvalidBaudrate);
        }
        if self.companion.ack_timeout_ms == 0 {
            return Err(ConfigError::InvalidAckTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = WatchConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.refresh.cadence_min, 30);
        assert!(config.clock.use_24h);
    }

    #[test]
    fn test_cadence_must_divide_hour() {
        let mut config = WatchConfig::default();
        for good in [1, 5, 15, 20, 30, 60] {
            config.refresh.cadence_min = good;
            assert_eq!(config.validate(), Ok(()), "cadence {}", good);
        }
        for bad in [0, 7, 25, 45, 90] {
            config.refresh.cadence_min = bad;
            assert_eq!(config.validate(), Err(ConfigError::InvalidCadence(bad)));
        }
    }

    #[test]
    fn test_companion_limits() {
        let mut config = WatchConfig::default();
        config.companion.baudrate = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidBaudrate));

        let mut config = WatchConfig::default();
        config.companion.ack_timeout_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidAckTimeout));
    }
}
