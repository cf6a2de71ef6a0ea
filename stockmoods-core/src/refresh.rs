//! Refresh cadence
//!
//! The scheduler has no counter of its own: whether a minute tick asks the
//! companion for data depends only on the wall-clock minute, so the first
//! request after boot lands on the next cadence boundary.

use crate::clock::WallTime;

/// Default minutes between refresh requests
pub const DEFAULT_CADENCE_MIN: u8 = 30;

/// Decides which minute ticks request fresh quote data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefreshScheduler {
    cadence_min: u8,
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_CADENCE_MIN)
    }
}

impl RefreshScheduler {
    /// A cadence of 0 is treated as 1 (every minute)
    pub const fn new(cadence_min: u8) -> Self {
        Self {
            cadence_min: if cadence_min == 0 { 1 } else { cadence_min },
        }
    }

    pub const fn cadence_min(&self) -> u8 {
        self.cadence_min
    }

    /// True if `minute` (minute of the hour) is a cadence boundary
    pub const fn is_boundary(&self, minute: u8) -> bool {
        minute % self.cadence_min == 0
    }

    /// True if the tick at `now` should request a refresh
    pub const fn due(&self, now: WallTime) -> bool {
        self.is_boundary(now.minute())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_fires_on_the_hour_and_half_hour() {
        let scheduler = RefreshScheduler::default();
        let fired: std::vec::Vec<u8> = (0..60).filter(|&m| scheduler.is_boundary(m)).collect();
        assert_eq!(fired, [0, 30]);
    }

    #[test]
    fn test_due_uses_wall_minute() {
        let scheduler = RefreshScheduler::default();
        assert!(scheduler.due(WallTime::new(9, 30).unwrap()));
        assert!(scheduler.due(WallTime::new(0, 0).unwrap()));
        assert!(!scheduler.due(WallTime::new(9, 31).unwrap()));
        assert!(!scheduler.due(WallTime::new(23, 59).unwrap()));
    }

    #[test]
    fn test_zero_cadence_clamped() {
        let scheduler = RefreshScheduler::new(0);
        assert_eq!(scheduler.cadence_min(), 1);
        assert!((0..60).all(|m| scheduler.is_boundary(m)));
    }

    #[test]
    fn test_quarter_hour_cadence() {
        let scheduler = RefreshScheduler::new(15);
        let fired: std::vec::Vec<u8> = (0..60).filter(|&m| scheduler.is_boundary(m)).collect();
        assert_eq!(fired, [0, 15, 30, 45]);
    }

    proptest! {
        #[test]
        fn same_minute_same_answer_every_hour(hour_a in 0u8..24, hour_b in 0u8..24, minute in 0u8..60) {
            let scheduler = RefreshScheduler::default();
            let a = scheduler.due(WallTime::new(hour_a, minute).unwrap());
            let b = scheduler.due(WallTime::new(hour_b, minute).unwrap());
            prop_assert_eq!(a, b);
        }
    }
}
