//! Wall-clock time and the `HH:MM` formatter

use core::fmt::Write;

use heapless::String;

/// Width of a formatted time, `HH:MM`
pub const TIME_TEXT_LEN: usize = 5;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Local time of day at minute resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallTime {
    hour: u8,
    minute: u8,
}

impl WallTime {
    /// Returns `None` unless `hour < 24` and `minute < 60`
    pub const fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Midnight, shown before the companion has synced the clock
    pub const fn midnight() -> Self {
        Self { hour: 0, minute: 0 }
    }

    /// Local time from Unix seconds and a UTC offset in minutes
    pub fn from_unix(unix_s: i64, utc_offset_min: i32) -> Self {
        let local = unix_s.saturating_add(utc_offset_min as i64 * 60);
        let secs_of_day = local.rem_euclid(SECONDS_PER_DAY);
        Self {
            hour: (secs_of_day / 3600) as u8,
            minute: (secs_of_day % 3600 / 60) as u8,
        }
    }

    pub const fn hour(&self) -> u8 {
        self.hour
    }

    pub const fn minute(&self) -> u8 {
        self.minute
    }

    /// Hour on a 12-hour dial (1-12)
    pub const fn hour12(&self) -> u8 {
        match self.hour % 12 {
            0 => 12,
            h => h,
        }
    }
}

/// Wall clock derived from the last companion time sync and uptime
///
/// The board has no battery-backed clock; until the first sync the time
/// counts up from midnight at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockSync {
    unix_s: i64,
    utc_offset_min: i32,
    synced_at_ms: u64,
    synced: bool,
}

impl ClockSync {
    pub const fn new() -> Self {
        Self {
            unix_s: 0,
            utc_offset_min: 0,
            synced_at_ms: 0,
            synced: false,
        }
    }

    /// Record that it was `unix_s` at uptime `now_ms`
    pub fn sync(&mut self, unix_s: i64, utc_offset_min: i32, now_ms: u64) {
        self.unix_s = unix_s;
        self.utc_offset_min = utc_offset_min;
        self.synced_at_ms = now_ms;
        self.synced = true;
    }

    pub const fn is_synced(&self) -> bool {
        self.synced
    }

    /// Local time at uptime `now_ms`
    pub fn now(&self, now_ms: u64) -> WallTime {
        let elapsed_s = (now_ms.saturating_sub(self.synced_at_ms) / 1000) as i64;
        let unix_s = if self.synced {
            self.unix_s.saturating_add(elapsed_s)
        } else {
            (now_ms / 1000) as i64
        };
        WallTime::from_unix(unix_s, self.utc_offset_min)
    }

    /// Milliseconds from `now_ms` until the next minute starts
    pub fn ms_to_next_minute(&self, now_ms: u64) -> u64 {
        let base_ms = if self.synced {
            self.unix_s.rem_euclid(60) as u64 * 1000
        } else {
            0
        };
        let into_minute = (base_ms + now_ms.saturating_sub(self.synced_at_ms)) % 60_000;
        60_000 - into_minute
    }
}

/// Formatted `HH:MM` text
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayTime(String<TIME_TEXT_LEN>);

impl DisplayTime {
    /// Placeholder shown before the first tick
    pub fn placeholder() -> Self {
        Self::from_digits(0, 0)
    }

    fn from_digits(hour: u8, minute: u8) -> Self {
        let mut text = String::new();
        // Two two-digit numbers and a colon always fit
        let _ = write!(text, "{:02}:{:02}", hour, minute);
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Format `time` as `HH:MM`
///
/// 24-hour mode zero-pads the hour (`%H`); 12-hour mode uses `01`-`12` (`%I`).
pub fn format_time(time: WallTime, use_24h: bool) -> DisplayTime {
    let hour = if use_24h { time.hour } else { time.hour12() };
    DisplayTime::from_digits(hour, time.minute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(hour: u8, minute: u8) -> WallTime {
        WallTime::new(hour, minute).unwrap()
    }

    #[test]
    fn test_afternoon() {
        assert_eq!(format_time(at(13, 5), false).as_str(), "01:05");
        assert_eq!(format_time(at(13, 5), true).as_str(), "13:05");
    }

    #[test]
    fn test_midnight_and_noon() {
        assert_eq!(format_time(at(0, 0), true).as_str(), "00:00");
        assert_eq!(format_time(at(0, 0), false).as_str(), "12:00");
        assert_eq!(format_time(at(12, 30), false).as_str(), "12:30");
        assert_eq!(format_time(at(23, 59), true).as_str(), "23:59");
        assert_eq!(format_time(at(23, 59), false).as_str(), "11:59");
    }

    #[test]
    fn test_invalid_time_rejected() {
        assert!(WallTime::new(24, 0).is_none());
        assert!(WallTime::new(0, 60).is_none());
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(DisplayTime::placeholder().as_str(), "00:00");
    }

    #[test]
    fn test_from_unix() {
        // 2023-11-14T22:13:20Z
        let utc = WallTime::from_unix(1_700_000_000, 0);
        assert_eq!((utc.hour(), utc.minute()), (22, 13));

        // UTC-5 crosses back into the afternoon
        let est = WallTime::from_unix(1_700_000_000, -300);
        assert_eq!((est.hour(), est.minute()), (17, 13));

        // UTC+5:45 crosses midnight
        let npt = WallTime::from_unix(1_700_000_000, 345);
        assert_eq!((npt.hour(), npt.minute()), (3, 58));
    }

    #[test]
    fn test_from_unix_before_epoch() {
        let t = WallTime::from_unix(-60, 0);
        assert_eq!((t.hour(), t.minute()), (23, 59));
    }

    #[test]
    fn test_unsynced_clock_counts_from_boot() {
        let clock = ClockSync::new();
        assert!(!clock.is_synced());
        assert_eq!(clock.now(0), WallTime::midnight());
        assert_eq!(clock.now(61 * 60 * 1000), at(1, 1));
        assert_eq!(clock.ms_to_next_minute(15_000), 45_000);
    }

    #[test]
    fn test_synced_clock_advances_with_uptime() {
        let mut clock = ClockSync::new();
        // 22:13:20 UTC, synced 5 s after boot
        clock.sync(1_700_000_000, 60, 5_000);
        assert!(clock.is_synced());
        assert_eq!(clock.now(5_000), at(23, 13));
        assert_eq!(clock.now(5_000 + 40_000), at(23, 14));
        assert_eq!(clock.ms_to_next_minute(5_000), 40_000);
        assert_eq!(clock.ms_to_next_minute(45_000), 60_000);
    }

    #[test]
    fn test_resync_replaces_base() {
        let mut clock = ClockSync::new();
        clock.sync(0, 0, 0);
        clock.sync(3600, 0, 10_000);
        assert_eq!(clock.now(10_000), at(1, 0));
    }

    proptest! {
        #[test]
        fn ms_to_next_minute_in_range(secs in 0i64..4_000_000_000, up in 0u64..1_000_000_000) {
            let mut clock = ClockSync::new();
            clock.sync(secs, 0, 0);
            let wait = clock.ms_to_next_minute(up);
            prop_assert!(wait >= 1 && wait <= 60_000);
        }

        #[test]
        fn always_five_chars(hour in 0u8..24, minute in 0u8..60, use_24h in any::<bool>()) {
            let text = format_time(at(hour, minute), use_24h);
            prop_assert_eq!(text.as_str().len(), TIME_TEXT_LEN);
            prop_assert_eq!(&text.as_str()[2..3], ":");
        }

        #[test]
        fn twelve_hour_range(hour in 0u8..24, minute in 0u8..60) {
            let text = format_time(at(hour, minute), false);
            let shown: u8 = text.as_str()[..2].parse().unwrap();
            prop_assert!((1..=12).contains(&shown));
        }

        #[test]
        fn from_unix_is_valid(secs in any::<i64>(), offset in -720i32..=840) {
            let t = WallTime::from_unix(secs, offset);
            prop_assert!(t.hour() < 24 && t.minute() < 60);
        }
    }
}
