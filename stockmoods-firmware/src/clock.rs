//! Wall clock and 12/24-hour preference shared between tasks

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Instant;
use portable_atomic::{AtomicBool, Ordering};

use stockmoods_core::traits::ClockPreference;
use stockmoods_core::{ClockSync, WallTime};

static CLOCK: Mutex<CriticalSectionRawMutex, Cell<ClockSync>> =
    Mutex::new(Cell::new(ClockSync::new()));

static USE_24H: AtomicBool = AtomicBool::new(true);

fn uptime_ms() -> u64 {
    Instant::now().as_millis()
}

/// Local time now
pub fn now() -> WallTime {
    CLOCK.lock(|clock| clock.get().now(uptime_ms()))
}

/// Milliseconds until the next minute starts
pub fn ms_to_next_minute() -> u64 {
    CLOCK.lock(|clock| clock.get().ms_to_next_minute(uptime_ms()))
}

/// Set the clock from a companion time sync
pub fn sync(unix_s: i64, utc_offset_min: i16) {
    CLOCK.lock(|clock| {
        let mut synced = clock.get();
        synced.sync(unix_s, utc_offset_min as i32, uptime_ms());
        clock.set(synced);
    });
}

pub fn set_use_24h(use_24h: bool) {
    USE_24H.store(use_24h, Ordering::Relaxed);
}

/// Flip the preference, returning the new value
pub fn toggle_use_24h() -> bool {
    !USE_24H.fetch_xor(true, Ordering::Relaxed)
}

/// Reads the shared flag on every call
pub struct SharedPreference;

impl ClockPreference for SharedPreference {
    fn use_24h(&self) -> bool {
        USE_24H.load(Ordering::Relaxed)
    }
}
