//! Tick task for minute updates
//!
//! Sleeps until the next wall-clock minute and tells the controller. A time
//! sync from the companion wakes it early so the new time shows at once and
//! the following ticks line up with the synced minute.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::Timer;

use crate::channels::{ControllerEvent, CLOCK_SYNCED, EVENT_CHANNEL};
use crate::clock;

/// Tick task - sends a tick at the start of every minute
#[embassy_executor::task]
pub async fn tick_task() {
    info!("Tick task started");

    loop {
        let wait_ms = clock::ms_to_next_minute();

        let event = match select(Timer::after_millis(wait_ms), CLOCK_SYNCED.wait()).await {
            Either::First(()) => ControllerEvent::Tick(clock::now()),
            Either::Second(()) => {
                debug!("Clock synced, realigning ticks");
                ControllerEvent::TimeSynced(clock::now())
            }
        };

        EVENT_CHANNEL.send(event).await;
    }
}
