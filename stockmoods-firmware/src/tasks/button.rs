//! Button task
//!
//! Short press asks the companion for a fresh quote; long press toggles
//! between 12- and 24-hour time.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{with_timeout, Duration, Instant, Timer};

use crate::channels::{ControllerEvent, EVENT_CHANNEL};
use crate::clock;

/// Hold time that makes a press long
const LONG_PRESS_MS: u64 = 500;

/// Presses shorter than this are contact bounce
const MIN_PRESS_MS: u64 = 50;

const DEBOUNCE_MS: u64 = 20;

/// Button press task (button pulls the pin low)
#[embassy_executor::task]
pub async fn button_task(mut btn: Input<'static>) {
    info!("Button task started");

    loop {
        btn.wait_for_falling_edge().await;
        let press_start = Instant::now();

        // Debounce
        Timer::after(Duration::from_millis(DEBOUNCE_MS)).await;
        if btn.is_high() {
            continue;
        }

        let released = with_timeout(
            Duration::from_millis(LONG_PRESS_MS),
            btn.wait_for_rising_edge(),
        )
        .await;

        match released {
            Ok(()) => {
                if press_start.elapsed().as_millis() > MIN_PRESS_MS {
                    debug!("Button: Click");
                    EVENT_CHANNEL.send(ControllerEvent::RefreshRequested).await;
                }
            }
            Err(_) => {
                let use_24h = clock::toggle_use_24h();
                info!("Button: LongPress, 24h={}", use_24h);
                EVENT_CHANNEL
                    .send(ControllerEvent::PreferenceChanged(clock::now()))
                    .await;
                // Wait for actual release
                btn.wait_for_rising_edge().await;
            }
        }

        // Debounce after release
        Timer::after(Duration::from_millis(MIN_PRESS_MS)).await;
    }
}
