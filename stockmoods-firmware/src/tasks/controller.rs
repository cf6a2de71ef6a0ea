//! Controller task
//!
//! Owns the watchface [`App`] and feeds it every event. After each event the
//! surface is published to the display task if anything on it changed.

use defmt::*;

use stockmoods_core::config::WatchConfig;
use stockmoods_core::link::SendFailure;
use stockmoods_core::refresh::RefreshScheduler;
use stockmoods_core::traits::Outbox;
use stockmoods_core::{App, RefreshOutcome};
use stockmoods_protocol::Dictionary;

use crate::channels::{ControllerEvent, EVENT_CHANNEL, OUTBOX_CHANNEL, SURFACE_UPDATE};
use crate::clock::SharedPreference;

/// Outbox backed by the companion TX task's queue
struct ChannelOutbox;

impl Outbox for ChannelOutbox {
    fn send(&mut self, dict: Dictionary) -> Result<(), SendFailure> {
        OUTBOX_CHANNEL
            .try_send(dict)
            .map_err(|_| SendFailure::OutboxFull)
    }
}

/// Main controller task
#[embassy_executor::task]
pub async fn controller_task(config: &'static WatchConfig) {
    info!("Controller task started");

    let mut app = App::new(RefreshScheduler::new(config.refresh.cadence_min));
    let mut outbox = ChannelOutbox;
    let preference = SharedPreference;
    let mut synced_once = false;

    publish(&mut app);

    loop {
        match EVENT_CHANNEL.receive().await {
            ControllerEvent::Tick(now) => {
                let report = app.on_tick(now, &preference, &mut outbox);
                trace!("Tick {}", report.time.as_str());
                log_refresh(report.refresh);
            }
            ControllerEvent::TimeSynced(now) => {
                let report = app.on_time_synced(now, &preference, &mut outbox);
                debug!("Clock synced to {}", report.time.as_str());
                log_refresh(report.refresh);
                if !synced_once {
                    synced_once = true;
                    if config.refresh.request_on_boot {
                        request_refresh(&mut app, &mut outbox);
                    }
                }
            }
            ControllerEvent::PreferenceChanged(now) => {
                app.show_time(now, &preference);
            }
            ControllerEvent::RefreshRequested => {
                request_refresh(&mut app, &mut outbox);
            }
            ControllerEvent::Inbox(dict) => {
                for warning in app.on_inbox_received(&dict) {
                    warn!("Quote decode: {:?}", warning);
                }
                debug!(
                    "Quote: '{}' mood={:?}",
                    app.surface().quote(),
                    app.surface().icon()
                );
            }
            ControllerEvent::InboxDropped(reason) => {
                error!("Inbox dropped: {:?}", reason);
                app.on_inbox_dropped(reason);
            }
            ControllerEvent::OutboxSent => {
                debug!("Refresh request delivered");
                app.on_outbox_sent();
            }
            ControllerEvent::OutboxFailed(reason) => {
                error!("Outbox failed: {:?}", reason);
                app.on_outbox_failed(reason);
            }
        }

        publish(&mut app);
    }
}

fn request_refresh(app: &mut App, outbox: &mut ChannelOutbox) {
    match app.refresh_now(outbox) {
        Ok(()) => info!("Refresh requested"),
        Err(reason) => error!("Refresh request failed: {:?}", reason),
    }
}

fn log_refresh(outcome: RefreshOutcome) {
    match outcome {
        RefreshOutcome::NotDue => {}
        RefreshOutcome::Requested => info!("Refresh requested"),
        RefreshOutcome::Failed(reason) => error!("Refresh request failed: {:?}", reason),
    }
}

/// Hand the surface to the display task if any region changed
fn publish(app: &mut App) {
    if app.surface_mut().take_dirty().any() {
        SURFACE_UPDATE.signal(app.surface().clone());
    }
}
