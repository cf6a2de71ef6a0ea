//! Watchface application state
//!
//! [`App`] is owned by whichever task runs the event loop and is handed by
//! `&mut` to each callback. Callbacks run to completion and never block.

use stockmoods_protocol::{refresh_request, Dictionary};

use crate::clock::{format_time, DisplayTime, WallTime};
use crate::link::{DropReason, LinkStats, SendFailure, TransportError};
use crate::quote::{decode_quote, DecodeWarnings, QuoteSignal};
use crate::refresh::RefreshScheduler;
use crate::surface::Surface;
use crate::traits::{ClockPreference, Outbox};

/// What a tick did about refreshing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefreshOutcome {
    /// Not a cadence boundary
    NotDue,
    /// Refresh request queued
    Requested,
    /// Refresh request could not be queued
    Failed(SendFailure),
}

/// Result of a minute tick
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    pub time: DisplayTime,
    pub refresh: RefreshOutcome,
}

/// Watchface state
#[derive(Debug, Clone)]
pub struct App {
    surface: Surface,
    quote: QuoteSignal,
    scheduler: RefreshScheduler,
    stats: LinkStats,
    /// Minute of the last tick, so a clock sync can catch a skipped one
    last_tick: Option<WallTime>,
}

impl Default for App {
    fn default() -> Self {
        Self::new(RefreshScheduler::default())
    }
}

impl App {
    pub fn new(scheduler: RefreshScheduler) -> Self {
        Self {
            surface: Surface::new(),
            quote: QuoteSignal::new(),
            scheduler,
            stats: LinkStats::default(),
            last_tick: None,
        }
    }

    /// Minute tick: update the clock and request a refresh on cadence boundaries
    pub fn on_tick(
        &mut self,
        now: WallTime,
        preference: &impl ClockPreference,
        outbox: &mut impl Outbox,
    ) -> TickReport {
        let time = self.show_time(now, preference);
        self.last_tick = Some(now);

        let refresh = if self.scheduler.due(now) {
            match self.refresh_now(outbox) {
                Ok(()) => RefreshOutcome::Requested,
                Err(reason) => RefreshOutcome::Failed(reason),
            }
        } else {
            RefreshOutcome::NotDue
        };

        TickReport { time, refresh }
    }

    /// The clock was set from the companion
    ///
    /// A sync that lands in a new minute takes the place of that minute's
    /// tick, so a cadence boundary crossed by the jump still refreshes. A sync
    /// within the last ticked minute only redraws the time.
    pub fn on_time_synced(
        &mut self,
        now: WallTime,
        preference: &impl ClockPreference,
        outbox: &mut impl Outbox,
    ) -> TickReport {
        if self.last_tick == Some(now) {
            TickReport {
                time: self.show_time(now, preference),
                refresh: RefreshOutcome::NotDue,
            }
        } else {
            self.on_tick(now, preference, outbox)
        }
    }

    /// Format `now` with the current preference and put it on the surface
    ///
    /// Used directly when the clock or preference changes between ticks.
    pub fn show_time(&mut self, now: WallTime, preference: &impl ClockPreference) -> DisplayTime {
        let time = format_time(now, preference.use_24h());
        self.surface.set_time(&time);
        time
    }

    /// Queue a refresh request regardless of the cadence
    pub fn refresh_now(&mut self, outbox: &mut impl Outbox) -> Result<(), SendFailure> {
        match outbox.send(refresh_request()) {
            Ok(()) => {
                self.stats.requested = self.stats.requested.wrapping_add(1);
                Ok(())
            }
            Err(reason) => {
                self.on_outbox_failed(reason);
                Err(reason)
            }
        }
    }

    /// A quote message arrived
    ///
    /// Fields present in the message are committed together, then the quote
    /// line is recomposed once. The icon only changes if a mood code arrived.
    pub fn on_inbox_received(&mut self, dict: &Dictionary) -> DecodeWarnings {
        let (update, warnings) = decode_quote(dict);
        self.stats.received = self.stats.received.wrapping_add(1);
        self.stats.warnings = self.stats.warnings.wrapping_add(warnings.len() as u32);

        if !update.is_empty() {
            let mood_arrived = update.mood_code.is_some();
            self.quote.apply(update);
            if mood_arrived {
                self.surface.set_icon(self.quote.icon());
            }
            self.surface.set_quote(&self.quote.display_text());
        }

        warnings
    }

    /// An inbound message was discarded before decoding
    pub fn on_inbox_dropped(&mut self, reason: DropReason) {
        self.stats.dropped = self.stats.dropped.wrapping_add(1);
        self.stats.last_error = Some(TransportError::Dropped(reason));
    }

    /// A refresh request was not delivered
    pub fn on_outbox_failed(&mut self, reason: SendFailure) {
        self.stats.failed = self.stats.failed.wrapping_add(1);
        self.stats.last_error = Some(TransportError::SendFailed(reason));
    }

    /// A refresh request was acknowledged
    pub fn on_outbox_sent(&mut self) {
        self.stats.sent = self.stats.sent.wrapping_add(1);
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }
}
