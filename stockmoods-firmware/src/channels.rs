//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! The controller task is the only owner of the watchface state; everything
//! else reaches it through [`EVENT_CHANNEL`].

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use stockmoods_core::link::{DropReason, SendFailure};
use stockmoods_core::{Surface, WallTime};
use stockmoods_protocol::{Dictionary, NackReason, WatchMessage};

/// Channel capacity for controller events
const EVENT_CHANNEL_SIZE: usize = 8;

/// Channel capacity for outbound app messages
const OUTBOX_CHANNEL_SIZE: usize = 2;

/// Channel capacity for ACK/NACK replies to the companion
const REPLY_CHANNEL_SIZE: usize = 4;

/// Events handled by the controller task
pub enum ControllerEvent {
    /// A new minute started
    Tick(WallTime),
    /// The companion set the clock
    TimeSynced(WallTime),
    /// The 12/24-hour preference was toggled
    PreferenceChanged(WallTime),
    /// The user asked for a refresh
    RefreshRequested,
    /// A quote message arrived
    Inbox(Dictionary),
    /// An inbound message was discarded
    InboxDropped(DropReason),
    /// An outbound message was acknowledged
    OutboxSent,
    /// An outbound message was not delivered
    OutboxFailed(SendFailure),
}

/// Companion's answer to one of our app messages
#[derive(Clone, Copy)]
pub struct LinkAck {
    pub txn: u8,
    pub result: Result<(), NackReason>,
}

/// Events for the controller task
pub static EVENT_CHANNEL: Channel<CriticalSectionRawMutex, ControllerEvent, EVENT_CHANNEL_SIZE> =
    Channel::new();

/// App messages waiting to be sent to the companion
pub static OUTBOX_CHANNEL: Channel<CriticalSectionRawMutex, Dictionary, OUTBOX_CHANNEL_SIZE> =
    Channel::new();

/// ACK/NACK replies for companion app messages
pub static REPLY_CHANNEL: Channel<CriticalSectionRawMutex, WatchMessage, REPLY_CHANNEL_SIZE> =
    Channel::new();

/// ACK/NACK received from the companion (companion RX → companion TX)
pub static LINK_ACK: Signal<CriticalSectionRawMutex, LinkAck> = Signal::new();

/// The companion synced the clock (companion RX → tick)
pub static CLOCK_SYNCED: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Latest screen content (controller → display)
pub static SURFACE_UPDATE: Signal<CriticalSectionRawMutex, Surface> = Signal::new();
