//! Companion link outcomes
//!
//! Nothing here is retried. A dropped quote leaves the previous one on
//! screen, and a failed refresh request waits for the next cadence boundary.

use stockmoods_protocol::NackReason;

/// Why an inbound message never reached the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DropReason {
    /// Frame failed its checksum or length check
    Framing,
    /// Frame was intact but its dictionary was not
    Malformed,
    /// Inbox queue was full
    InboxFull,
}

/// Why an outbound message was not delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendFailure {
    /// Companion answered with a NACK
    Rejected(NackReason),
    /// No ACK within the configured timeout
    Timeout,
    /// Outbox queue was full
    OutboxFull,
    /// Message could not be encoded
    Encoding,
    /// UART write failed
    Io,
}

/// Transport errors reported to the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Inbound message discarded before decode
    Dropped(DropReason),
    /// Outbound message failed
    SendFailed(SendFailure),
}

/// Counters of link activity since boot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStats {
    /// Quote messages decoded
    pub received: u32,
    /// Inbound messages dropped before decode
    pub dropped: u32,
    /// Refresh requests handed to the outbox
    pub requested: u32,
    /// Refresh requests acknowledged
    pub sent: u32,
    /// Refresh requests that failed
    pub failed: u32,
    /// Decode warnings raised
    pub warnings: u32,
    /// Last transport error seen
    pub last_error: Option<TransportError>,
}
