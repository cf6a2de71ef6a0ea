//! Message types for the companion link
//!
//! Message types are divided into two categories:
//! - Companion → Watch: app messages (quotes), acknowledgements, time sync
//! - Watch → Companion: app messages (refresh requests), acknowledgements

use heapless::Vec;

use crate::dictionary::Dictionary;
use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};

// Message type IDs: Companion → Watch
pub const MSG_COMPANION_APP: u8 = 0x10;
pub const MSG_COMPANION_ACK: u8 = 0x11;
pub const MSG_COMPANION_NACK: u8 = 0x12;
pub const MSG_TIME_SYNC: u8 = 0x13;

// Message type IDs: Watch → Companion
pub const MSG_WATCH_APP: u8 = 0x30;
pub const MSG_WATCH_ACK: u8 = 0x31;
pub const MSG_WATCH_NACK: u8 = 0x32;

/// Why a receiver refused an app message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NackReason {
    /// Receiver had no room to queue the message
    Busy,
    /// Dictionary could not be decoded
    Malformed,
    /// Receiver is not running an app that accepts messages
    NotRunning,
    /// Reason byte this side does not know
    Other(u8),
}

// Wire format values
const NACK_BUSY: u8 = 0x01;
const NACK_MALFORMED: u8 = 0x02;
const NACK_NOT_RUNNING: u8 = 0x03;

impl NackReason {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            NACK_BUSY => NackReason::Busy,
            NACK_MALFORMED => NackReason::Malformed,
            NACK_NOT_RUNNING => NackReason::NotRunning,
            other => NackReason::Other(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            NackReason::Busy => NACK_BUSY,
            NackReason::Malformed => NACK_MALFORMED,
            NackReason::NotRunning => NACK_NOT_RUNNING,
            NackReason::Other(b) => b,
        }
    }
}

/// Messages from the companion to the watch
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CompanionMessage {
    /// Key/value app message (a stock quote)
    AppMessage { txn: u8, dict: Dictionary },
    /// The watch's app message `txn` was delivered
    Ack { txn: u8 },
    /// The watch's app message `txn` was refused
    Nack { txn: u8, reason: NackReason },
    /// Wall-clock time
    TimeSync { unix_s: i64, utc_offset_min: i16 },
}

impl CompanionMessage {
    /// Parse a companion message from a frame
    ///
    /// App message payloads that fail dictionary decoding are reported as
    /// [`FrameError::InvalidFrame`]; use [`app_message_txn`] to recover the
    /// transaction id for a NACK.
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let payload = &frame.payload[..];
        match frame.msg_type {
            MSG_COMPANION_APP => {
                let (&txn, body) = payload.split_first().ok_or(FrameError::InvalidFrame)?;
                let dict = Dictionary::decode(body).map_err(|_| FrameError::InvalidFrame)?;
                Ok(CompanionMessage::AppMessage { txn, dict })
            }
            MSG_COMPANION_ACK => match payload {
                &[txn] => Ok(CompanionMessage::Ack { txn }),
                _ => Err(FrameError::InvalidFrame),
            },
            MSG_COMPANION_NACK => match payload {
                &[txn, reason] => Ok(CompanionMessage::Nack {
                    txn,
                    reason: NackReason::from_byte(reason),
                }),
                _ => Err(FrameError::InvalidFrame),
            },
            MSG_TIME_SYNC => {
                if payload.len() != 10 {
                    return Err(FrameError::InvalidFrame);
                }
                let mut secs = [0u8; 8];
                secs.copy_from_slice(&payload[..8]);
                Ok(CompanionMessage::TimeSync {
                    unix_s: i64::from_le_bytes(secs),
                    utc_offset_min: i16::from_le_bytes([payload[8], payload[9]]),
                })
            }
            _ => Err(FrameError::InvalidFrame),
        }
    }

    /// Encode this message into a frame (for testing or simulation)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            CompanionMessage::AppMessage { txn, dict } => app_frame(MSG_COMPANION_APP, *txn, dict),
            CompanionMessage::Ack { txn } => Frame::new(MSG_COMPANION_ACK, &[*txn]),
            CompanionMessage::Nack { txn, reason } => {
                Frame::new(MSG_COMPANION_NACK, &[*txn, reason.to_byte()])
            }
            CompanionMessage::TimeSync {
                unix_s,
                utc_offset_min,
            } => {
                let mut payload = [0u8; 10];
                payload[..8].copy_from_slice(&unix_s.to_le_bytes());
                payload[8..].copy_from_slice(&utc_offset_min.to_le_bytes());
                Frame::new(MSG_TIME_SYNC, &payload)
            }
        }
    }
}

/// Transaction id of a companion app message frame, even if its dictionary is bad
pub fn app_message_txn(frame: &Frame) -> Option<u8> {
    if frame.msg_type == MSG_COMPANION_APP {
        frame.payload.first().copied()
    } else {
        None
    }
}

/// Messages from the watch to the companion
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatchMessage {
    /// Key/value app message (a refresh request)
    AppMessage { txn: u8, dict: Dictionary },
    /// The companion's app message `txn` was accepted
    Ack { txn: u8 },
    /// The companion's app message `txn` was refused
    Nack { txn: u8, reason: NackReason },
}

impl WatchMessage {
    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            WatchMessage::AppMessage { txn, dict } => app_frame(MSG_WATCH_APP, *txn, dict),
            WatchMessage::Ack { txn } => Frame::new(MSG_WATCH_ACK, &[*txn]),
            WatchMessage::Nack { txn, reason } => {
                Frame::new(MSG_WATCH_NACK, &[*txn, reason.to_byte()])
            }
        }
    }

    /// Parse a watch message from a frame (for testing or simulation)
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let payload = &frame.payload[..];
        match frame.msg_type {
            MSG_WATCH_APP => {
                let (&txn, body) = payload.split_first().ok_or(FrameError::InvalidFrame)?;
                let dict = Dictionary::decode(body).map_err(|_| FrameError::InvalidFrame)?;
                Ok(WatchMessage::AppMessage { txn, dict })
            }
            MSG_WATCH_ACK => match payload {
                &[txn] => Ok(WatchMessage::Ack { txn }),
                _ => Err(FrameError::InvalidFrame),
            },
            MSG_WATCH_NACK => match payload {
                &[txn, reason] => Ok(WatchMessage::Nack {
                    txn,
                    reason: NackReason::from_byte(reason),
                }),
                _ => Err(FrameError::InvalidFrame),
            },
            _ => Err(FrameError::InvalidFrame),
        }
    }
}

/// Payload: [txn][dictionary...]
fn app_frame(msg_type: u8, txn: u8, dict: &Dictionary) -> Result<Frame, FrameError> {
    let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
    payload.push(txn).map_err(|_| FrameError::PayloadTooLarge)?;
    dict.encode_into(&mut payload)
        .map_err(|_| FrameError::PayloadTooLarge)?;
    Ok(Frame {
        msg_type,
        payload,
    })
}
