//! Companion link protocol
//!
//! This crate defines the UART protocol between the watch and its paired
//! companion (a phone bridge or BLE module). The companion fetches stock
//! quotes; the watch only asks for refreshes and renders what it receives.
//!
//! # Protocol Overview
//!
//! Every message travels in a binary frame:
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B   │ 0–250B      │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! App messages carry a key/value [`Dictionary`] and are acknowledged by the
//! receiving side with an ACK or NACK carrying the same transaction id.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod dictionary;
pub mod frame;
pub mod keys;
pub mod messages;

pub use dictionary::{Dictionary, DictionaryError, Tuple, TupleValue, MAX_TEXT_LEN, MAX_TUPLES};
pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use keys::{quote_message, refresh_request, QuoteKey, REFRESH_KEY, REFRESH_MARKER};
pub use messages::{app_message_txn, CompanionMessage, NackReason, WatchMessage};
