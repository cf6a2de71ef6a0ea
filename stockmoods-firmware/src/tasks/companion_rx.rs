//! Companion UART receive task
//!
//! Receives frames from the companion, acknowledges its app messages and
//! dispatches everything else.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use stockmoods_core::link::DropReason;
use stockmoods_protocol::{
    app_message_txn, CompanionMessage, Frame, FrameParser, NackReason, WatchMessage,
};

use crate::channels::{
    ControllerEvent, LinkAck, CLOCK_SYNCED, EVENT_CHANNEL, LINK_ACK, REPLY_CHANNEL,
};
use crate::clock;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Companion RX task - receives and parses frames from the companion
#[embassy_executor::task]
pub async fn companion_rx_task(mut rx: BufferedUartRx) {
    info!("Companion RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => handle_frame(&frame).await,
                        Ok(None) => {
                            // Need more bytes
                        }
                        Err(e) => {
                            warn!("Frame parse error: {:?}", e);
                            report_drop(DropReason::Framing).await;
                        }
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Handle a complete frame from the companion
async fn handle_frame(frame: &Frame) {
    let msg = match CompanionMessage::from_frame(frame) {
        Ok(msg) => msg,
        Err(e) => {
            warn!("Failed to parse companion message: {:?}", e);
            if let Some(txn) = app_message_txn(frame) {
                reply(WatchMessage::Nack {
                    txn,
                    reason: NackReason::Malformed,
                });
            }
            report_drop(DropReason::Malformed).await;
            return;
        }
    };

    match msg {
        CompanionMessage::AppMessage { txn, dict } => {
            debug!("App message txn={} with {} tuples", txn, dict.len());
            match EVENT_CHANNEL.try_send(ControllerEvent::Inbox(dict)) {
                Ok(()) => reply(WatchMessage::Ack { txn }),
                Err(_) => {
                    reply(WatchMessage::Nack {
                        txn,
                        reason: NackReason::Busy,
                    });
                    report_drop(DropReason::InboxFull).await;
                }
            }
        }
        CompanionMessage::Ack { txn } => {
            trace!("ACK txn={}", txn);
            LINK_ACK.signal(LinkAck { txn, result: Ok(()) });
        }
        CompanionMessage::Nack { txn, reason } => {
            trace!("NACK txn={} reason={:?}", txn, reason);
            LINK_ACK.signal(LinkAck {
                txn,
                result: Err(reason),
            });
        }
        CompanionMessage::TimeSync {
            unix_s,
            utc_offset_min,
        } => {
            info!("Time sync: unix={} offset={}min", unix_s, utc_offset_min);
            clock::sync(unix_s, utc_offset_min);
            CLOCK_SYNCED.signal(());
        }
    }
}

/// Queue an ACK/NACK for the TX task, dropping it if the queue is full
fn reply(msg: WatchMessage) {
    if REPLY_CHANNEL.try_send(msg).is_err() {
        warn!("Reply channel full, dropping reply");
    }
}

/// Tell the controller a message was discarded
///
/// Waits for room in the event queue, so drops caused by a full queue are
/// still counted once the controller catches up.
async fn report_drop(reason: DropReason) {
    EVENT_CHANNEL
        .send(ControllerEvent::InboxDropped(reason))
        .await;
}
