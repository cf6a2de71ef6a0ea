//! Companion UART transmit task
//!
//! Sends ACK/NACK replies and the watch's app messages. One app message is
//! in flight at a time; it counts as sent when the companion ACKs it and as
//! failed on NACK or when no ACK arrives in time.

use defmt::*;
use embassy_futures::select::{select, select3, Either, Either3};
use embassy_rp::uart::BufferedUartTx;
use embassy_time::{Duration, Instant, Timer};
use embedded_io_async::Write;

use stockmoods_core::link::SendFailure;
use stockmoods_protocol::WatchMessage;

use crate::channels::{ControllerEvent, EVENT_CHANNEL, LINK_ACK, OUTBOX_CHANNEL, REPLY_CHANNEL};

/// App message awaiting the companion's ACK
#[derive(Clone, Copy)]
struct Pending {
    txn: u8,
    deadline: Instant,
}

/// Companion TX task - sends frames to the companion
#[embassy_executor::task]
pub async fn companion_tx_task(mut tx: BufferedUartTx, ack_timeout_ms: u32) {
    info!("Companion TX task started");

    let ack_timeout = Duration::from_millis(ack_timeout_ms as u64);
    let mut next_txn: u8 = 0;
    let mut pending: Option<Pending> = None;

    loop {
        match pending {
            None => match select(REPLY_CHANNEL.receive(), OUTBOX_CHANNEL.receive()).await {
                Either::First(reply) => {
                    if let Err(e) = send(&mut tx, &reply).await {
                        warn!("Failed to send reply: {:?}", e);
                    }
                }
                Either::Second(dict) => {
                    let txn = next_txn;
                    next_txn = next_txn.wrapping_add(1);
                    // A late ACK for an earlier message must not match this one
                    LINK_ACK.reset();

                    match send(&mut tx, &WatchMessage::AppMessage { txn, dict }).await {
                        Ok(()) => {
                            debug!("App message txn={} sent, awaiting ACK", txn);
                            pending = Some(Pending {
                                txn,
                                deadline: Instant::now() + ack_timeout,
                            });
                        }
                        Err(reason) => report(ControllerEvent::OutboxFailed(reason)).await,
                    }
                }
            },
            Some(waiting) => {
                match select3(
                    REPLY_CHANNEL.receive(),
                    LINK_ACK.wait(),
                    Timer::at(waiting.deadline),
                )
                .await
                {
                    Either3::First(reply) => {
                        if let Err(e) = send(&mut tx, &reply).await {
                            warn!("Failed to send reply: {:?}", e);
                        }
                    }
                    Either3::Second(ack) if ack.txn == waiting.txn => {
                        pending = None;
                        match ack.result {
                            Ok(()) => report(ControllerEvent::OutboxSent).await,
                            Err(reason) => {
                                report(ControllerEvent::OutboxFailed(SendFailure::Rejected(
                                    reason,
                                )))
                                .await
                            }
                        }
                    }
                    Either3::Second(ack) => {
                        debug!("Ignoring ACK for stale txn={}", ack.txn);
                    }
                    Either3::Third(()) => {
                        pending = None;
                        report(ControllerEvent::OutboxFailed(SendFailure::Timeout)).await;
                    }
                }
            }
        }
    }
}

/// Encode and write one message
async fn send(tx: &mut BufferedUartTx, msg: &WatchMessage) -> Result<(), SendFailure> {
    let frame = msg.to_frame().map_err(|_| SendFailure::Encoding)?;
    let bytes = frame.to_bytes().map_err(|_| SendFailure::Encoding)?;
    tx.write_all(&bytes).await.map_err(|_| SendFailure::Io)?;
    trace!("TX: {} bytes", bytes.len());
    Ok(())
}

async fn report(event: ControllerEvent) {
    EVENT_CHANNEL.send(event).await;
}
