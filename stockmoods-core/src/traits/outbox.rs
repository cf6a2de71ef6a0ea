//! Outbound link to the companion

use stockmoods_protocol::Dictionary;

use crate::link::SendFailure;

/// Queue for dictionaries bound for the companion
///
/// `send` only enqueues. Delivery is reported later through
/// [`App::on_outbox_sent`](crate::App::on_outbox_sent) or
/// [`App::on_outbox_failed`](crate::App::on_outbox_failed).
pub trait Outbox {
    fn send(&mut self, dict: Dictionary) -> Result<(), SendFailure>;
}
