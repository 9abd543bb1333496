use chrono::DateTime;
use log::*;

use crate::{
    db_types::{NormalizedTransfer, Order},
    traits::ChatSink,
};

/// Pushes a human-readable payment-success message to the operator chat sink. One attempt, best-effort; a delivery
/// failure is logged and swallowed so the reconciliation pass never blocks on the chat channel.
#[derive(Debug, Clone)]
pub struct Notifier<S> {
    sink: S,
}

impl<S: ChatSink> Notifier<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub async fn payment_received(&self, order: &Order, transfer: &NormalizedTransfer) {
        let message = payment_received_message(order, transfer);
        if let Err(e) = self.sink.send(&message).await {
            warn!("🤖️ Could not deliver the payment notification for order {}: {e}", order.trade_id);
        }
    }
}

/// Formats the operator notification for a settled order.
pub fn payment_received_message(order: &Order, transfer: &NormalizedTransfer) -> String {
    format!(
        "📢 A new payment has come through!\n\
         Trade id: {}\n\
         Order id: {}\n\
         Requested: {:.2} {}\n\
         Paid: {}\n\
         Wallet: {}\n\
         Order created: {}\n\
         Paid at: {}",
        order.trade_id,
        order.order_id,
        order.fiat_amount,
        order.fiat_currency,
        order.actual_amount,
        order.wallet_address,
        order.created_at.format("%Y-%m-%d %H:%M:%S"),
        format_timestamp_ms(transfer.timestamp_ms),
    )
}

fn format_timestamp_ms(timestamp_ms: i64) -> String {
    match DateTime::from_timestamp_millis(timestamp_ms) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format!("{timestamp_ms}ms"),
    }
}
