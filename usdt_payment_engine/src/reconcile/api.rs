use std::fmt::Debug;

use log::*;
use thiserror::Error;

use crate::{
    db_types::{NormalizedTransfer, Order, TradeId},
    reconcile::{CallbackDispatcher, Notifier},
    traits::{CallbackQueue, ChatSink, CompleteOrderResult, GatewayDatabase, GatewayDatabaseError},
};

/// `ReconcileApi` is the primary API for settling orders in response to observed wallet transfers.
///
/// It is generic over the three collaborators: the persistence backend `B`, the callback queue `Q` and the chat
/// sink `S`. One instance is shared by every wallet pass of a tick, so all three must tolerate concurrent use.
#[derive(Clone)]
pub struct ReconcileApi<B, Q, S> {
    db: B,
    dispatcher: CallbackDispatcher<Q>,
    notifier: Notifier<S>,
}

impl<B, Q, S> Debug for ReconcileApi<B, Q, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReconcileApi")
    }
}

#[derive(Debug, Clone, Error)]
pub enum ReconcileError {
    /// The matched order was created *after* the transfer was timestamped on-chain. Either clock skew, or an amount
    /// collision with a stale order; never complete the order from this transfer.
    #[error("Transfer {tx_hash} predates the creation of order {trade_id}")]
    TemporalInversion { trade_id: TradeId, tx_hash: String },
    #[error("{0}")]
    Database(#[from] GatewayDatabaseError),
}

impl<B, Q, S> ReconcileApi<B, Q, S>
where
    B: GatewayDatabase,
    Q: CallbackQueue,
    S: ChatSink,
{
    pub fn new(db: B, queue: Q, sink: S) -> Self {
        Self { db, dispatcher: CallbackDispatcher::new(queue), notifier: Notifier::new(sink) }
    }

    /// Runs one filtered transfer through the reconciliation sequence.
    ///
    /// Returns `Ok(Some(order))` when the transfer settled an order in this invocation, and `Ok(None)` when there
    /// was nothing to do: no pending order matches the (wallet, amount) pair, or the matched order was already paid
    /// (the same transfer re-appearing in an overlapping poll window). The callback job and the operator
    /// notification fire only on the `Some` path, so re-observing a transfer can never re-trigger them.
    pub async fn process_transfer(&self, transfer: &NormalizedTransfer) -> Result<Option<Order>, ReconcileError> {
        let wallet = transfer.wallet_address.as_str();
        let Some(trade_id) = self.db.trade_id_for_deposit(wallet, transfer.amount).await? else {
            trace!("💰️ No pending order on wallet {wallet} for {}", transfer.amount);
            return Ok(None);
        };
        let order = self.db.order_by_trade_id(&trade_id).await?;
        if transfer.timestamp_ms < order.created_at.timestamp_millis() {
            return Err(ReconcileError::TemporalInversion { trade_id, tx_hash: transfer.tx_hash.clone() });
        }
        let order = match self.db.complete_order(&trade_id, transfer.amount, &transfer.tx_hash).await? {
            CompleteOrderResult::Completed(order) => order,
            CompleteOrderResult::AlreadyPaid => {
                debug!("💰️ Order {trade_id} is already paid. Ignoring transfer {}", transfer.tx_hash);
                return Ok(None);
            },
        };
        info!("💰️ Order {} settled by transfer {} for {}", order.trade_id, transfer.tx_hash, order.actual_amount);
        if let Err(e) = self.dispatcher.dispatch(&order).await {
            // The paid state is final either way; callback delivery has its own retry budget in the queue.
            error!("📬️ Could not enqueue the callback job for order {}: {e}", order.trade_id);
        }
        self.notifier.payment_received(&order, transfer).await;
        Ok(Some(order))
    }
}
