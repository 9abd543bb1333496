use thiserror::Error;
use upg_common::MicroUsdt;

use crate::db_types::{Chain, Order, TradeId, WatchedWallet};

/// The persistence layer behind the payment gateway, as seen by the reconciliation engine.
///
/// The engine never maintains its own ledger of observed transfers. Reprocessing is prevented by the lookup
/// semantics of this trait: [`GatewayDatabase::trade_id_for_deposit`] only ever returns *pending* orders, so a
/// transfer that already settled an order simply stops matching. Double completion is prevented by the transition
/// guard in [`GatewayDatabase::complete_order`], which backends must implement as a single-row compare-and-set.
///
/// Implementations must be cheap to clone and safe for concurrent use; one tick polls every wallet in parallel
/// against the same handle.
#[allow(async_fn_in_trait)]
pub trait GatewayDatabase: Clone {
    /// Fetches every enabled wallet on the given chain. Disabled wallets are never polled.
    async fn enabled_wallets(&self, chain: Chain) -> Result<Vec<WatchedWallet>, GatewayDatabaseError>;

    /// Looks up the pending order expecting exactly `amount` on `wallet`.
    ///
    /// Matching is exact integer equality on the micro-unit amount; there is no tolerance band. If several pending
    /// orders on one wallet share an amount, the backend returns the first match — amount uniqueness per wallet is
    /// an upstream order-creation invariant, not something this engine enforces.
    async fn trade_id_for_deposit(&self, wallet: &str, amount: MicroUsdt) -> Result<Option<TradeId>, GatewayDatabaseError>;

    /// Fetches the order for the given trade id.
    async fn order_by_trade_id(&self, trade_id: &TradeId) -> Result<Order, GatewayDatabaseError>;

    /// Transitions the order from `Pending` to `Paid`, recording the on-chain transaction hash and the settled
    /// amount as proof.
    ///
    /// The transition must be guarded: if the order is already `Paid` (for example because the same transfer was
    /// observed in two overlapping poll windows, or a concurrent tick won the race), the backend returns
    /// [`CompleteOrderResult::AlreadyPaid`] and changes nothing. The caller treats that as a benign no-op.
    async fn complete_order(
        &self,
        trade_id: &TradeId,
        amount: MicroUsdt,
        tx_hash: &str,
    ) -> Result<CompleteOrderResult, GatewayDatabaseError>;

    /// The incremental poll cursor for a Polygon wallet: the block to start the next transfer-history query from.
    /// `None` means no cursor has been recorded yet and the wallet's pass is skipped for this tick.
    async fn poll_start_block(&self, wallet: &str) -> Result<Option<u64>, GatewayDatabaseError>;
}

/// The outcome of a completion attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CompleteOrderResult {
    /// The transition happened in this invocation. Downstream effects (callback, notification) may fire.
    Completed(Order),
    /// The order was already paid by an earlier invocation or a concurrent path. Nothing changed.
    AlreadyPaid,
}

#[derive(Debug, Clone, Error)]
pub enum GatewayDatabaseError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(TradeId),
}
