use std::sync::Arc;

use chrono::Utc;
use futures_util::future::join_all;
use log::*;
use thiserror::Error;
use tokio::time::MissedTickBehavior;

use crate::{
    db_types::{Chain, WatchedWallet},
    explorers::{ExplorerError, PollWindow, TransferSource},
    reconcile::{ReconcileApi, ReconcileError},
    traits::{CallbackQueue, ChatSink, GatewayDatabase, GatewayDatabaseError},
};

/// How far back a Tron tick looks for transfers.
pub const TRON_LOOKBACK_HOURS: i64 = 24;

/// What one tick did. Failures are already logged, per wallet, by the time the summary is returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub wallets_polled: usize,
    pub orders_completed: usize,
    pub failed_passes: usize,
}

/// A failure that ended one wallet's pass. Other wallets in the same tick are unaffected.
#[derive(Debug, Clone, Error)]
pub enum WalletPassError {
    #[error("{0}")]
    Explorer(#[from] ExplorerError),
    #[error("{0}")]
    Reconcile(#[from] ReconcileError),
    #[error("{0}")]
    Database(#[from] GatewayDatabaseError),
}

/// Drives one chain's reconciliation: on every tick, fetch the enabled wallet pool, fan out one pass per wallet,
/// and join them all before the tick is considered complete.
///
/// A per-poller mutex serializes whole ticks end-to-end. If a tick overruns the schedule, the next one queues up
/// behind it rather than overlapping it; the scheduler's next fire is delayed by lock contention, never skipped.
#[derive(Clone)]
pub struct WalletPoller<B, X, Q, S> {
    chain: Chain,
    db: B,
    source: X,
    api: ReconcileApi<B, Q, S>,
    tick_lock: Arc<tokio::sync::Mutex<()>>,
}

impl<B, X, Q, S> WalletPoller<B, X, Q, S>
where
    B: GatewayDatabase,
    X: TransferSource,
    Q: CallbackQueue,
    S: ChatSink,
{
    pub fn new(db: B, source: X, queue: Q, sink: S) -> Self {
        let chain = source.chain();
        let api = ReconcileApi::new(db.clone(), queue, sink);
        Self { chain, db, source, api, tick_lock: Arc::new(tokio::sync::Mutex::new(())) }
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    /// Runs one full tick. Holds the tick lock for the duration, so concurrent calls serialize.
    pub async fn run_tick(&self) -> TickSummary {
        let _tick = self.tick_lock.lock().await;
        let wallets = match self.db.enabled_wallets(self.chain).await {
            Ok(wallets) => wallets,
            Err(e) => {
                error!("🔎️ [{}] Could not fetch the wallet pool: {e}", self.chain);
                return TickSummary::default();
            },
        };
        if wallets.is_empty() {
            trace!("🔎️ [{}] No enabled wallets to poll", self.chain);
            return TickSummary::default();
        }
        let passes = wallets.iter().map(|wallet| self.reconcile_wallet(wallet));
        let results = join_all(passes).await;
        let mut summary = TickSummary { wallets_polled: wallets.len(), ..TickSummary::default() };
        for (wallet, result) in wallets.iter().zip(results) {
            match result {
                Ok(completed) => summary.orders_completed += completed,
                Err(e) => {
                    summary.failed_passes += 1;
                    error!("🔎️ [{}] Pass for wallet {} failed: {e}", self.chain, wallet.address);
                },
            }
        }
        summary
    }

    /// The poll window for one wallet, or `None` when the wallet cannot be polled yet (no Polygon cursor).
    async fn poll_window(&self, wallet: &WatchedWallet) -> Result<Option<PollWindow>, WalletPassError> {
        match self.chain {
            Chain::Trc20 => {
                let end_ms = Utc::now().timestamp_millis();
                let start_ms = end_ms - TRON_LOOKBACK_HOURS * 3600 * 1000;
                Ok(Some(PollWindow::Lookback { start_ms, end_ms }))
            },
            Chain::Polygon => match self.db.poll_start_block(&wallet.address).await? {
                Some(block) if block > 0 => Ok(Some(PollWindow::FromBlock(block))),
                _ => Ok(None),
            },
        }
    }

    /// One wallet's reconciliation pass: fetch and filter the wallet's transfers, then run each one through the
    /// reconciliation sequence. A temporal inversion skips that transfer only; explorer and database failures end
    /// the pass.
    async fn reconcile_wallet(&self, wallet: &WatchedWallet) -> Result<usize, WalletPassError> {
        let Some(window) = self.poll_window(wallet).await? else {
            trace!("🔎️ [{}] Wallet {} has no poll cursor yet. Skipping.", self.chain, wallet.address);
            return Ok(0);
        };
        let transfers = self.source.fetch_transfers(&wallet.address, window).await?;
        let mut completed = 0;
        for transfer in &transfers {
            match self.api.process_transfer(transfer).await {
                Ok(Some(order)) => {
                    debug!("🔎️ [{}] Wallet {} settled order {}", self.chain, wallet.address, order.trade_id);
                    completed += 1;
                },
                Ok(None) => {},
                Err(e @ ReconcileError::TemporalInversion { .. }) => {
                    warn!("🔎️ [{}] Anomaly on wallet {}: {e}", self.chain, wallet.address);
                },
                Err(e @ ReconcileError::Database(_)) => return Err(e.into()),
            }
        }
        Ok(completed)
    }
}

/// Runs the poller loop forever: one tick per interval, each tick joined before the next fires. Spawn this on the
/// runtime once per chain; the two chains run on independent cadences.
pub async fn run_wallet_poller<B, X, Q, S>(poller: WalletPoller<B, X, Q, S>, interval: std::time::Duration)
where
    B: GatewayDatabase,
    X: TransferSource,
    Q: CallbackQueue,
    S: ChatSink,
{
    let mut timer = tokio::time::interval(interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!("🔎️ [{}] Wallet poller started", poller.chain());
    loop {
        timer.tick().await;
        let summary = poller.run_tick().await;
        debug!(
            "🔎️ [{}] Tick complete. {} wallets polled, {} orders completed, {} failed passes",
            poller.chain(),
            summary.wallets_polled,
            summary.orders_completed,
            summary.failed_passes
        );
    }
}
