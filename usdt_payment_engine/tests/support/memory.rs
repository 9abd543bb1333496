//! In-memory collaborator implementations. They honour the same contracts the production backends must honour,
//! including the compare-and-set completion guard, so the idempotence tests exercise the real flow.
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
        Mutex,
    },
};

use usdt_payment_engine::{
    db_types::{CallbackJob, Chain, NormalizedTransfer, Order, OrderStatusType, TradeId, WatchedWallet, WalletStatus},
    explorers::{ExplorerError, PollWindow, TransferSource},
    traits::{
        CallbackQueue,
        ChatSink,
        ChatSinkError,
        CompleteOrderResult,
        GatewayDatabase,
        GatewayDatabaseError,
        JobId,
        QueueError,
    },
};
use upg_common::MicroUsdt;

//--------------------------------------   MemoryGateway   -----------------------------------------------------------
#[derive(Default)]
struct GatewayState {
    wallets: Vec<WatchedWallet>,
    orders: Vec<Order>,
    cursors: HashMap<String, u64>,
    completions: u64,
}

/// An in-memory [`GatewayDatabase`]. Orders keep insertion order, so "first match wins" is deterministic.
#[derive(Clone, Default)]
pub struct MemoryGateway {
    state: Arc<Mutex<GatewayState>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_wallet(&self, id: i64, chain: Chain, address: &str, status: WalletStatus) {
        let wallet = WatchedWallet { id, chain, address: address.to_string(), status };
        self.state.lock().unwrap().wallets.push(wallet);
    }

    pub fn add_order(&self, order: Order) {
        self.state.lock().unwrap().orders.push(order);
    }

    pub fn set_cursor(&self, wallet: &str, start_block: u64) {
        self.state.lock().unwrap().cursors.insert(wallet.to_string(), start_block);
    }

    /// How many `Pending` → `Paid` transitions have actually happened.
    pub fn completions(&self) -> u64 {
        self.state.lock().unwrap().completions
    }

    pub fn order(&self, trade_id: &str) -> Option<Order> {
        self.state.lock().unwrap().orders.iter().find(|o| o.trade_id.as_str() == trade_id).cloned()
    }
}

impl GatewayDatabase for MemoryGateway {
    async fn enabled_wallets(&self, chain: Chain) -> Result<Vec<WatchedWallet>, GatewayDatabaseError> {
        let state = self.state.lock().unwrap();
        Ok(state.wallets.iter().filter(|w| w.chain == chain && w.is_enabled()).cloned().collect())
    }

    async fn trade_id_for_deposit(
        &self,
        wallet: &str,
        amount: MicroUsdt,
    ) -> Result<Option<TradeId>, GatewayDatabaseError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .orders
            .iter()
            .find(|o| o.status == OrderStatusType::Pending && o.wallet_address == wallet && o.actual_amount == amount)
            .map(|o| o.trade_id.clone()))
    }

    async fn order_by_trade_id(&self, trade_id: &TradeId) -> Result<Order, GatewayDatabaseError> {
        let state = self.state.lock().unwrap();
        state
            .orders
            .iter()
            .find(|o| &o.trade_id == trade_id)
            .cloned()
            .ok_or_else(|| GatewayDatabaseError::OrderNotFound(trade_id.clone()))
    }

    async fn complete_order(
        &self,
        trade_id: &TradeId,
        amount: MicroUsdt,
        tx_hash: &str,
    ) -> Result<CompleteOrderResult, GatewayDatabaseError> {
        let mut state = self.state.lock().unwrap();
        let order = state
            .orders
            .iter_mut()
            .find(|o| &o.trade_id == trade_id)
            .ok_or_else(|| GatewayDatabaseError::OrderNotFound(trade_id.clone()))?;
        if order.status != OrderStatusType::Pending {
            return Ok(CompleteOrderResult::AlreadyPaid);
        }
        order.status = OrderStatusType::Paid;
        order.actual_amount = amount;
        order.block_transaction_id = Some(tx_hash.to_string());
        let completed = order.clone();
        state.completions += 1;
        Ok(CompleteOrderResult::Completed(completed))
    }

    async fn poll_start_block(&self, wallet: &str) -> Result<Option<u64>, GatewayDatabaseError> {
        Ok(self.state.lock().unwrap().cursors.get(wallet).copied())
    }
}

//--------------------------------------    MemoryQueue    -----------------------------------------------------------
/// An in-memory [`CallbackQueue`] that records every accepted job, and can be told to refuse submissions.
#[derive(Clone, Default)]
pub struct MemoryQueue {
    jobs: Arc<Mutex<Vec<(CallbackJob, u32)>>>,
    next_id: Arc<AtomicU64>,
    failing: Arc<AtomicBool>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn jobs(&self) -> Vec<(CallbackJob, u32)> {
        self.jobs.lock().unwrap().clone()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }
}

impl CallbackQueue for MemoryQueue {
    async fn enqueue(&self, job: CallbackJob, max_retries: u32) -> Result<JobId, QueueError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(QueueError::Unavailable("the queue is down for the count".to_string()));
        }
        self.jobs.lock().unwrap().push((job, max_retries));
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(JobId::from(format!("job-{id}")))
    }
}

//--------------------------------------     MemorySink    -----------------------------------------------------------
/// An in-memory [`ChatSink`] that records every delivered message, and can be told to fail deliveries.
#[derive(Clone, Default)]
pub struct MemorySink {
    messages: Arc<Mutex<Vec<String>>>,
    failing: Arc<AtomicBool>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl ChatSink for MemorySink {
    async fn send(&self, text: &str) -> Result<(), ChatSinkError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ChatSinkError("the bot has been banned from the channel".to_string()));
        }
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

//--------------------------------------    StaticSource   -----------------------------------------------------------
/// A [`TransferSource`] serving canned feeds per wallet. Records the poll window of every fetch so tests can assert
/// how the poller built it, and a start/end event per fetch so tests can assert how fetches interleave. An optional
/// delay parks every fetch mid-flight. Wallets with no feed configured return an empty list.
#[derive(Clone)]
pub struct StaticSource {
    chain: Chain,
    feeds: Arc<Mutex<HashMap<String, Result<Vec<NormalizedTransfer>, ExplorerError>>>>,
    windows: Arc<Mutex<Vec<(String, PollWindow)>>>,
    events: Arc<Mutex<Vec<String>>>,
    fetch_delay: Arc<Mutex<Option<std::time::Duration>>>,
}

impl StaticSource {
    pub fn new(chain: Chain) -> Self {
        Self {
            chain,
            feeds: Arc::new(Mutex::new(HashMap::new())),
            windows: Arc::new(Mutex::new(Vec::new())),
            events: Arc::new(Mutex::new(Vec::new())),
            fetch_delay: Arc::new(Mutex::new(None)),
        }
    }

    pub fn set_feed(&self, wallet: &str, transfers: Vec<NormalizedTransfer>) {
        self.feeds.lock().unwrap().insert(wallet.to_string(), Ok(transfers));
    }

    pub fn set_failure(&self, wallet: &str, error: ExplorerError) {
        self.feeds.lock().unwrap().insert(wallet.to_string(), Err(error));
    }

    /// Makes every fetch dawdle for `delay` between its start and end events.
    pub fn set_fetch_delay(&self, delay: std::time::Duration) {
        *self.fetch_delay.lock().unwrap() = Some(delay);
    }

    pub fn windows(&self) -> Vec<(String, PollWindow)> {
        self.windows.lock().unwrap().clone()
    }

    /// The `fetch-start`/`fetch-end` events, in the order they happened.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl TransferSource for StaticSource {
    fn chain(&self) -> Chain {
        self.chain
    }

    async fn fetch_transfers(&self, wallet: &str, window: PollWindow) -> Result<Vec<NormalizedTransfer>, ExplorerError> {
        self.windows.lock().unwrap().push((wallet.to_string(), window));
        self.events.lock().unwrap().push(format!("fetch-start {wallet}"));
        let delay = *self.fetch_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.events.lock().unwrap().push(format!("fetch-end {wallet}"));
        self.feeds.lock().unwrap().get(wallet).cloned().unwrap_or_else(|| Ok(Vec::new()))
    }
}
