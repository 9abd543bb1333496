//! USDT Payment Gateway Reconciliation Engine
//!
//! The reconciliation engine watches a pool of receive-addresses on two chains (TRC-20 USDT on Tron and ERC-20 USDT
//! on Polygon) for incoming stablecoin transfers, matches each observed transfer to a previously created payment
//! order, and drives that order to a terminal `Paid` state exactly once. Once an order is paid, a callback job is
//! handed to a durable queue and a best-effort notification is pushed to the operator chat sink.
//!
//! The library is divided into three main sections:
//! 1. Collaborator contracts ([`mod@traits`]). The order/wallet persistence layer, the durable callback queue and the
//!    operator chat sink are all external to the engine. Backends implement the traits in this module; the engine
//!    never talks to a database or a queue broker directly.
//! 2. Explorer clients ([`mod@explorers`]). One client per chain issues the transfer-history query against the
//!    chain's public explorer and reduces the raw records to normalized, filtered transfers.
//! 3. The reconciliation flow ([`mod@reconcile`] and [`mod@poller`]). `ReconcileApi` performs the
//!    match → complete → dispatch → notify sequence per transfer, and `WalletPoller` fans that flow out over the
//!    wallet pool on every scheduler tick.
pub mod config;
pub mod db_types;
pub mod explorers;
pub mod poller;
pub mod reconcile;
pub mod traits;

pub use config::EngineConfig;
pub use poller::{run_wallet_poller, TickSummary, WalletPassError, WalletPoller};
pub use reconcile::{CallbackDispatcher, Notifier, ReconcileApi, ReconcileError, MAX_CALLBACK_RETRIES};
