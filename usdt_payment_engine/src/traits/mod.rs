//! # Collaborator contracts.
//!
//! Everything the reconciliation engine needs from the outside world is expressed here as a trait. The engine is a
//! pure consumer/orchestrator: it exposes no network surface of its own and holds no durable state, so swapping a
//! backend never touches the reconciliation flow.
//!
//! * [`GatewayDatabase`] is the order/wallet persistence layer. It owns the wallet pool, the pending-order lookup
//!   that the matching rule delegates to, and the compare-and-set `Pending` → `Paid` transition.
//! * [`CallbackQueue`] is the durable task queue that delivers merchant callbacks with retries. The engine only
//!   defines what it enqueues and with what retry budget.
//! * [`ChatSink`] is the operator-facing notification channel. Delivery is best-effort.
mod callback_queue;
mod chat_sink;
mod gateway_database;

pub use callback_queue::{CallbackQueue, JobId, QueueError};
pub use chat_sink::{ChatSink, ChatSinkError};
pub use gateway_database::{CompleteOrderResult, GatewayDatabase, GatewayDatabaseError};
