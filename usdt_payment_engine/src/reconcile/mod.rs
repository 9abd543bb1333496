//! # The reconciliation flow.
//!
//! [`ReconcileApi`] takes one normalized transfer through the full sequence: match it to a pending order by
//! (wallet, exact amount), reject temporal inversions, issue the idempotent `Pending` → `Paid` transition, then hand
//! off the callback job and the operator notification. The callback and the notification only fire when the
//! transition actually happened in this invocation.
mod api;
mod dispatcher;
mod notifier;

pub use api::{ReconcileApi, ReconcileError};
pub use dispatcher::{CallbackDispatcher, MAX_CALLBACK_RETRIES};
pub use notifier::{payment_received_message, Notifier};
