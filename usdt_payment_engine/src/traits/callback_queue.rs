use std::fmt::Display;

use thiserror::Error;

use crate::db_types::CallbackJob;

/// The durable task queue that delivers merchant callbacks.
///
/// The queue owns a job from the moment `enqueue` returns: delivery, backoff between attempts and the at-least-once
/// guarantee are all its responsibility. The merchant's callback endpoint must be idempotent accordingly.
#[allow(async_fn_in_trait)]
pub trait CallbackQueue: Clone {
    /// Submits a callback job with the given retry ceiling. Returns the queue's identifier for the job.
    async fn enqueue(&self, job: CallbackJob, max_retries: u32) -> Result<JobId, QueueError>;
}

/// A lightweight wrapper around the queue-assigned job identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobId(pub String);

impl From<String> for JobId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Error)]
pub enum QueueError {
    #[error("The callback queue is unavailable: {0}")]
    Unavailable(String),
    #[error("The callback job could not be serialized: {0}")]
    Serialization(String),
}
