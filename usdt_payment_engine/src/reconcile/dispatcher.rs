use log::*;

use crate::{
    db_types::{CallbackJob, Order},
    traits::{CallbackQueue, JobId, QueueError},
};

/// The retry ceiling handed to the queue with every callback job. The backoff policy between attempts belongs to
/// the queue, not to the engine.
pub const MAX_CALLBACK_RETRIES: u32 = 5;

/// Builds one callback job per completed order and submits it to the durable queue.
#[derive(Debug, Clone)]
pub struct CallbackDispatcher<Q> {
    queue: Q,
}

impl<Q: CallbackQueue> CallbackDispatcher<Q> {
    pub fn new(queue: Q) -> Self {
        Self { queue }
    }

    /// Submits the callback job for a just-completed order. A failure here never rolls the order back; the payment
    /// is already final.
    pub async fn dispatch(&self, order: &Order) -> Result<JobId, QueueError> {
        let job = CallbackJob::new(order);
        let job_id = self.queue.enqueue(job, MAX_CALLBACK_RETRIES).await?;
        debug!("📬️ Callback job [{job_id}] enqueued for order {}", order.trade_id);
        Ok(job_id)
    }
}
