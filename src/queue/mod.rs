use crate::domain::payment::Payment;
use anyhow::Result;

pub mod memory;
pub mod store_redis;

/// Durable FIFO of payments awaiting dispatch.
///
/// `enqueue` returns only after the payment is stored. `dequeue` never blocks:
/// `Ok(None)` means the queue is empty and the caller should poll again later.
#[async_trait::async_trait]
pub trait PaymentQueue: Send + Sync {
    async fn enqueue(&self, payment: &Payment) -> Result<()>;

    async fn dequeue(&self) -> Result<Option<Payment>>;

    /// Round-trip to the backing store, for readiness checks.
    async fn ping(&self) -> Result<()>;
}
