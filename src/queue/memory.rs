use crate::domain::payment::Payment;
use crate::queue::PaymentQueue;
use anyhow::Result;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Process-local queue with the same FIFO, atomic-pop contract as the Redis one.
#[derive(Clone, Default)]
pub struct InMemoryPaymentQueue {
    inner: Arc<Mutex<VecDeque<Payment>>>,
}

impl InMemoryPaymentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

#[async_trait::async_trait]
impl PaymentQueue for InMemoryPaymentQueue {
    async fn enqueue(&self, payment: &Payment) -> Result<()> {
        self.inner.lock().await.push_back(payment.clone());
        Ok(())
    }

    async fn dequeue(&self) -> Result<Option<Payment>> {
        Ok(self.inner.lock().await.pop_front())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
