use crate::domain::payment::{Payment, Processor};
use crate::health::HealthCache;
use crate::processors::{ProcessorClient, ProcessorError};
use std::sync::Arc;
use std::time::Duration;

/// Pairs one processor's client with the shared health cache.
///
/// A cached verdict is served without touching the network; a miss triggers one
/// live health check whose verdict, healthy or not, is written back for `ttl`.
#[derive(Clone)]
pub struct ProcessorHealthTracker {
    processor: Processor,
    client: Arc<dyn ProcessorClient>,
    cache: Arc<dyn HealthCache>,
    ttl: Duration,
}

impl ProcessorHealthTracker {
    pub fn new(
        processor: Processor,
        client: Arc<dyn ProcessorClient>,
        cache: Arc<dyn HealthCache>,
        ttl: Duration,
    ) -> Self {
        Self {
            processor,
            client,
            cache,
            ttl,
        }
    }

    pub fn processor(&self) -> Processor {
        self.processor
    }

    pub async fn is_healthy(&self) -> bool {
        match self.cache.get(self.processor).await {
            Ok(Some(healthy)) => return healthy,
            Ok(None) => {}
            Err(e) => tracing::warn!("health cache read failed for {}: {}", self.processor, e),
        }

        let healthy = self.check_live().await;
        if let Err(e) = self.cache.put(self.processor, healthy, self.ttl).await {
            tracing::warn!("health cache write failed for {}: {}", self.processor, e);
        }
        healthy
    }

    /// Whatever verdict is cached right now. Never calls the processor.
    pub async fn cached_verdict(&self) -> Option<bool> {
        self.cache.get(self.processor).await.ok().flatten()
    }

    pub async fn submit(&self, payment: &Payment) -> Result<(), ProcessorError> {
        self.client.submit(&payment.processor_request()).await
    }

    async fn check_live(&self) -> bool {
        match self.client.service_health().await {
            Ok(health) if !health.failing => true,
            Ok(_) => {
                tracing::debug!("processor {} reports failing", self.processor);
                false
            }
            Err(e) => {
                tracing::debug!(
                    "health check for {} at {} failed: {}",
                    self.processor,
                    self.client.base_url(),
                    e
                );
                false
            }
        }
    }
}
