use crate::domain::payment::Processor;
use crate::health::HealthCache;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Process-local health cache for single-instance runs and tests.
#[derive(Clone, Default)]
pub struct InMemoryHealthCache {
    inner: Arc<RwLock<HashMap<Processor, (Instant, bool)>>>,
}

impl InMemoryHealthCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl HealthCache for InMemoryHealthCache {
    async fn get(&self, processor: Processor) -> Result<Option<bool>> {
        let read = self.inner.read().await;
        Ok(read
            .get(&processor)
            .filter(|(expires_at, _)| Instant::now() < *expires_at)
            .map(|(_, healthy)| *healthy))
    }

    async fn put(&self, processor: Processor, healthy: bool, ttl: Duration) -> Result<()> {
        let mut write = self.inner.write().await;
        write.insert(processor, (Instant::now() + ttl, healthy));
        Ok(())
    }
}
