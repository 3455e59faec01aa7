use crate::domain::payment::Processor;
use anyhow::Result;
use std::time::Duration;

pub mod memory;
pub mod store_redis;
pub mod tracker;

/// Shared, last-write-wins store of per-processor health verdicts.
///
/// An expired verdict reads as `None`.
#[async_trait::async_trait]
pub trait HealthCache: Send + Sync {
    async fn get(&self, processor: Processor) -> Result<Option<bool>>;

    async fn put(&self, processor: Processor, healthy: bool, ttl: Duration) -> Result<()>;
}
