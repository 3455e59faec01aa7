use crate::config::AppConfig;
use crate::domain::payment::Processor;
use crate::health::store_redis::HealthCacheRedis;
use crate::health::tracker::ProcessorHealthTracker;
use crate::health::HealthCache;
use crate::processors::http::HttpProcessorClient;
use crate::queue::store_redis::RedisPaymentQueue;
use crate::repo::OutcomeStore;
use crate::worker::dispatcher::{Dispatcher, ProcessorSet};
use anyhow::Result;
use std::sync::Arc;

/// Both processors behind HTTP clients that share one connection pool and one health cache.
pub fn processor_set(cfg: &AppConfig, cache: Arc<dyn HealthCache>) -> ProcessorSet {
    let client = reqwest::Client::new();
    let tracker = |processor: Processor, base_url: &str| {
        ProcessorHealthTracker::new(
            processor,
            Arc::new(HttpProcessorClient::new(
                base_url,
                &cfg.processor_health_path,
                cfg.processor_timeout(),
                client.clone(),
            )),
            cache.clone(),
            cfg.health_ttl(),
        )
    };

    ProcessorSet {
        default: tracker(Processor::Default, &cfg.default_processor_url),
        fallback: tracker(Processor::Fallback, &cfg.fallback_processor_url),
    }
}

/// Dispatcher wired to the shared Redis queue and health cache.
pub async fn redis_dispatcher(
    cfg: &AppConfig,
    redis_client: &redis::Client,
    store: Arc<dyn OutcomeStore>,
) -> Result<Dispatcher> {
    let queue = RedisPaymentQueue::connect(redis_client, &cfg.queue_key).await?;
    let cache = HealthCacheRedis::connect(redis_client).await?;

    Ok(Dispatcher {
        queue: Arc::new(queue),
        store,
        processors: processor_set(cfg, Arc::new(cache)),
        unresolved_policy: cfg.unresolved_policy,
    })
}

pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
