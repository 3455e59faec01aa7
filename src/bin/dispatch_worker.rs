use anyhow::Result;
use payment_proxy::app::{redis_dispatcher, shutdown_signal};
use payment_proxy::config::AppConfig;
use payment_proxy::repo::payments_repo::PaymentsRepo;
use payment_proxy::worker::pool::WorkerPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();
    let pool = PgPoolOptions::new()
        .max_connections(cfg.db_max_connections)
        .connect(&cfg.database_url)
        .await?;

    let redis_client = redis::Client::open(cfg.redis_url.clone())?;
    let store = Arc::new(PaymentsRepo { pool });
    let dispatcher = Arc::new(redis_dispatcher(&cfg, &redis_client, store).await?);

    let workers = WorkerPool::start(dispatcher, cfg.worker_count.max(1), cfg.poll_interval());
    shutdown_signal().await;
    workers.shutdown().await;
    Ok(())
}
