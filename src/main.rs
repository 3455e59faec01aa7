use payment_proxy::app::{redis_dispatcher, shutdown_signal};
use payment_proxy::config::AppConfig;
use payment_proxy::repo::payments_repo::PaymentsRepo;
use payment_proxy::service::payment_service::PaymentService;
use payment_proxy::worker::pool::WorkerPool;
use payment_proxy::AppState;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(cfg.db_max_connections)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let redis_client = redis::Client::open(cfg.redis_url.clone())?;
    let store = Arc::new(PaymentsRepo { pool });

    let dispatcher = Arc::new(redis_dispatcher(&cfg, &redis_client, store.clone()).await?);
    let workers = WorkerPool::start(dispatcher.clone(), cfg.worker_count, cfg.poll_interval());

    let state = AppState {
        payment_service: PaymentService {
            queue: dispatcher.queue.clone(),
            store,
        },
        processors: dispatcher.processors.clone(),
    };
    let app = payment_proxy::http::router(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    workers.shutdown().await;
    Ok(())
}
