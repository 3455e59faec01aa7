use crate::domain::payment::Payment;
use crate::queue::PaymentQueue;
use anyhow::{Context, Result};
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;

const OP_TIMEOUT: Duration = Duration::from_secs(2);

/// Redis list used as a queue: `LPUSH` at the tail, `RPOP` at the head.
#[derive(Clone)]
pub struct RedisPaymentQueue {
    conn: MultiplexedConnection,
    key: String,
}

impl RedisPaymentQueue {
    pub async fn connect(client: &redis::Client, key: &str) -> Result<Self> {
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self {
            conn,
            key: key.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl PaymentQueue for RedisPaymentQueue {
    async fn enqueue(&self, payment: &Payment) -> Result<()> {
        let payload = serde_json::to_string(payment)?;
        let mut conn = self.conn.clone();
        let pushed: redis::RedisResult<i64> =
            tokio::time::timeout(OP_TIMEOUT, conn.lpush(&self.key, payload))
                .await
                .context("enqueue timed out")?;
        pushed?;
        Ok(())
    }

    async fn dequeue(&self) -> Result<Option<Payment>> {
        let mut conn = self.conn.clone();
        let popped: redis::RedisResult<Option<String>> = tokio::time::timeout(
            OP_TIMEOUT,
            redis::cmd("RPOP").arg(&self.key).query_async(&mut conn),
        )
        .await
        .context("dequeue timed out")?;

        let Some(raw) = popped? else {
            return Ok(None);
        };
        let payment = serde_json::from_str::<Payment>(&raw)
            .with_context(|| format!("undecodable queue entry: {}", raw))?;
        Ok(Some(payment))
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let pong: redis::RedisResult<String> =
            tokio::time::timeout(OP_TIMEOUT, redis::cmd("PING").query_async(&mut conn))
                .await
                .context("queue ping timed out")?;
        pong?;
        Ok(())
    }
}
