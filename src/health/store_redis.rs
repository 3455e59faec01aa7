use crate::domain::payment::Processor;
use crate::health::HealthCache;
use anyhow::Result;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;

#[derive(Clone)]
pub struct HealthCacheRedis {
    conn: MultiplexedConnection,
}

impl HealthCacheRedis {
    pub async fn connect(client: &redis::Client) -> Result<Self> {
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self { conn })
    }

    fn health_key(processor: Processor) -> String {
        format!("health:{}", processor.as_str())
    }

    /// `PX` argument: millisecond precision, never zero (Redis rejects it).
    fn expiry_millis(ttl: Duration) -> u64 {
        (ttl.as_millis() as u64).max(1)
    }
}

#[async_trait::async_trait]
impl HealthCache for HealthCacheRedis {
    async fn get(&self, processor: Processor) -> Result<Option<bool>> {
        let mut conn = self.conn.clone();
        let val: Option<String> = conn.get(Self::health_key(processor)).await?;
        Ok(val.map(|v| v == "1"))
    }

    async fn put(&self, processor: Processor, healthy: bool, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("SET")
            .arg(Self::health_key(processor))
            .arg(if healthy { "1" } else { "0" })
            .arg("PX")
            .arg(Self::expiry_millis(ttl))
            .query_async(&mut conn)
            .await?;
        Ok(())
    }
}
