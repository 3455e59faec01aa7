use crate::domain::payment::PaymentOutcome;
use crate::domain::summary::PaymentsSummary;
use anyhow::Result;
use chrono::{DateTime, Utc};

pub mod memory;
pub mod payments_repo;

/// Durable record of settled payments.
///
/// `insert` is idempotent by correlation id. `summarize` filters on `requested_at`
/// with inclusive, optional bounds and always reports both processors.
#[async_trait::async_trait]
pub trait OutcomeStore: Send + Sync {
    async fn insert(&self, outcome: &PaymentOutcome) -> Result<()>;

    async fn summarize(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<PaymentsSummary>;

    /// Round-trip to the backing store, for readiness checks.
    async fn ping(&self) -> Result<()>;
}
