use crate::domain::payment::PaymentOutcome;
use crate::domain::summary::PaymentsSummary;
use crate::repo::OutcomeStore;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryOutcomeStore {
    rows: Arc<RwLock<HashMap<String, PaymentOutcome>>>,
}

impl InMemoryOutcomeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, correlation_id: &str) -> Option<PaymentOutcome> {
        self.rows.read().await.get(correlation_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl OutcomeStore for InMemoryOutcomeStore {
    async fn insert(&self, outcome: &PaymentOutcome) -> Result<()> {
        self.rows
            .write()
            .await
            .entry(outcome.correlation_id.clone())
            .or_insert_with(|| outcome.clone());
        Ok(())
    }

    async fn summarize(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<PaymentsSummary> {
        let rows = self.rows.read().await;
        Ok(PaymentsSummary::from_rows(
            rows.values()
                .filter(|o| from.map_or(true, |f| o.requested_at >= f))
                .filter(|o| to.map_or(true, |t| o.requested_at <= t))
                .map(|o| (o.processed_by, 1, o.amount)),
        ))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
