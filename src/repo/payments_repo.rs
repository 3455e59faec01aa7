use crate::domain::payment::{PaymentOutcome, Processor};
use crate::domain::summary::PaymentsSummary;
use crate::repo::OutcomeStore;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

#[derive(Clone)]
pub struct PaymentsRepo {
    pub pool: PgPool,
}

#[async_trait::async_trait]
impl OutcomeStore for PaymentsRepo {
    async fn insert(&self, outcome: &PaymentOutcome) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (correlation_id, amount, processed_by, requested_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (correlation_id) DO NOTHING
            "#,
        )
        .bind(&outcome.correlation_id)
        .bind(outcome.amount)
        .bind(outcome.processed_by.code())
        .bind(outcome.requested_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn summarize(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<PaymentsSummary> {
        let rows = sqlx::query(
            r#"
            SELECT
                processed_by,
                COUNT(*) AS total_requests,
                COALESCE(SUM(amount), 0)::float8 AS total_amount
            FROM payments
            WHERE ($1::timestamptz IS NULL OR requested_at >= $1)
              AND ($2::timestamptz IS NULL OR requested_at <= $2)
            GROUP BY processed_by
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped = Vec::with_capacity(rows.len());
        for r in rows {
            let code: i16 = r.get("processed_by");
            let Some(processor) = Processor::from_code(code) else {
                tracing::warn!("skipping summary row with unknown processed_by={}", code);
                continue;
            };
            grouped.push((
                processor,
                r.get::<i64, _>("total_requests"),
                r.get::<f64, _>("total_amount"),
            ));
        }

        Ok(PaymentsSummary::from_rows(grouped))
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
