use crate::domain::payment::{CreatePaymentRequest, ErrorEnvelope, ErrorPayload, Payment};
use crate::domain::summary::PaymentsSummary;
use crate::queue::PaymentQueue;
use crate::repo::OutcomeStore;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Intake and reporting entry points. Dispatch happens elsewhere, off the request path.
#[derive(Clone)]
pub struct PaymentService {
    pub queue: Arc<dyn PaymentQueue>,
    pub store: Arc<dyn OutcomeStore>,
}

impl PaymentService {
    pub async fn create_payment(
        &self,
        req: CreatePaymentRequest,
    ) -> Result<Payment, (StatusCode, ErrorEnvelope)> {
        validate_request(&req)?;

        let payment = Payment::new(req.correlation_id, req.amount, Utc::now());
        self.queue.enqueue(&payment).await.map_err(|e| {
            tracing::error!(correlation_id = %payment.correlation_id, "enqueue failed: {}", e);
            internal(e)
        })?;

        Ok(payment)
    }

    pub async fn summary(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<PaymentsSummary, (StatusCode, ErrorEnvelope)> {
        self.store.summarize(from, to).await.map_err(|e| {
            tracing::error!("summary query failed: {}", e);
            internal(e)
        })
    }
}

fn validate_request(req: &CreatePaymentRequest) -> Result<(), (StatusCode, ErrorEnvelope)> {
    if req.correlation_id.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            err("INVALID_CORRELATION_ID", "correlationId must not be empty"),
        ));
    }
    if !req.amount.is_finite() || req.amount <= 0.0 {
        return Err((
            StatusCode::BAD_REQUEST,
            err("INVALID_AMOUNT", "amount must be > 0"),
        ));
    }
    Ok(())
}

pub fn err(code: &str, message: &str) -> ErrorEnvelope {
    ErrorEnvelope {
        error: ErrorPayload {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
        },
    }
}

fn internal(e: anyhow::Error) -> (StatusCode, ErrorEnvelope) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        err("INTERNAL_ERROR", &e.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::memory::InMemoryPaymentQueue;
    use crate::repo::memory::InMemoryOutcomeStore;

    fn service(queue: InMemoryPaymentQueue) -> PaymentService {
        PaymentService {
            queue: Arc::new(queue),
            store: Arc::new(InMemoryOutcomeStore::new()),
        }
    }

    fn request(id: &str, amount: f64) -> CreatePaymentRequest {
        CreatePaymentRequest {
            correlation_id: id.to_string(),
            amount,
        }
    }

    #[tokio::test]
    async fn accepted_payment_is_queued_unprocessed() {
        let queue = InMemoryPaymentQueue::new();
        let before = Utc::now();
        let payment = service(queue.clone()).create_payment(request("a1", 100.0)).await.unwrap();

        assert!(payment.requested_at >= before);
        let queued = queue.dequeue().await.unwrap().unwrap();
        assert_eq!(queued, payment);
        assert_eq!(queued.attempts, 0);
        assert_eq!(queued.retry_at, None);
    }

    #[tokio::test]
    async fn rejects_non_positive_amount_and_blank_id() {
        let queue = InMemoryPaymentQueue::new();
        let svc = service(queue.clone());

        let (status, body) = svc.create_payment(request("a1", 0.0)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.code, "INVALID_AMOUNT");

        let (status, body) = svc.create_payment(request("  ", 10.0)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.code, "INVALID_CORRELATION_ID");

        assert!(queue.is_empty().await);
    }
}
