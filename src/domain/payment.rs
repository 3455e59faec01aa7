use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two external backends a payment can be settled by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Processor {
    Default,
    Fallback,
}

impl Processor {
    /// Dispatch order: the preferred backend first.
    pub const PRIORITY: [Processor; 2] = [Processor::Default, Processor::Fallback];

    pub fn as_str(&self) -> &'static str {
        match self {
            Processor::Default => "default",
            Processor::Fallback => "fallback",
        }
    }

    /// Storage code for the `processed_by` column.
    pub fn code(&self) -> i16 {
        match self {
            Processor::Default => 0,
            Processor::Fallback => 1,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Processor::Default),
            1 => Some(Processor::Fallback),
            _ => None,
        }
    }
}

impl fmt::Display for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payment as it travels through the work queue.
///
/// A queued payment has no processor yet; recording an outcome goes through
/// [`Payment::into_outcome`], which requires a concrete one.
///
/// `retry_at` is only set on a requeued payment and holds it back until then.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub correlation_id: String,
    pub amount: f64,
    pub requested_at: DateTime<Utc>,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_at: Option<DateTime<Utc>>,
}

impl Payment {
    pub fn new(
        correlation_id: impl Into<String>,
        amount: f64,
        requested_at: DateTime<Utc>,
    ) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            amount,
            requested_at,
            attempts: 0,
            retry_at: None,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.retry_at.map_or(true, |at| at <= now)
    }

    pub fn processor_request(&self) -> ProcessorPaymentRequest {
        ProcessorPaymentRequest {
            correlation_id: self.correlation_id.clone(),
            amount: self.amount,
            requested_at: self.requested_at,
        }
    }

    pub fn into_outcome(self, processor: Processor) -> PaymentOutcome {
        PaymentOutcome {
            correlation_id: self.correlation_id,
            amount: self.amount,
            processed_by: processor,
            requested_at: self.requested_at,
        }
    }
}

/// Body of `POST /payments` on an external processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorPaymentRequest {
    pub correlation_id: String,
    pub amount: f64,
    pub requested_at: DateTime<Utc>,
}

/// A payment settled by a known processor, ready for the outcome store.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentOutcome {
    pub correlation_id: String,
    pub amount: f64,
    pub processed_by: Processor,
    pub requested_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub correlation_id: String,
    pub amount: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn processor_request_uses_camel_case_wire_names() {
        let at = Utc.with_ymd_and_hms(2025, 7, 15, 12, 0, 0).unwrap();
        let payment = Payment::new("a1", 19.9, at);
        let body = serde_json::to_value(payment.processor_request()).unwrap();

        assert_eq!(body["correlationId"], "a1");
        assert_eq!(body["amount"], 19.9);
        assert!(body["requestedAt"].as_str().unwrap().starts_with("2025-07-15T12:00:00"));
        assert!(body.get("processedBy").is_none());
    }

    #[test]
    fn queued_payment_without_attempts_field_still_decodes() {
        let raw = r#"{"correlationId":"a2","amount":50.0,"requestedAt":"2025-07-15T12:00:00Z"}"#;
        let payment: Payment = serde_json::from_str(raw).unwrap();
        assert_eq!(payment.attempts, 0);
        assert_eq!(payment.retry_at, None);
        assert!(payment.is_due(Utc::now()));
    }

    #[test]
    fn requeued_payment_is_held_until_retry_at() {
        let at = Utc.with_ymd_and_hms(2025, 7, 15, 12, 0, 0).unwrap();
        let mut payment = Payment::new("a3", 5.0, at);
        payment.retry_at = Some(at + chrono::Duration::seconds(5));

        assert!(!payment.is_due(at));
        assert!(payment.is_due(at + chrono::Duration::seconds(5)));

        let raw = serde_json::to_value(&payment).unwrap();
        assert!(raw["retryAt"].as_str().unwrap().starts_with("2025-07-15T12:00:05"));
    }

    #[test]
    fn storage_codes_are_stable() {
        for processor in Processor::PRIORITY {
            assert_eq!(Processor::from_code(processor.code()), Some(processor));
        }
        assert_eq!(Processor::from_code(2), None);
    }
}
