use crate::domain::payment::{Payment, Processor};
use crate::health::tracker::ProcessorHealthTracker;
use crate::queue::PaymentQueue;
use crate::repo::OutcomeStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// What happens to a payment no processor would take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedPolicy {
    /// Log and drop the payment.
    Abandon,
    /// Push it back onto the queue until it has been tried `max_attempts` times.
    /// The n-th retry is held back for `n * backoff`.
    Requeue { max_attempts: u32, backoff: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Processed(Processor),
    /// Submitted successfully but the outcome row could not be written.
    RecordFailed(Processor),
    Requeued { attempts: u32 },
    /// Popped before its `retry_at` and pushed back untouched.
    Deferred,
    Abandoned,
}

#[derive(Clone)]
pub struct ProcessorSet {
    pub default: ProcessorHealthTracker,
    pub fallback: ProcessorHealthTracker,
}

impl ProcessorSet {
    pub fn get(&self, processor: Processor) -> &ProcessorHealthTracker {
        match processor {
            Processor::Default => &self.default,
            Processor::Fallback => &self.fallback,
        }
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    pub queue: Arc<dyn PaymentQueue>,
    pub store: Arc<dyn OutcomeStore>,
    pub processors: ProcessorSet,
    pub unresolved_policy: UnresolvedPolicy,
}

impl Dispatcher {
    /// Walks processors in priority order, skipping unhealthy ones, and returns the
    /// first that accepts the payment.
    pub async fn resolve(&self, payment: &Payment) -> Option<Processor> {
        for processor in Processor::PRIORITY {
            let tracker = self.processors.get(processor);
            if !tracker.is_healthy().await {
                tracing::debug!(
                    correlation_id = %payment.correlation_id,
                    "skipping {}: unhealthy",
                    processor
                );
                continue;
            }

            match tracker.submit(payment).await {
                Ok(()) => return Some(processor),
                Err(e) => tracing::warn!(
                    correlation_id = %payment.correlation_id,
                    "{} rejected payment: {}",
                    processor,
                    e
                ),
            }
        }

        None
    }

    /// One dispatch attempt: select, submit, record.
    pub async fn dispatch(&self, payment: Payment) -> DispatchOutcome {
        if !payment.is_due(Utc::now()) {
            return self.defer(payment).await;
        }

        let Some(processor) = self.resolve(&payment).await else {
            return self.handle_unresolved(payment).await;
        };

        let outcome = payment.into_outcome(processor);
        match self.store.insert(&outcome).await {
            Ok(()) => DispatchOutcome::Processed(processor),
            Err(e) => {
                // Already settled externally; resubmitting could charge twice.
                tracing::error!(
                    correlation_id = %outcome.correlation_id,
                    "failed to record payment processed by {}: {}",
                    processor,
                    e
                );
                DispatchOutcome::RecordFailed(processor)
            }
        }
    }

    async fn handle_unresolved(&self, mut payment: Payment) -> DispatchOutcome {
        let UnresolvedPolicy::Requeue {
            max_attempts,
            backoff,
        } = self.unresolved_policy
        else {
            return DispatchOutcome::Abandoned;
        };

        payment.attempts += 1;
        if payment.attempts >= max_attempts {
            tracing::warn!(
                correlation_id = %payment.correlation_id,
                "giving up after {} attempts",
                payment.attempts
            );
            return DispatchOutcome::Abandoned;
        }

        let delay_ms = backoff.saturating_mul(payment.attempts).as_millis() as i64;
        payment.retry_at = Some(Utc::now() + chrono::Duration::milliseconds(delay_ms));

        match self.queue.enqueue(&payment).await {
            Ok(()) => DispatchOutcome::Requeued {
                attempts: payment.attempts,
            },
            Err(e) => {
                tracing::error!(
                    correlation_id = %payment.correlation_id,
                    "requeue failed: {}",
                    e
                );
                DispatchOutcome::Abandoned
            }
        }
    }

    async fn defer(&self, payment: Payment) -> DispatchOutcome {
        match self.queue.enqueue(&payment).await {
            Ok(()) => DispatchOutcome::Deferred,
            Err(e) => {
                tracing::error!(
                    correlation_id = %payment.correlation_id,
                    "could not hold back payment until retry: {}",
                    e
                );
                DispatchOutcome::Abandoned
            }
        }
    }
}
