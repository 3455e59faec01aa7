use chrono::Utc;
use payment_proxy::domain::payment::{Payment, PaymentOutcome, Processor};
use payment_proxy::domain::summary::{PaymentsSummary, SummaryBucket};
use payment_proxy::health::memory::InMemoryHealthCache;
use payment_proxy::health::tracker::ProcessorHealthTracker;
use payment_proxy::processors::mock::MockProcessor;
use payment_proxy::queue::memory::InMemoryPaymentQueue;
use payment_proxy::queue::PaymentQueue;
use payment_proxy::repo::memory::InMemoryOutcomeStore;
use payment_proxy::repo::OutcomeStore;
use payment_proxy::worker::dispatcher::{
    DispatchOutcome, Dispatcher, ProcessorSet, UnresolvedPolicy,
};
use std::sync::Arc;
use std::time::Duration;

const TTL: Duration = Duration::from_secs(5);

fn requeue(max_attempts: u32, backoff: Duration) -> UnresolvedPolicy {
    UnresolvedPolicy::Requeue {
        max_attempts,
        backoff,
    }
}

fn trackers(
    default: &Arc<MockProcessor>,
    fallback: &Arc<MockProcessor>,
) -> (ProcessorHealthTracker, ProcessorHealthTracker) {
    let cache = Arc::new(InMemoryHealthCache::new());
    (
        ProcessorHealthTracker::new(Processor::Default, default.clone(), cache.clone(), TTL),
        ProcessorHealthTracker::new(Processor::Fallback, fallback.clone(), cache, TTL),
    )
}

struct Harness {
    default: Arc<MockProcessor>,
    fallback: Arc<MockProcessor>,
    queue: InMemoryPaymentQueue,
    store: InMemoryOutcomeStore,
    dispatcher: Dispatcher,
}

fn harness(default: MockProcessor, fallback: MockProcessor, policy: UnresolvedPolicy) -> Harness {
    let default = Arc::new(default);
    let fallback = Arc::new(fallback);
    let queue = InMemoryPaymentQueue::new();
    let store = InMemoryOutcomeStore::new();
    let (default_tracker, fallback_tracker) = trackers(&default, &fallback);

    let dispatcher = Dispatcher {
        queue: Arc::new(queue.clone()),
        store: Arc::new(store.clone()),
        processors: ProcessorSet {
            default: default_tracker,
            fallback: fallback_tracker,
        },
        unresolved_policy: policy,
    };

    Harness {
        default,
        fallback,
        queue,
        store,
        dispatcher,
    }
}

#[tokio::test]
async fn healthy_default_takes_the_payment() {
    let h = harness(
        MockProcessor::new("default"),
        MockProcessor::new("fallback"),
        UnresolvedPolicy::Abandon,
    );
    let t0 = Utc::now();

    let outcome = h.dispatcher.dispatch(Payment::new("a1", 100.0, t0)).await;

    assert_eq!(outcome, DispatchOutcome::Processed(Processor::Default));
    assert_eq!(h.default.submitted().await, vec!["a1".to_string()]);
    assert!(h.fallback.submitted().await.is_empty());

    let summary = h.store.summarize(Some(t0), Some(t0)).await.unwrap();
    assert_eq!(
        summary,
        PaymentsSummary {
            default: SummaryBucket {
                total_requests: 1,
                total_amount: 100.0
            },
            fallback: SummaryBucket::default(),
        }
    );
}

#[tokio::test]
async fn unhealthy_default_is_never_submitted_to() {
    let h = harness(
        MockProcessor::new("default").with_health(false),
        MockProcessor::new("fallback"),
        UnresolvedPolicy::Abandon,
    );
    let now = Utc::now();

    for i in 0..5 {
        let payment = Payment::new(format!("p{}", i), 10.0, now);
        let outcome = h.dispatcher.dispatch(payment).await;
        assert_eq!(outcome, DispatchOutcome::Processed(Processor::Fallback));
    }

    assert!(h.default.submitted().await.is_empty());
    assert_eq!(h.fallback.submitted().await.len(), 5);
    // one health check, then the cached verdict
    assert_eq!(h.default.health_checks(), 1);
}

#[tokio::test]
async fn rejected_by_default_falls_through_to_fallback() {
    let h = harness(
        MockProcessor::new("default").with_accepting(false),
        MockProcessor::new("fallback"),
        UnresolvedPolicy::Abandon,
    );

    let outcome = h.dispatcher.dispatch(Payment::new("r1", 42.0, Utc::now())).await;

    assert_eq!(outcome, DispatchOutcome::Processed(Processor::Fallback));
    assert_eq!(h.default.submitted().await, vec!["r1".to_string()]);
    assert_eq!(h.fallback.submitted().await, vec!["r1".to_string()]);
    assert_eq!(h.store.get("r1").await.unwrap().processed_by, Processor::Fallback);
}

#[tokio::test]
async fn both_unhealthy_leaves_no_outcome_row() {
    let h = harness(
        MockProcessor::new("default").with_health(false),
        MockProcessor::new("fallback").with_health(false),
        UnresolvedPolicy::Abandon,
    );

    let outcome = h.dispatcher.dispatch(Payment::new("a2", 50.0, Utc::now())).await;

    assert_eq!(outcome, DispatchOutcome::Abandoned);
    assert!(h.store.is_empty().await);
    assert!(h.queue.is_empty().await);
    assert_eq!(h.store.summarize(None, None).await.unwrap(), PaymentsSummary::default());
}

#[tokio::test]
async fn both_rejecting_is_unresolved() {
    let h = harness(
        MockProcessor::new("default").with_accepting(false),
        MockProcessor::new("fallback").with_accepting(false),
        UnresolvedPolicy::Abandon,
    );

    let outcome = h.dispatcher.dispatch(Payment::new("x", 1.0, Utc::now())).await;

    assert_eq!(outcome, DispatchOutcome::Abandoned);
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn requeue_policy_puts_payment_back_until_cap() {
    let h = harness(
        MockProcessor::new("default").with_health(false),
        MockProcessor::new("fallback").with_health(false),
        requeue(3, Duration::ZERO),
    );

    let outcome = h.dispatcher.dispatch(Payment::new("q1", 5.0, Utc::now())).await;
    assert_eq!(outcome, DispatchOutcome::Requeued { attempts: 1 });

    let again = h.queue.dequeue().await.unwrap().unwrap();
    assert_eq!(again.attempts, 1);
    assert!(again.retry_at.is_some());
    assert_eq!(
        h.dispatcher.dispatch(again).await,
        DispatchOutcome::Requeued { attempts: 2 }
    );

    let last = h.queue.dequeue().await.unwrap().unwrap();
    assert_eq!(h.dispatcher.dispatch(last).await, DispatchOutcome::Abandoned);
    assert!(h.queue.is_empty().await);
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn requeued_payment_is_held_back_until_its_retry_time() {
    let h = harness(
        MockProcessor::new("default").with_health(false),
        MockProcessor::new("fallback").with_health(false),
        requeue(5, Duration::from_secs(60)),
    );
    let before = Utc::now();

    let outcome = h.dispatcher.dispatch(Payment::new("held", 3.0, before)).await;
    assert_eq!(outcome, DispatchOutcome::Requeued { attempts: 1 });
    assert_eq!(h.queue.len().await, 1);

    let early = h.queue.dequeue().await.unwrap().unwrap();
    assert!(early.retry_at.unwrap() >= before + chrono::Duration::seconds(60));
    assert_eq!(h.dispatcher.dispatch(early).await, DispatchOutcome::Deferred);

    // pushed back untouched, without another health check or submission
    let still_held = h.queue.dequeue().await.unwrap().unwrap();
    assert_eq!(still_held.attempts, 1);
    assert_eq!(h.default.health_checks(), 1);
    assert_eq!(h.fallback.health_checks(), 1);
    assert!(h.default.submitted().await.is_empty());
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn requeued_payment_is_processed_once_a_processor_recovers() {
    let mut h = harness(
        MockProcessor::new("default").with_health(false),
        MockProcessor::new("fallback").with_health(false),
        requeue(5, Duration::ZERO),
    );
    let requested_at = Utc::now();

    let outcome = h.dispatcher.dispatch(Payment::new("late", 7.5, requested_at)).await;
    assert_eq!(outcome, DispatchOutcome::Requeued { attempts: 1 });

    // fresh cache so the recovered verdict is seen immediately
    h.default.set_healthy(true);
    let (default_tracker, fallback_tracker) = trackers(&h.default, &h.fallback);
    h.dispatcher.processors.default = default_tracker;
    h.dispatcher.processors.fallback = fallback_tracker;

    let payment = h.queue.dequeue().await.unwrap().unwrap();
    assert_eq!(
        h.dispatcher.dispatch(payment).await,
        DispatchOutcome::Processed(Processor::Default)
    );

    let row = h.store.get("late").await.unwrap();
    assert_eq!(row.requested_at, requested_at);
}

struct UnwritableStore;

#[async_trait::async_trait]
impl OutcomeStore for UnwritableStore {
    async fn insert(&self, _outcome: &PaymentOutcome) -> anyhow::Result<()> {
        anyhow::bail!("database unavailable")
    }

    async fn summarize(
        &self,
        _from: Option<chrono::DateTime<Utc>>,
        _to: Option<chrono::DateTime<Utc>>,
    ) -> anyhow::Result<PaymentsSummary> {
        anyhow::bail!("database unavailable")
    }

    async fn ping(&self) -> anyhow::Result<()> {
        anyhow::bail!("database unavailable")
    }
}

#[tokio::test]
async fn failed_record_is_not_resubmitted_or_requeued() {
    let mut h = harness(
        MockProcessor::new("default"),
        MockProcessor::new("fallback"),
        requeue(5, Duration::ZERO),
    );
    h.dispatcher.store = Arc::new(UnwritableStore);

    let outcome = h.dispatcher.dispatch(Payment::new("w1", 9.0, Utc::now())).await;

    assert_eq!(outcome, DispatchOutcome::RecordFailed(Processor::Default));
    assert_eq!(h.default.submitted().await.len(), 1);
    assert!(h.fallback.submitted().await.is_empty());
    assert!(h.queue.is_empty().await);
}
