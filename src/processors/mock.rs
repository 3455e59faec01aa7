use crate::domain::payment::ProcessorPaymentRequest;
use crate::processors::{ProcessorClient, ProcessorError, ServiceHealth};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Scriptable in-process processor. Health and acceptance can be flipped at runtime.
pub struct MockProcessor {
    pub name: String,
    healthy: AtomicBool,
    accepting: AtomicBool,
    health_checks: AtomicUsize,
    submitted: Mutex<Vec<String>>,
}

impl MockProcessor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            healthy: AtomicBool::new(true),
            accepting: AtomicBool::new(true),
            health_checks: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn with_health(self, healthy: bool) -> Self {
        self.set_healthy(healthy);
        self
    }

    pub fn with_accepting(self, accepting: bool) -> Self {
        self.set_accepting(accepting);
        self
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn set_accepting(&self, accepting: bool) {
        self.accepting.store(accepting, Ordering::SeqCst);
    }

    pub fn health_checks(&self) -> usize {
        self.health_checks.load(Ordering::SeqCst)
    }

    /// Correlation ids of every submission attempt, accepted or not.
    pub async fn submitted(&self) -> Vec<String> {
        self.submitted.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl ProcessorClient for MockProcessor {
    fn base_url(&self) -> &str {
        &self.name
    }

    async fn submit(&self, request: &ProcessorPaymentRequest) -> Result<(), ProcessorError> {
        self.submitted.lock().await.push(request.correlation_id.clone());
        if self.accepting.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ProcessorError::UnexpectedStatus(500))
        }
    }

    async fn service_health(&self) -> Result<ServiceHealth, ProcessorError> {
        self.health_checks.fetch_add(1, Ordering::SeqCst);
        Ok(ServiceHealth {
            failing: !self.healthy.load(Ordering::SeqCst),
            min_response_time: 0,
        })
    }
}
