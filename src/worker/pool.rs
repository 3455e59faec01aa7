use crate::worker::dispatcher::{DispatchOutcome, Dispatcher};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Fixed set of workers draining the payment queue.
///
/// Dropping the pool without calling [`WorkerPool::shutdown`] also stops the
/// workers, but nothing waits for them.
pub struct WorkerPool {
    shutdown: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn start(dispatcher: Arc<Dispatcher>, workers: usize, poll_interval: Duration) -> Self {
        let (shutdown, rx) = watch::channel(false);
        let handles = (0..workers)
            .map(|id| tokio::spawn(run_worker(id, dispatcher.clone(), poll_interval, rx.clone())))
            .collect();

        tracing::info!("started {} dispatch workers", workers);
        Self { shutdown, handles }
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Signals every worker and waits for them. A worker mid-dispatch finishes
    /// that payment first.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::error!("dispatch worker panicked: {}", e);
            }
        }
        tracing::info!("dispatch workers stopped");
    }
}

async fn run_worker(
    id: usize,
    dispatcher: Arc<Dispatcher>,
    poll_interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        if *shutdown.borrow() {
            break;
        }

        match dispatcher.queue.dequeue().await {
            Ok(Some(payment)) => {
                let correlation_id = payment.correlation_id.clone();
                let outcome = dispatcher.dispatch(payment).await;
                log_outcome(id, &correlation_id, &outcome);
                // A held-back retry means nothing is due yet; poll like an empty queue.
                if outcome != DispatchOutcome::Deferred {
                    continue;
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(worker_id = id, "dequeue failed: {}", e),
        }

        tokio::select! {
            _ = tokio::time::sleep(poll_interval) => {}
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    tracing::debug!(worker_id = id, "worker exiting");
}

fn log_outcome(worker_id: usize, correlation_id: &str, outcome: &DispatchOutcome) {
    match outcome {
        DispatchOutcome::Processed(processor) => {
            tracing::info!(worker_id, correlation_id, "processed by {}", processor)
        }
        DispatchOutcome::RecordFailed(processor) => tracing::error!(
            worker_id,
            correlation_id,
            "processed by {} but not recorded",
            processor
        ),
        DispatchOutcome::Requeued { attempts } => tracing::warn!(
            worker_id,
            correlation_id,
            "no processor available, requeued (attempt {})",
            attempts
        ),
        DispatchOutcome::Deferred => {
            tracing::trace!(worker_id, correlation_id, "retry not due yet")
        }
        DispatchOutcome::Abandoned => tracing::warn!(
            worker_id,
            correlation_id,
            "no processor available, payment abandoned"
        ),
    }
}
