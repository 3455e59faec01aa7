use crate::domain::payment::Processor;
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;

/// `ready` covers intake and recording only. Processor verdicts are reported
/// as last cached (`null` when none is cached) and never trigger a health check.
#[derive(Debug, Serialize)]
pub struct ReadinessReport {
    pub ready: bool,
    pub queue: bool,
    pub store: bool,
    pub processors: BTreeMap<&'static str, Option<bool>>,
}

pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let service = &state.payment_service;
    let (queue, store) = tokio::join!(service.queue.ping(), service.store.ping());
    if let Err(e) = &queue {
        tracing::warn!("readiness: queue unreachable: {}", e);
    }
    if let Err(e) = &store {
        tracing::warn!("readiness: outcome store unreachable: {}", e);
    }

    let mut processors = BTreeMap::new();
    for processor in Processor::PRIORITY {
        let tracker = state.processors.get(processor);
        processors.insert(tracker.processor().as_str(), tracker.cached_verdict().await);
    }

    let report = ReadinessReport {
        ready: queue.is_ok() && store.is_ok(),
        queue: queue.is_ok(),
        store: store.is_ok(),
        processors,
    };
    let status = if report.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}

pub async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({"alive": true}))
}
