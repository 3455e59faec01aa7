use crate::AppState;
use axum::routing::{get, post};
use axum::Router;

pub mod handlers {
    pub mod ops;
    pub mod payments;
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/payments", post(handlers::payments::create_payment))
        .route("/payments-summary", get(handlers::payments::get_summary))
        .route("/ping", get(handlers::payments::ping))
        .route("/ops/readiness", get(handlers::ops::readiness))
        .route("/ops/liveness", get(handlers::ops::liveness))
        .with_state(state)
}
