use crate::domain::payment::{CreatePaymentRequest, ErrorEnvelope};
use crate::service::payment_service::err;
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

pub async fn create_payment(
    State(state): State<AppState>,
    Json(req): Json<CreatePaymentRequest>,
) -> impl IntoResponse {
    match state.payment_service.create_payment(req).await {
        Ok(_) => StatusCode::CREATED.into_response(),
        Err((status, body)) => (status, Json(body)).into_response(),
    }
}

pub async fn get_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> impl IntoResponse {
    let bounds = parse_bound("from", query.from.as_deref())
        .and_then(|from| parse_bound("to", query.to.as_deref()).map(|to| (from, to)));
    let (from, to) = match bounds {
        Ok(b) => b,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(e)).into_response(),
    };

    match state.payment_service.summary(from, to).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err((status, body)) => (status, Json(body)).into_response(),
    }
}

pub async fn ping() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"message": "pong"})))
}

/// Blank values mean "unbounded", as if the parameter were absent.
fn parse_bound(name: &str, raw: Option<&str>) -> Result<Option<DateTime<Utc>>, ErrorEnvelope> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|t| Some(t.with_timezone(&Utc)))
            .map_err(|_| {
                err(
                    "INVALID_DATE",
                    &format!("invalid '{}' date format, use RFC 3339", name),
                )
            }),
    }
}
