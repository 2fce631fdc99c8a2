// JSON handlers for the analysis API.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::error;

use crate::config::OracleBackend;
use crate::models::ContentRecord;
use crate::service::{FraudReport, ServiceError};
use crate::web::{api_error, AppState};

/// Map a service failure onto the wire. Validation details go to the
/// caller; internal detail stays in the server log.
fn service_error(err: ServiceError) -> Response {
    match err {
        ServiceError::Validation(message) => api_error(StatusCode::BAD_REQUEST, &message),
        ServiceError::Internal(inner) => {
            error!(error = ?inner, "request failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
        }
    }
}

fn bad_body(rejection: JsonRejection) -> Response {
    api_error(StatusCode::BAD_REQUEST, &rejection.body_text())
}

/// POST /api/analyze/content — full assessment of one record.
pub async fn analyze_content(
    State(state): State<AppState>,
    payload: Result<Json<ContentRecord>, JsonRejection>,
) -> Response {
    let Json(record) = match payload {
        Ok(json) => json,
        Err(rejection) => return bad_body(rejection),
    };

    match state.service.analyze(&record).await {
        Ok(assessment) => Json(assessment).into_response(),
        Err(err) => service_error(err),
    }
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub contents: Vec<ContentRecord>,
}

/// POST /api/analyze/batch — up to 50 records, per-item isolation.
pub async fn analyze_batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return bad_body(rejection),
    };

    match state.service.analyze_batch(&request.contents).await {
        Ok(report) => Json(report).into_response(),
        Err(err) => service_error(err),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatorAnalysisRequest {
    #[serde(default)]
    pub creator_id: String,
    #[serde(default)]
    pub behavior: crate::models::CreatorBehavior,
}

/// POST /api/analyze/creator — creator-level fraud battery over
/// platform-supplied behavior.
pub async fn analyze_creator(
    State(state): State<AppState>,
    payload: Result<Json<CreatorAnalysisRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return bad_body(rejection),
    };

    match state
        .service
        .assess_creator(&request.creator_id, &request.behavior)
    {
        Ok(assessment) => Json(assessment).into_response(),
        Err(err) => service_error(err),
    }
}

#[derive(Debug, Deserialize)]
pub struct TrendsQuery {
    pub creator_id: Option<String>,
    #[serde(default = "default_time_range")]
    pub time_range: String,
}

fn default_time_range() -> String {
    "7d".to_string()
}

/// GET /api/quality/trends?creator_id=...&time_range=7d
pub async fn quality_trends(
    State(state): State<AppState>,
    Query(query): Query<TrendsQuery>,
) -> Response {
    match state
        .service
        .quality_trends(query.creator_id.as_deref(), &query.time_range)
    {
        Ok(Some(report)) => Json(report).into_response(),
        // Nothing scored in the window — distinct from a zeroed report
        Ok(None) => Json(serde_json::json!({
            "status": "no_data",
            "message": "no content scored in this window",
            "time_range": query.time_range,
        }))
        .into_response(),
        Err(err) => service_error(err),
    }
}

/// POST /api/fraud/report — record suspicious activity for review.
pub async fn report_fraud(
    State(state): State<AppState>,
    payload: Result<Json<FraudReport>, JsonRejection>,
) -> Response {
    let Json(report) = match payload {
        Ok(json) => json,
        Err(rejection) => return bad_body(rejection),
    };

    match state.service.report_fraud(&report) {
        Ok(ack) => Json(ack).into_response(),
        Err(err) => service_error(err),
    }
}

/// GET /api/status — component status snapshot.
pub async fn get_status(State(state): State<AppState>) -> Response {
    let status = state.service.status();
    Json(serde_json::json!({
        "status": status.status,
        "cache": status.cache,
        "creators_tracked": status.creators_tracked,
        "content_hashes_tracked": status.content_hashes_tracked,
        "oracle_configured": state.config.oracle_backend == OracleBackend::Remote,
        "uptime_secs": status.uptime_secs,
        "timestamp": status.timestamp,
    }))
    .into_response()
}
