// Web server — thin axum layer over the analysis service.
//
// All routes serve JSON. Validation failures and body-deserialization
// rejections come back as 400 with an {"error": ...} envelope; internal
// faults are logged in full and surfaced as a generic 500.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::config::Config;
use crate::service::AnalysisService;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AnalysisService>,
    pub config: Arc<Config>,
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(
    config: Config,
    service: Arc<AnalysisService>,
    port: u16,
    bind: &str,
) -> Result<()> {
    let state = AppState {
        service: Arc::clone(&service),
        config: Arc::new(config),
    };

    // Expired cache entries are evicted lazily on read; this sweep keeps
    // never-touched keys from lingering.
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(300));
        loop {
            ticker.tick().await;
            let removed = service.sweep_cache();
            if removed > 0 {
                debug!(removed, "swept expired cache entries");
            }
        }
    });

    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("litmus listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/analyze/content", post(handlers::analyze_content))
        .route("/api/analyze/batch", post(handlers::analyze_batch))
        .route("/api/analyze/creator", post(handlers::analyze_creator))
        .route("/api/quality/trends", get(handlers::quality_trends))
        .route("/api/fraud/report", post(handlers::report_fraud))
        .route("/api/status", get(handlers::get_status))
        .route("/health", get(health))
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Deployment health check — always returns 200 OK.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
