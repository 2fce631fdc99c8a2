// Composition tests — the full pipeline and the HTTP surface.
//
// These exercise the data flow between modules:
//   record -> features -> quality -> fraud -> cache -> HTTP response
// with a fixed probe and a scripted oracle, so nothing touches the
// network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use litmus::config::{Config, OracleBackend, DEFAULT_MODEL, DEFAULT_ORACLE_URL};
use litmus::models::{ContentMetadata, ContentRecord, ContentType, RiskLevel};
use litmus::oracle::{SemanticOracle, SemanticSignals};
use litmus::probe::FixedProbe;
use litmus::service::AnalysisService;
use litmus::web::{build_router, AppState};

/// Oracle that returns fixed signals and counts invocations.
struct CountingOracle {
    calls: AtomicUsize,
}

impl CountingOracle {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SemanticOracle for CountingOracle {
    async fn analyze(
        &self,
        _title: &str,
        _description: &str,
        _content_type: ContentType,
    ) -> anyhow::Result<SemanticSignals> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(SemanticSignals {
            educational_value: 0.7,
            originality: 0.6,
            ..SemanticSignals::neutral()
        })
    }
}

fn quiet_probe() -> Arc<FixedProbe> {
    Arc::new(FixedProbe {
        similarity: 0.1,
        ai_probability: 0.1,
        velocity: 0.1,
        ..FixedProbe::default()
    })
}

fn record(content_id: &str) -> ContentRecord {
    ContentRecord {
        content_id: content_id.to_string(),
        content_type: ContentType::Video,
        content_url: format!("https://cdn.example/{content_id}"),
        metadata: ContentMetadata {
            title: format!("How to make {content_id}"),
            description: "A thorough walkthrough with examples and links: http://example.com"
                .to_string(),
            tags: vec!["howto".to_string()],
            duration: 45.0,
            creator_id: Some("creator-1".to_string()),
            ..ContentMetadata::default()
        },
        engagement: None,
    }
}

fn service_with(oracle: Arc<CountingOracle>) -> Arc<AnalysisService> {
    Arc::new(
        AnalysisService::new(quiet_probe(), oracle, Duration::from_secs(3600))
            .expect("default weights are valid"),
    )
}

fn test_config() -> Config {
    Config {
        bind: "127.0.0.1".to_string(),
        port: 0,
        cache_ttl: Duration::from_secs(3600),
        oracle_backend: OracleBackend::Disabled,
        oracle_url: DEFAULT_ORACLE_URL.to_string(),
        openai_api_key: String::new(),
        openai_model: DEFAULT_MODEL.to_string(),
        oracle_timeout: Duration::from_secs(5),
    }
}

fn router(service: Arc<AnalysisService>) -> axum::Router {
    build_router(AppState {
        service,
        config: Arc::new(test_config()),
    })
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

// ============================================================
// Pipeline: record -> assessment
// ============================================================

#[tokio::test]
async fn full_pipeline_produces_consistent_assessment() {
    let oracle = Arc::new(CountingOracle::new());
    let service = service_with(Arc::clone(&oracle));

    let assessment = service.analyze(&record("v1")).await.unwrap();

    assert_eq!(assessment.content_id, "v1");
    assert_eq!(assessment.content_type, ContentType::Video);
    assert!((0.0..=1.0).contains(&assessment.quality.overall_score));
    assert!(assessment.fraud.fraud_indicators.is_empty());
    assert_eq!(assessment.fraud.risk_level, RiskLevel::Minimal);
    assert_eq!(oracle.calls(), 1);
}

#[tokio::test]
async fn warm_cache_is_byte_identical_and_skips_the_oracle() {
    let oracle = Arc::new(CountingOracle::new());
    let service = service_with(Arc::clone(&oracle));
    let input = record("v1");

    let first = service.analyze(&input).await.unwrap();
    let second = service.analyze(&input).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
    // The second call came from the cache: no new oracle invocation
    assert_eq!(oracle.calls(), 1);
}

#[tokio::test]
async fn missing_content_id_is_a_validation_error() {
    let service = service_with(Arc::new(CountingOracle::new()));
    let mut invalid = record("v1");
    invalid.content_id.clear();
    let err = service.analyze(&invalid).await.unwrap_err();
    assert!(err.to_string().contains("content_id"));
}

#[tokio::test]
async fn analysis_feeds_the_trend_history() {
    let service = service_with(Arc::new(CountingOracle::new()));
    service.analyze(&record("v1")).await.unwrap();
    service.analyze(&record("v2")).await.unwrap();

    let report = service
        .quality_trends(Some("creator-1"), "7d")
        .unwrap()
        .expect("report");
    assert_eq!(report.total_content, 2);
    assert!(report.average_score > 0.0);

    // Nothing recorded for an unknown creator
    assert!(service.quality_trends(Some("ghost"), "7d").unwrap().is_none());
}

// ============================================================
// HTTP surface
// ============================================================

#[tokio::test]
async fn analyze_endpoint_round_trip() {
    let app = router(service_with(Arc::new(CountingOracle::new())));

    let payload = serde_json::to_string(&record("v1")).unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/analyze/content")
                .header("content-type", "application/json")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["content_id"], "v1");
    assert_eq!(body["fraud"]["risk_level"], "minimal");
    assert!(body["quality"]["overall_score"].is_f64());
}

#[tokio::test]
async fn malformed_body_is_a_400_with_error_envelope() {
    let app = router(service_with(Arc::new(CountingOracle::new())));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/analyze/content")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"content_url": "https://x"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    // content_type is required at deserialization time
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn oversized_batch_is_rejected() {
    let app = router(service_with(Arc::new(CountingOracle::new())));

    let contents: Vec<ContentRecord> = (0..51).map(|i| record(&format!("v{i}"))).collect();
    let payload = serde_json::json!({ "contents": contents }).to_string();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/analyze/batch")
                .header("content-type", "application/json")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("batch size"));
}

#[tokio::test]
async fn batch_isolates_the_bad_item() {
    let app = router(service_with(Arc::new(CountingOracle::new())));

    let mut contents: Vec<ContentRecord> = (0..10).map(|i| record(&format!("v{i}"))).collect();
    let mut bad = record("v-bad");
    bad.content_id.clear();
    contents.insert(5, bad);

    let payload = serde_json::json!({ "contents": contents }).to_string();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/analyze/batch")
                .header("content-type", "application/json")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["total_processed"], 11);

    let results = body["batch_results"].as_array().unwrap();
    assert_eq!(results.len(), 11);
    let errors: Vec<&serde_json::Value> =
        results.iter().filter(|r| r.get("error").is_some()).collect();
    assert_eq!(errors.len(), 1);
    // The failed slot stays in submission order
    assert!(results[5].get("error").is_some());
    assert_eq!(results[4]["content_id"], "v4");
    assert_eq!(results[6]["content_id"], "v5");
}

#[tokio::test]
async fn creator_endpoint_flags_a_burner_account() {
    let app = router(service_with(Arc::new(CountingOracle::new())));

    let payload = serde_json::json!({
        "creator_id": "burner-account",
        "behavior": {
            "content_similarities": [0.95, 0.96],
            "engagement": { "views": 100, "likes": 80, "comments": 20, "shares": 0 }
        }
    })
    .to_string();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/analyze/creator")
                .header("content-type", "application/json")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["risk_level"], "high");
    assert_eq!(body["recommended_action"], "block_content");
    assert!(!body["fraud_indicators"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn creator_endpoint_requires_a_creator_id() {
    let app = router(service_with(Arc::new(CountingOracle::new())));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/analyze/creator")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"behavior": {}}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("creator_id"));
}

#[tokio::test]
async fn empty_trend_window_returns_no_data() {
    let app = router(service_with(Arc::new(CountingOracle::new())));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/quality/trends?creator_id=ghost&time_range=7d")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "no_data");
    assert!(body.get("average_score").is_none());
}

#[tokio::test]
async fn bad_time_range_is_a_validation_error() {
    let app = router(service_with(Arc::new(CountingOracle::new())));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/quality/trends?time_range=week")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fraud_report_acknowledged_with_id() {
    let app = router(service_with(Arc::new(CountingOracle::new())));

    let payload = serde_json::json!({
        "reporter_id": "mod-7",
        "subject_content_id": "v3",
        "reason": "reposted stolen clip",
    })
    .to_string();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/fraud/report")
                .header("content-type", "application/json")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "received");
    assert!(body["report_id"].as_str().unwrap().starts_with("fr-"));
}

#[tokio::test]
async fn report_without_subject_is_rejected() {
    let app = router(service_with(Arc::new(CountingOracle::new())));

    let payload = serde_json::json!({ "reporter_id": "mod-7" }).to_string();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/fraud/report")
                .header("content-type", "application/json")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_and_health_respond() {
    let service = service_with(Arc::new(CountingOracle::new()));
    service.analyze(&record("v1")).await.unwrap();
    let app = router(service);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "operational");
    assert_eq!(body["cache"]["total_entries"], 1);
    assert_eq!(body["creators_tracked"], 1);
    assert_eq!(body["oracle_configured"], false);
}
