// Service layer — the operations the HTTP handlers and CLI call.
//
// Owns the assessment cache and wires the extractor, scorer, and fraud
// detector together. Handlers stay thin; everything with semantics
// lives here.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, TtlCache};
use crate::features::FeatureExtractor;
use crate::fraud::FraudDetector;
use crate::models::{
    ContentAssessment, ContentRecord, CreatorBehavior, FraudAssessment, FraudReportAck,
    TrendReport,
};
use crate::oracle::SemanticOracle;
use crate::probe::MediaProbe;
use crate::scoring::{QualityScorer, ScoreWeights};

pub const MAX_BATCH_SIZE: usize = 50;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing or malformed caller input — surfaced as a 4xx.
    #[error("{0}")]
    Validation(String),
    /// Unexpected fault — logged in full, surfaced generically.
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

pub struct AnalysisService {
    cache: TtlCache<ContentAssessment>,
    extractor: FeatureExtractor,
    scorer: QualityScorer,
    detector: FraudDetector,
    started_at: DateTime<Utc>,
}

/// Per-item batch result. Failed items keep their slot so callers can
/// line results up with the submitted order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchItem {
    Ok(ContentAssessment),
    Err { content_id: String, error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub batch_results: Vec<BatchItem>,
    pub total_processed: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub status: &'static str,
    pub cache: CacheStats,
    pub creators_tracked: usize,
    pub content_hashes_tracked: usize,
    pub uptime_secs: i64,
    pub timestamp: DateTime<Utc>,
}

/// Inbound fraud report. Free-form details are kept as-is; only the
/// reporter and subject are required.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FraudReport {
    pub reporter_id: String,
    pub subject_content_id: Option<String>,
    pub subject_creator_id: Option<String>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub details: serde_json::Value,
}

impl AnalysisService {
    pub fn new(
        probe: Arc<dyn MediaProbe>,
        oracle: Arc<dyn SemanticOracle>,
        cache_ttl: std::time::Duration,
    ) -> anyhow::Result<Self> {
        let scorer = QualityScorer::new(ScoreWeights::default())?;
        Ok(Self {
            cache: TtlCache::new(cache_ttl),
            extractor: FeatureExtractor::new(Arc::clone(&probe), oracle),
            scorer,
            detector: FraudDetector::new(probe),
            started_at: Utc::now(),
        })
    }

    /// Full assessment of one content record. Cached per content id; a
    /// warm hit returns the stored assessment without re-running any
    /// stage of the pipeline.
    pub async fn analyze(&self, record: &ContentRecord) -> Result<ContentAssessment, ServiceError> {
        validate(record)?;

        let cache_key = format!("analysis:{}", record.content_id);
        if let Some(cached) = self.cache.get(&cache_key) {
            debug!(content_id = %record.content_id, "returning cached assessment");
            return Ok(cached);
        }

        let features = self.extractor.extract(record).await;
        let quality = self.scorer.score(&features);
        let fraud = self.detector.assess_content(record, Some(quality.overall_score));

        info!(
            content_id = %record.content_id,
            overall = quality.overall_score,
            rating = %quality.quality_rating,
            risk = %fraud.risk_level,
            "content assessed"
        );

        let assessment = ContentAssessment {
            content_id: record.content_id.clone(),
            content_type: record.content_type,
            quality,
            fraud,
            analysis_timestamp: Utc::now(),
        };
        self.cache.set(&cache_key, assessment.clone());
        Ok(assessment)
    }

    /// Assess up to MAX_BATCH_SIZE records. One bad record does not sink
    /// the batch — its slot carries the error instead.
    pub async fn analyze_batch(
        &self,
        records: &[ContentRecord],
    ) -> Result<BatchReport, ServiceError> {
        if records.is_empty() {
            return Err(ServiceError::Validation("no contents provided".to_string()));
        }
        if records.len() > MAX_BATCH_SIZE {
            return Err(ServiceError::Validation(format!(
                "batch size too large (max {MAX_BATCH_SIZE})"
            )));
        }

        let mut results = Vec::with_capacity(records.len());
        for record in records {
            match self.analyze(record).await {
                Ok(assessment) => results.push(BatchItem::Ok(assessment)),
                Err(err) => {
                    warn!(content_id = %record.content_id, %err, "batch item failed");
                    results.push(BatchItem::Err {
                        content_id: if record.content_id.is_empty() {
                            "unknown".to_string()
                        } else {
                            record.content_id.clone()
                        },
                        error: err.to_string(),
                    });
                }
            }
        }

        Ok(BatchReport {
            total_processed: results.len(),
            batch_results: results,
            timestamp: Utc::now(),
        })
    }

    /// Windowed quality trends. `time_range` is a day count with a `d`
    /// suffix ("1d", "7d", "30d"). `None` means no scored content fell
    /// inside the window.
    pub fn quality_trends(
        &self,
        creator_id: Option<&str>,
        time_range: &str,
    ) -> Result<Option<TrendReport>, ServiceError> {
        let days = parse_time_range(time_range)?;
        Ok(self.scorer.trends().trends(creator_id, days))
    }

    /// Run the creator-level fraud battery against supplied behavior.
    pub fn assess_creator(
        &self,
        creator_id: &str,
        behavior: &CreatorBehavior,
    ) -> Result<FraudAssessment, ServiceError> {
        if creator_id.is_empty() {
            return Err(ServiceError::Validation("creator_id is required".to_string()));
        }
        Ok(self.detector.assess_creator(creator_id, behavior))
    }

    /// Record a suspicious-activity report and hand back a stable id.
    pub fn report_fraud(&self, report: &FraudReport) -> Result<FraudReportAck, ServiceError> {
        if report.reporter_id.is_empty() {
            return Err(ServiceError::Validation("reporter_id is required".to_string()));
        }
        if report.subject_content_id.is_none() && report.subject_creator_id.is_none() {
            return Err(ServiceError::Validation(
                "a subject_content_id or subject_creator_id is required".to_string(),
            ));
        }

        let received_at = Utc::now();
        let report_id = report_id(report, received_at);
        info!(
            %report_id,
            reporter = %report.reporter_id,
            reason = %report.reason,
            "fraud report received"
        );
        Ok(FraudReportAck {
            report_id,
            status: "received".to_string(),
            received_at,
        })
    }

    pub fn status(&self) -> ServiceStatus {
        ServiceStatus {
            status: "operational",
            cache: self.cache.stats(),
            creators_tracked: self.detector.tracked_creators(),
            content_hashes_tracked: self.detector.tracked_hashes(),
            uptime_secs: (Utc::now() - self.started_at).num_seconds(),
            timestamp: Utc::now(),
        }
    }

    /// Drop expired cache entries. Called periodically by the server loop.
    pub fn sweep_cache(&self) -> usize {
        self.cache.cleanup_expired()
    }
}

fn validate(record: &ContentRecord) -> Result<(), ServiceError> {
    if record.content_id.is_empty() {
        return Err(ServiceError::Validation("content_id is required".to_string()));
    }
    if record.content_url.is_empty() {
        return Err(ServiceError::Validation("content_url is required".to_string()));
    }
    Ok(())
}

fn parse_time_range(raw: &str) -> Result<i64, ServiceError> {
    let days = raw
        .strip_suffix('d')
        .and_then(|n| n.parse::<i64>().ok())
        .filter(|d| *d > 0)
        .ok_or_else(|| {
            ServiceError::Validation(format!(
                "invalid time_range {raw:?} (expected a day count like \"7d\")"
            ))
        })?;
    Ok(days)
}

fn report_id(report: &FraudReport, received_at: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(report.reporter_id.as_bytes());
    if let Some(id) = &report.subject_content_id {
        hasher.update(id.as_bytes());
    }
    if let Some(id) = &report.subject_creator_id {
        hasher.update(id.as_bytes());
    }
    hasher.update(received_at.timestamp_micros().to_le_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(24);
    for byte in &digest[..12] {
        hex.push_str(&format!("{byte:02x}"));
    }
    format!("fr-{hex}")
}
