// Data models — the types that flow through the assessment pipeline.
//
// These are separate from the scoring and fraud modules so the web layer
// and CLI can use them without depending on the engine internals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One piece of user-generated content submitted for assessment.
///
/// Created per incoming request and never mutated — the extractor,
/// scorer, and fraud detector all read from the same record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRecord {
    #[serde(default)]
    pub content_id: String,
    pub content_type: ContentType,
    #[serde(default)]
    pub content_url: String,
    #[serde(default)]
    pub metadata: ContentMetadata,
    /// Engagement counters at submission time, if the platform has them.
    #[serde(default)]
    pub engagement: Option<EngagementCounters>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Video,
    Image,
    Text,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Video => "video",
            ContentType::Image => "image",
            ContentType::Text => "text",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Duration in seconds. Zero/absent for images and text.
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub creator_id: Option<String>,
    /// When the content was created, per the uploader's metadata.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// When the content was uploaded to the platform.
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub edit_count: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EngagementCounters {
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub shares: u64,
}

/// Qualitative rating derived from the overall quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityRating {
    /// Determine the rating from an overall score (0.0-1.0).
    /// Thresholds are exclusive lower bounds: excellent >= 0.8,
    /// good >= 0.6, fair >= 0.4, everything else poor.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 0.8 => QualityRating::Excellent,
            s if s >= 0.6 => QualityRating::Good,
            s if s >= 0.4 => QualityRating::Fair,
            _ => QualityRating::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityRating::Excellent => "excellent",
            QualityRating::Good => "good",
            QualityRating::Fair => "fair",
            QualityRating::Poor => "poor",
        }
    }
}

impl std::fmt::Display for QualityRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The scored output of the quality engine for one content record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub engagement: f64,
    pub educational: f64,
    pub creativity: f64,
    pub safety: f64,
    pub production: f64,
    /// Weighted sum of the five sub-scores.
    pub overall_score: f64,
    pub quality_rating: QualityRating,
    /// Advisory strings in fixed check order (engagement, educational,
    /// creativity, production, safety). Order matters for display.
    pub recommendations: Vec<String>,
    pub scoring_timestamp: DateTime<Utc>,
}

/// Fraud risk tier derived from the aggregated confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Minimal,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Determine the risk level from a confidence score.
    /// Canonical scale: high >= 0.8, medium >= 0.5, low >= 0.3.
    pub fn from_confidence(confidence: f64) -> Self {
        match confidence {
            c if c >= 0.8 => RiskLevel::High,
            c if c >= 0.5 => RiskLevel::Medium,
            c if c >= 0.3 => RiskLevel::Low,
            _ => RiskLevel::Minimal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Minimal => "minimal",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// Pure lookup from risk level to the action the platform should take.
    pub fn recommended_action(&self) -> RecommendedAction {
        match self {
            RiskLevel::High => RecommendedAction::BlockContent,
            RiskLevel::Medium => RecommendedAction::FlagForReview,
            RiskLevel::Low => RecommendedAction::Monitor,
            RiskLevel::Minimal => RecommendedAction::Allow,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    Allow,
    Monitor,
    FlagForReview,
    BlockContent,
    /// Assigned when analysis itself failed and no risk level could be
    /// computed — a human has to look.
    ManualReview,
}

impl RecommendedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendedAction::Allow => "allow",
            RecommendedAction::Monitor => "monitor",
            RecommendedAction::FlagForReview => "flag_for_review",
            RecommendedAction::BlockContent => "block_content",
            RecommendedAction::ManualReview => "manual_review",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Severity of a fired indicator, from its sub-score.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 0.8 => Severity::High,
            s if s >= 0.5 => Severity::Medium,
            _ => Severity::Low,
        }
    }
}

/// One fired fraud check contributing to the confidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudIndicator {
    #[serde(rename = "type")]
    pub kind: String,
    pub score: f64,
    pub description: String,
    pub severity: Severity,
}

/// The fraud engine's output for one content record or creator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudAssessment {
    pub fraud_indicators: Vec<FraudIndicator>,
    /// Sum of fired check contributions. Not a probability — can exceed
    /// 1.0 when several heavy checks fire; callers clamp for display.
    pub confidence_score: f64,
    pub risk_level: RiskLevel,
    pub recommended_action: RecommendedAction,
    pub analysis_timestamp: DateTime<Utc>,
}

impl FraudAssessment {
    /// Assessment for a battery with no usable signal (every check
    /// degraded): nothing could be measured, so route to a human.
    pub fn fallback(now: DateTime<Utc>) -> Self {
        Self {
            fraud_indicators: vec![],
            confidence_score: 0.0,
            risk_level: RiskLevel::Medium,
            recommended_action: RecommendedAction::ManualReview,
            analysis_timestamp: now,
        }
    }
}

/// The composite result cached per content id and returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentAssessment {
    pub content_id: String,
    pub content_type: ContentType,
    pub quality: QualityAssessment,
    pub fraud: FraudAssessment,
    pub analysis_timestamp: DateTime<Utc>,
}

/// Observed behavior of one creator account, supplied by the platform
/// for the creator-level fraud battery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatorBehavior {
    /// Upload timestamps, most recent last.
    #[serde(default)]
    pub upload_times: Vec<DateTime<Utc>>,
    /// Pairwise similarity scores between the creator's recent uploads.
    #[serde(default)]
    pub content_similarities: Vec<f64>,
    #[serde(default)]
    pub engagement: Option<EngagementCounters>,
    #[serde(default)]
    pub profile: Option<CreatorProfileInfo>,
    #[serde(default)]
    pub account_age_days: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatorProfileInfo {
    #[serde(default)]
    pub has_avatar: bool,
    #[serde(default)]
    pub has_bio: bool,
    #[serde(default)]
    pub verified_email: bool,
    #[serde(default)]
    pub has_social_links: bool,
}

/// Windowed trend summary for a creator (or all creators).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendReport {
    pub average_score: f64,
    pub highest_score: f64,
    pub lowest_score: f64,
    /// "improving" iff there are >= 2 entries in the window and the
    /// chronologically last score exceeds the first. No smoothing.
    pub score_trend: ScoreTrend,
    pub total_content: usize,
    pub score_distribution: ScoreDistribution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTrend {
    Improving,
    Stable,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    pub excellent: usize,
    pub good: usize,
    pub fair: usize,
    pub poor: usize,
}

/// Acknowledgement returned for a submitted fraud report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudReportAck {
    pub report_id: String,
    pub status: String,
    pub received_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_boundaries() {
        assert_eq!(QualityRating::from_score(0.8), QualityRating::Excellent);
        assert_eq!(QualityRating::from_score(0.79999), QualityRating::Good);
        assert_eq!(QualityRating::from_score(0.6), QualityRating::Good);
        assert_eq!(QualityRating::from_score(0.4), QualityRating::Fair);
        assert_eq!(QualityRating::from_score(0.39999), QualityRating::Poor);
    }

    #[test]
    fn rating_nan_falls_to_poor() {
        // NaN fails all >= comparisons, so it falls through to the wildcard arm
        assert_eq!(QualityRating::from_score(f64::NAN), QualityRating::Poor);
    }

    #[test]
    fn risk_level_boundaries() {
        assert_eq!(RiskLevel::from_confidence(0.8), RiskLevel::High);
        assert_eq!(RiskLevel::from_confidence(0.5), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_confidence(0.3), RiskLevel::Low);
        assert_eq!(RiskLevel::from_confidence(0.29), RiskLevel::Minimal);
        // Confidence can exceed 1.0 — still high
        assert_eq!(RiskLevel::from_confidence(1.4), RiskLevel::High);
    }

    #[test]
    fn action_lookup_is_exhaustive() {
        assert_eq!(
            RiskLevel::High.recommended_action(),
            RecommendedAction::BlockContent
        );
        assert_eq!(
            RiskLevel::Medium.recommended_action(),
            RecommendedAction::FlagForReview
        );
        assert_eq!(RiskLevel::Low.recommended_action(), RecommendedAction::Monitor);
        assert_eq!(RiskLevel::Minimal.recommended_action(), RecommendedAction::Allow);
    }
}
