// Quality score formulas.
//
// Each of the five dimensions starts from a base value and accumulates
// additive bonuses tied to feature thresholds. Where the oracle supplies
// a semantic estimate for the same dimension, the rule-based running
// score and the semantic value are blended by arithmetic mean at a fixed
// point in the formula — a deliberate equal-weight policy, applied in a
// fixed order relative to the other adjustments. Every sub-score is
// clamped to [0, 1] once, after all adjustments.

use anyhow::Result;
use chrono::Utc;

use crate::features::FeatureSet;
use crate::models::{QualityAssessment, QualityRating};
use crate::scoring::trends::TrendTracker;

/// Weights for combining the five sub-scores into the overall index.
///
/// Must sum to 1.0 — `validate` rejects anything else at startup so a
/// bad weight vector can never silently skew every assessment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub engagement: f64,
    pub educational: f64,
    pub creativity: f64,
    pub safety: f64,
    pub production: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            engagement: 0.25,
            educational: 0.20,
            creativity: 0.20,
            safety: 0.15,
            production: 0.20,
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.engagement + self.educational + self.creativity + self.safety + self.production
    }

    /// Reject weight vectors that don't sum to 1.0 (within 0.01).
    pub fn validate(&self) -> Result<()> {
        let sum = self.sum();
        if (sum - 1.0).abs() > 0.01 {
            anyhow::bail!("Quality weights must sum to 1.0, got {sum:.4}");
        }
        Ok(())
    }
}

pub struct QualityScorer {
    weights: ScoreWeights,
    trends: TrendTracker,
}

impl QualityScorer {
    pub fn new(weights: ScoreWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self {
            weights,
            trends: TrendTracker::new(),
        })
    }

    pub fn weights(&self) -> ScoreWeights {
        self.weights
    }

    pub fn trends(&self) -> &TrendTracker {
        &self.trends
    }

    /// Score a feature set and record the result in the creator's
    /// trend history.
    pub fn score(&self, features: &FeatureSet) -> QualityAssessment {
        let engagement = engagement_score(features);
        let educational = educational_score(features);
        let creativity = creativity_score(features);
        let safety = safety_score(features);
        let production = production_score(features);

        let overall_score = engagement * self.weights.engagement
            + educational * self.weights.educational
            + creativity * self.weights.creativity
            + safety * self.weights.safety
            + production * self.weights.production;

        let recommendations = recommendations(
            features,
            engagement,
            educational,
            creativity,
            production,
            safety,
        );

        if let Some(creator_id) = &features.creator_id {
            self.trends.record(
                creator_id,
                &features.content_id,
                overall_score,
                features.content_type,
                Utc::now(),
            );
        }

        QualityAssessment {
            engagement,
            educational,
            creativity,
            safety,
            production,
            overall_score,
            quality_rating: QualityRating::from_score(overall_score),
            recommendations,
            scoring_timestamp: Utc::now(),
        }
    }
}

/// Engagement potential. Base 0.5; title shape and duration sweet spots
/// add bonuses, the semantic estimate is blended in mid-formula, and
/// motion/face/hashtag signals adjust afterwards.
pub fn engagement_score(f: &FeatureSet) -> f64 {
    let mut score = 0.5;

    let title_length = f.num_or("title_length", 0.0);
    if (10.0..=60.0).contains(&title_length) {
        score += 0.1;
    }
    if f.flag("title_has_caps") {
        score += 0.05;
    }
    if f.num_or("title_exclamation_count", 0.0) > 0.0 {
        score += 0.05;
    }
    if f.num_or("title_question_count", 0.0) > 0.0 {
        score += 0.05;
    }

    if let Some(duration) = f.num("video_duration") {
        if (15.0..=60.0).contains(&duration) {
            score += 0.15;
        } else if duration < 5.0 {
            score -= 0.1;
        } else if duration > 180.0 {
            score -= 0.1;
        }
    }

    if f.num_or("brightness_score", 0.0) > 0.5 {
        score += 0.05;
    }
    if f.num_or("contrast_score", 0.0) > 0.6 {
        score += 0.05;
    }
    if f.num_or("color_variety", 0.0) > 0.6 {
        score += 0.05;
    }

    // Blend with the semantic engagement estimate, then keep adjusting
    score = (score + f.num_or("ai_engagement_potential", 0.5)) / 2.0;

    if f.num_or("motion_score", 0.0) > 0.3 {
        score += 0.1;
    }
    if f.num_or("face_detection_confidence", 0.0) > 0.7 {
        score += 0.05;
    }
    let hashtag_count = f.num_or("description_hashtag_count", 0.0);
    if (2.0..=10.0).contains(&hashtag_count) {
        score += 0.05;
    }

    score.clamp(0.0, 1.0)
}

/// Educational value. Base 0.3, blended twice with semantic estimates
/// (educational value up front, content depth mid-formula).
pub fn educational_score(f: &FeatureSet) -> f64 {
    let mut score = 0.3;
    score = (score + f.num_or("ai_educational_value", 0.3)) / 2.0;

    let desc_length = f.num_or("description_length", 0.0);
    if desc_length > 100.0 {
        score += 0.15;
    }
    if desc_length > 300.0 {
        score += 0.1;
    }
    if f.num_or("description_word_count", 0.0) > 50.0 {
        score += 0.1;
    }
    if f.num_or("avg_word_length", 0.0) > 5.0 {
        score += 0.05;
    }

    score = (score + f.num_or("ai_content_depth", 0.3)) / 2.0;

    if f.flag("description_has_links") {
        score += 0.1;
    }
    if f.num_or("video_duration", 0.0) > 60.0 {
        score += 0.1;
    }
    if matches!(
        f.label("ai_category"),
        Some("education" | "technology" | "science" | "tutorial")
    ) {
        score += 0.2;
    }

    score.clamp(0.0, 1.0)
}

/// Creativity and originality. Base 0.4, blended with the semantic
/// originality estimate up front.
pub fn creativity_score(f: &FeatureSet) -> f64 {
    let mut score = 0.4;
    score = (score + f.num_or("ai_originality", 0.4)) / 2.0;

    if f.num_or("color_variety", 0.0) > 0.7 {
        score += 0.1;
    }
    if f.num_or("color_diversity", 0.0) > 0.6 {
        score += 0.05;
    }

    let scene_changes = f.num_or("scene_changes", 0.0);
    let duration = f.num_or("video_duration", 30.0);
    if duration > 0.0 && scene_changes / duration > 0.1 {
        score += 0.1;
    }

    if f.flag("text_overlay_detected") {
        score += 0.05;
    }
    if f.num_or("title_word_count", 0.0) > 8.0 {
        score += 0.05;
    }
    let emoji_count = f.num_or("emoji_count", 0.0);
    if (1.0..=5.0).contains(&emoji_count) {
        score += 0.05;
    }
    if f.num_or("composition_score", 0.0) > 0.7 {
        score += 0.1;
    }
    let aspect_ratio = f.num_or("aspect_ratio", 1.0);
    if !(0.9..=1.1).contains(&aspect_ratio) {
        score += 0.05;
    }

    score.clamp(0.0, 1.0)
}

/// Content safety. Starts from a high-safety assumption, blended with the
/// semantic safety estimate; toxicity scales the score down directly.
pub fn safety_score(f: &FeatureSet) -> f64 {
    let mut score = 0.8;
    score = (score + f.num_or("ai_safety_score", 0.8)) / 2.0;

    score -= f.num_or("toxicity_score", 0.0) * 0.5;

    if f.num_or("capitalization_ratio", 0.0) > 0.3 {
        score -= 0.1;
    }
    if f.num_or("title_exclamation_count", 0.0) > 3.0 {
        score -= 0.05;
    }

    let sentiment = f.num_or("sentiment_score", 0.0);
    if sentiment < -0.3 {
        score -= 0.1;
    } else if sentiment > 0.3 {
        score += 0.05;
    }

    let brightness = f.num_or("brightness_score", 0.5);
    if !(0.2..=0.9).contains(&brightness) {
        score -= 0.05;
    }

    score.clamp(0.0, 1.0)
}

/// Technical production quality. Base 0.5, blended with the semantic
/// production estimate up front.
pub fn production_score(f: &FeatureSet) -> f64 {
    let mut score = 0.5;
    score = (score + f.num_or("ai_production_quality", 0.5)) / 2.0;

    let sharpness = f.num_or("sharpness_score", 0.0);
    if sharpness > 0.7 {
        score += 0.15;
    } else if sharpness < 0.3 {
        score -= 0.1;
    }

    let brightness = f.num_or("brightness_score", 0.5);
    if (0.3..=0.8).contains(&brightness) {
        score += 0.05;
    }
    if f.num_or("contrast_score", 0.0) > 0.5 {
        score += 0.05;
    }

    match f.label("estimated_resolution") {
        Some("4K") => score += 0.15,
        Some("1080p") => score += 0.1,
        _ => {}
    }

    if f.flag("has_audio") {
        score += 0.05;
    }
    if f.num_or("composition_score", 0.0) > 0.6 {
        score += 0.1;
    }
    if f.num_or("estimated_fps", 0.0) >= 30.0 {
        score += 0.05;
    }
    if f.num_or("face_detection_confidence", 0.0) > 0.8 {
        score += 0.05;
    }

    score.clamp(0.0, 1.0)
}

/// Advisory strings keyed on which sub-scores fell below their thresholds.
/// Check order is fixed (engagement, educational, creativity, production,
/// safety) because the output order matters for display.
fn recommendations(
    f: &FeatureSet,
    engagement: f64,
    educational: f64,
    creativity: f64,
    production: f64,
    safety: f64,
) -> Vec<String> {
    let mut recs = Vec::new();

    if engagement < 0.6 {
        if f.num_or("title_length", 0.0) < 10.0 {
            recs.push("Consider making your title more descriptive and engaging".to_string());
        }
        if f.num_or("video_duration", 0.0) < 10.0 {
            recs.push("Try creating longer content to provide more value".to_string());
        }
        if f.num_or("motion_score", 0.0) < 0.3 {
            recs.push("Add more dynamic elements or movement to increase engagement".to_string());
        }
    }

    if educational < 0.5 {
        if f.num_or("description_length", 0.0) < 50.0 {
            recs.push("Add more detailed descriptions to increase educational value".to_string());
        }
        recs.push("Consider adding educational elements or explaining concepts".to_string());
    }

    if creativity < 0.5 {
        recs.push("Try experimenting with unique angles or creative approaches".to_string());
        if f.num_or("color_variety", 0.0) < 0.5 {
            recs.push("Consider using more diverse colors or visual elements".to_string());
        }
    }

    if production < 0.6 {
        if f.num_or("sharpness_score", 0.0) < 0.5 {
            recs.push("Improve image sharpness and focus".to_string());
        }
        let brightness = f.num_or("brightness_score", 0.0);
        if brightness < 0.3 {
            recs.push("Increase lighting for better visibility".to_string());
        }
        if brightness > 0.9 {
            recs.push("Reduce overexposure for better visual quality".to_string());
        }
    }

    if safety < 0.7 {
        if f.num_or("toxicity_score", 0.0) > 0.3 {
            recs.push("Review content for potentially harmful language".to_string());
        }
        recs.push("Ensure content follows community guidelines".to_string());
    }

    if recs.is_empty() {
        recs.push("Great work! Your content shows good quality across all dimensions".to_string());
    }

    recs
}
