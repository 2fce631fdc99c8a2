// Content-level fraud checks. Each is a pure function over the record
// (plus probe signals or profile history) returning a CheckOutcome; the
// detector in mod.rs owns the state and the aggregation.

use crate::models::ContentRecord;
use crate::probe::MediaProbe;

use super::CheckOutcome;

pub(super) const SIMILARITY_THRESHOLD: f64 = 0.85;
const AI_PROBABILITY_THRESHOLD: f64 = 0.8;
const QUALITY_DROP_THRESHOLD: f64 = 0.3;
// Scores live in [0,1], so their variance is bounded by 0.25 — a 0.3
// threshold only makes sense against the standard deviation.
const SCORE_SPREAD_THRESHOLD: f64 = 0.3;

/// Phrases that count as disclosing AI involvement.
const AI_DISCLOSURE_TERMS: &[&str] = &[
    "generated",
    "artificial",
    "synthetic",
    "ai-created",
    "machine-generated",
    "automated",
    "algorithmic",
];

/// AI-likely content with no disclosure anywhere in the title,
/// description, or tags.
pub(super) fn check_undisclosed_ai(record: &ContentRecord, probe: &dyn MediaProbe) -> CheckOutcome {
    let probability = probe.ai_probability(record);
    if !probability.is_finite() {
        return CheckOutcome::degraded("ai probability probe returned a non-finite value");
    }
    if probability <= AI_PROBABILITY_THRESHOLD {
        return CheckOutcome::Clear;
    }

    let mut haystack = record.metadata.title.to_lowercase();
    haystack.push(' ');
    haystack.push_str(&record.metadata.description.to_lowercase());
    for tag in &record.metadata.tags {
        haystack.push(' ');
        haystack.push_str(&tag.to_lowercase());
    }

    let disclosed = AI_DISCLOSURE_TERMS.iter().any(|term| haystack.contains(term));
    if disclosed {
        CheckOutcome::Clear
    } else {
        CheckOutcome::fired(
            probability,
            "Content appears to be AI-generated without proper disclosure",
        )
    }
}

/// Composite of three signals: inflated like ratio, inflated comment
/// ratio, and abnormal engagement velocity. The sub-score is the fraction
/// of signals that tripped.
pub(super) fn check_engagement_manipulation(
    record: &ContentRecord,
    probe: &dyn MediaProbe,
) -> CheckOutcome {
    let velocity = probe.engagement_velocity(record);
    if !velocity.is_finite() {
        return CheckOutcome::degraded("velocity probe returned a non-finite value");
    }

    let mut tripped = 0u32;
    if let Some(engagement) = &record.engagement {
        if engagement.views > 0 {
            let views = engagement.views as f64;
            if engagement.likes as f64 / views > 0.3 {
                tripped += 1;
            }
            if engagement.comments as f64 / views > 0.1 {
                tripped += 1;
            }
        }
    }
    if velocity > 0.8 {
        tripped += 1;
    }

    if tripped > 0 {
        CheckOutcome::fired(
            f64::from(tripped) / 3.0,
            "Engagement patterns appear artificially inflated",
        )
    } else {
        CheckOutcome::Clear
    }
}

/// Rapid-fire uploading or an erratic quality history.
pub(super) fn check_behavior_anomaly(
    uploads_last_hour: usize,
    recent_scores: &[f64],
) -> CheckOutcome {
    if uploads_last_hour > super::UPLOAD_RATE_LIMIT {
        return CheckOutcome::fired(0.8, "Upload rate far exceeds normal creator behavior");
    }
    if recent_scores.len() >= 5 && variance(recent_scores).sqrt() > SCORE_SPREAD_THRESHOLD {
        return CheckOutcome::fired(0.6, "Quality scores vary erratically across recent uploads");
    }
    CheckOutcome::Clear
}

/// A sharp drop below the creator's recent average. The sub-score is the
/// size of the drop.
pub(super) fn check_quality_inconsistency(
    recent_scores: &[f64],
    current_score: Option<f64>,
) -> CheckOutcome {
    let Some(current) = current_score else {
        return CheckOutcome::Clear;
    };
    if recent_scores.len() < 3 {
        return CheckOutcome::Clear;
    }
    let window = &recent_scores[recent_scores.len().saturating_sub(5)..];
    let average = window.iter().sum::<f64>() / window.len() as f64;
    let drop = average - current;
    if drop > QUALITY_DROP_THRESHOLD {
        CheckOutcome::fired(
            drop.clamp(0.0, 1.0),
            "Quality dropped sharply below the creator's recent average",
        )
    } else {
        CheckOutcome::Clear
    }
}

/// Tampered-looking metadata: implausible creation/upload gap, excessive
/// edits, or more than one required field missing. Fires on the strongest
/// condition.
pub(super) fn check_metadata_manipulation(record: &ContentRecord) -> CheckOutcome {
    let meta = &record.metadata;
    let mut score: f64 = 0.0;

    if let (Some(created), Some(uploaded)) = (meta.created_at, meta.uploaded_at) {
        let gap = (uploaded - created).num_seconds().abs();
        if gap > 86_400 * 30 {
            score = score.max(0.6);
        }
    }
    if meta.edit_count.unwrap_or(0) > 20 {
        score = score.max(0.4);
    }

    let missing = [
        record.content_id.is_empty(),
        record.content_url.is_empty(),
        meta.title.is_empty(),
        meta.description.is_empty(),
    ]
    .iter()
    .filter(|m| **m)
    .count();
    if missing > 1 {
        score = score.max(0.5);
    }

    if score > 0.0 {
        CheckOutcome::fired(score, "Content metadata appears to be manipulated")
    } else {
        CheckOutcome::Clear
    }
}

fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentMetadata, ContentType, EngagementCounters};
    use crate::probe::FixedProbe;
    use chrono::{Duration, Utc};

    fn base_record() -> ContentRecord {
        ContentRecord {
            content_id: "v1".to_string(),
            content_type: ContentType::Video,
            content_url: "https://cdn.example/v1".to_string(),
            metadata: ContentMetadata {
                title: "my honest upload".to_string(),
                description: "filmed on a phone".to_string(),
                ..Default::default()
            },
            engagement: None,
        }
    }

    #[test]
    fn ai_disclosure_suppresses_the_check() {
        let probe = FixedProbe {
            ai_probability: 0.9,
            ..Default::default()
        };
        let mut record = base_record();
        assert!(matches!(
            check_undisclosed_ai(&record, &probe),
            CheckOutcome::Fired { .. }
        ));

        record.metadata.tags = vec!["AI-Created".to_string()];
        assert_eq!(check_undisclosed_ai(&record, &probe), CheckOutcome::Clear);
    }

    #[test]
    fn ai_below_threshold_is_clear() {
        let probe = FixedProbe {
            ai_probability: 0.8,
            ..Default::default()
        };
        assert_eq!(
            check_undisclosed_ai(&base_record(), &probe),
            CheckOutcome::Clear
        );
    }

    #[test]
    fn manipulation_score_is_fraction_of_tripped_signals() {
        let probe = FixedProbe {
            velocity: 0.9,
            ..Default::default()
        };
        let mut record = base_record();
        record.engagement = Some(EngagementCounters {
            views: 100,
            likes: 40,
            comments: 5,
            shares: 0,
        });
        // like ratio 0.4 and velocity 0.9 trip; comment ratio 0.05 does not
        match check_engagement_manipulation(&record, &probe) {
            CheckOutcome::Fired { score, .. } => assert!((score - 2.0 / 3.0).abs() < 1e-9),
            other => panic!("expected fired, got {other:?}"),
        }
    }

    #[test]
    fn zero_views_only_velocity_counts() {
        let probe = FixedProbe {
            velocity: 0.5,
            ..Default::default()
        };
        let mut record = base_record();
        record.engagement = Some(EngagementCounters {
            views: 0,
            likes: 1_000,
            comments: 500,
            shares: 0,
        });
        assert_eq!(
            check_engagement_manipulation(&record, &probe),
            CheckOutcome::Clear
        );
    }

    #[test]
    fn erratic_scores_need_five_samples() {
        let erratic = [0.1, 0.9, 0.1, 0.9];
        assert_eq!(check_behavior_anomaly(0, &erratic), CheckOutcome::Clear);

        let erratic = [0.05, 0.95, 0.05, 0.95, 0.05, 0.95];
        assert!(matches!(
            check_behavior_anomaly(0, &erratic),
            CheckOutcome::Fired { score, .. } if score == 0.6
        ));
    }

    #[test]
    fn inconsistency_needs_three_samples_and_a_real_drop() {
        assert_eq!(
            check_quality_inconsistency(&[0.9, 0.9], Some(0.2)),
            CheckOutcome::Clear
        );
        assert_eq!(
            check_quality_inconsistency(&[0.9, 0.9, 0.9], Some(0.7)),
            CheckOutcome::Clear
        );
        match check_quality_inconsistency(&[0.9, 0.9, 0.9], Some(0.2)) {
            CheckOutcome::Fired { score, .. } => assert!((score - 0.7).abs() < 1e-9),
            other => panic!("expected fired, got {other:?}"),
        }
    }

    #[test]
    fn inconsistency_averages_only_last_five() {
        // Old low scores outside the window must not drag the average down
        // Full-history average would be ~0.67 (drop 0.17, below threshold);
        // the five-entry window averages 0.9 (drop 0.4, fires)
        let scores = [0.1, 0.1, 0.9, 0.9, 0.9, 0.9, 0.9];
        assert!(matches!(
            check_quality_inconsistency(&scores, Some(0.5)),
            CheckOutcome::Fired { .. }
        ));
    }

    #[test]
    fn metadata_gap_and_edits_take_the_max() {
        let mut record = base_record();
        let now = Utc::now();
        record.metadata.created_at = Some(now - Duration::days(60));
        record.metadata.uploaded_at = Some(now);
        record.metadata.edit_count = Some(25);
        match check_metadata_manipulation(&record) {
            CheckOutcome::Fired { score, .. } => assert!((score - 0.6).abs() < 1e-9),
            other => panic!("expected fired, got {other:?}"),
        }
    }

    #[test]
    fn two_missing_fields_fire_one_does_not() {
        let mut record = base_record();
        record.metadata.description.clear();
        assert_eq!(check_metadata_manipulation(&record), CheckOutcome::Clear);

        record.metadata.title.clear();
        assert!(matches!(
            check_metadata_manipulation(&record),
            CheckOutcome::Fired { score, .. } if score == 0.5
        ));
    }
}
