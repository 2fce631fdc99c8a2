// Creator-level fraud checks over platform-supplied behavior records.
// Upload-rate abuse lives in mod.rs because it mutates the shared profile.

use crate::models::CreatorBehavior;

use super::CheckOutcome;

/// Bot-like cadence: suspiciously regular upload intervals, or a stream
/// of near-identical content.
pub(super) fn check_bot_behavior(behavior: &CreatorBehavior) -> CheckOutcome {
    if behavior.upload_times.len() > 5 {
        let intervals: Vec<f64> = behavior
            .upload_times
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).num_seconds() as f64)
            .collect();
        if interval_variance(&intervals) < 100.0 {
            return CheckOutcome::fired(0.7, "User behavior patterns suggest automated activity");
        }
    }

    if !behavior.content_similarities.is_empty() {
        let mean = behavior.content_similarities.iter().sum::<f64>()
            / behavior.content_similarities.len() as f64;
        if mean > 0.9 {
            return CheckOutcome::fired(0.8, "User behavior patterns suggest automated activity");
        }
    }

    CheckOutcome::Clear
}

/// Engagement ratios far beyond organic norms.
pub(super) fn check_fake_engagement(behavior: &CreatorBehavior) -> CheckOutcome {
    let Some(engagement) = &behavior.engagement else {
        return CheckOutcome::Clear;
    };
    if engagement.views == 0 {
        return CheckOutcome::Clear;
    }
    let views = engagement.views as f64;
    let like_ratio = engagement.likes as f64 / views;
    let comment_ratio = engagement.comments as f64 / views;

    if like_ratio > 0.5 || comment_ratio > 0.1 {
        CheckOutcome::fired(0.7, "Suspicious engagement patterns detected")
    } else {
        CheckOutcome::Clear
    }
}

/// Authenticity is the mean of profile completeness and account age
/// (full age credit after 30 days). Low authenticity fires with the
/// complement as the score.
pub(super) fn check_fake_account(behavior: &CreatorBehavior) -> CheckOutcome {
    let mut completeness: f64 = 0.0;
    if let Some(profile) = &behavior.profile {
        if profile.has_avatar {
            completeness += 0.2;
        }
        if profile.has_bio {
            completeness += 0.2;
        }
        if profile.verified_email {
            completeness += 0.3;
        }
        if profile.has_social_links {
            completeness += 0.3;
        }
    }

    let age_days = behavior.account_age_days.unwrap_or(0.0).max(0.0);
    let age_score = (age_days / 30.0).min(1.0);

    let authenticity = (completeness + age_score) / 2.0;
    if authenticity < 0.4 {
        CheckOutcome::fired(
            1.0 - authenticity,
            "Account appears to be fake or compromised",
        )
    } else {
        CheckOutcome::Clear
    }
}

fn interval_variance(intervals: &[f64]) -> f64 {
    if intervals.is_empty() {
        return 0.0;
    }
    let mean = intervals.iter().sum::<f64>() / intervals.len() as f64;
    intervals.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / intervals.len() as f64
}
