// Fraud detection — independent check batteries over content records and
// creator behavior, aggregated into a confidence score and risk level.
//
// Each check yields a typed outcome rather than throwing: it either fired
// with a sub-score, stayed clear, or degraded because an input could not
// be measured. Degraded checks contribute nothing but are logged, so a
// broken probe never aborts an assessment.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::models::{
    ContentRecord, CreatorBehavior, FraudAssessment, FraudIndicator, RiskLevel, Severity,
};
use crate::probe::MediaProbe;

mod content;
mod creator;

/// Result of one fraud check.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// The check tripped its threshold and contributes its weight.
    Fired { score: f64, description: String },
    /// The check ran and found nothing.
    Clear,
    /// The check could not be evaluated; contributes nothing.
    Degraded { reason: String },
}

impl CheckOutcome {
    fn fired(score: f64, description: impl Into<String>) -> Self {
        CheckOutcome::Fired {
            score,
            description: description.into(),
        }
    }

    fn degraded(reason: impl Into<String>) -> Self {
        CheckOutcome::Degraded {
            reason: reason.into(),
        }
    }
}

/// One check's identity and its fixed contribution to the confidence score.
#[derive(Debug, Clone, Copy)]
pub struct CheckSpec {
    pub kind: &'static str,
    pub weight: f64,
}

pub const DUPLICATE_CONTENT: CheckSpec = CheckSpec {
    kind: "duplicate_content",
    weight: 0.4,
};
pub const UNDISCLOSED_AI_CONTENT: CheckSpec = CheckSpec {
    kind: "undisclosed_ai_content",
    weight: 0.25,
};
pub const ENGAGEMENT_MANIPULATION: CheckSpec = CheckSpec {
    kind: "engagement_manipulation",
    weight: 0.5,
};
pub const CREATOR_BEHAVIOR_ANOMALY: CheckSpec = CheckSpec {
    kind: "creator_behavior_anomaly",
    weight: 0.3,
};
pub const QUALITY_INCONSISTENCY: CheckSpec = CheckSpec {
    kind: "quality_inconsistency",
    weight: 0.2,
};
pub const METADATA_MANIPULATION: CheckSpec = CheckSpec {
    kind: "metadata_manipulation",
    weight: 0.1,
};

pub const UPLOAD_RATE_ABUSE: CheckSpec = CheckSpec {
    kind: "upload_rate_abuse",
    weight: 0.3,
};
pub const BOT_BEHAVIOR: CheckSpec = CheckSpec {
    kind: "bot_behavior",
    weight: 0.4,
};
pub const FAKE_ENGAGEMENT: CheckSpec = CheckSpec {
    kind: "fake_engagement",
    weight: 0.3,
};
pub const FAKE_ACCOUNT: CheckSpec = CheckSpec {
    kind: "fake_account",
    weight: 0.4,
};

/// Fold a battery of check outcomes into an assessment. Fired checks
/// contribute their fixed weight to the confidence score; degraded checks
/// are logged and contribute zero. When every check in a non-empty
/// battery degrades there is no signal to score at all, and the
/// assessment falls back to manual review.
pub fn aggregate(outcomes: Vec<(CheckSpec, CheckOutcome)>, now: DateTime<Utc>) -> FraudAssessment {
    let mut indicators = Vec::new();
    let mut confidence = 0.0;
    let total = outcomes.len();
    let mut degraded = 0;

    for (spec, outcome) in outcomes {
        match outcome {
            CheckOutcome::Fired { score, description } => {
                indicators.push(FraudIndicator {
                    kind: spec.kind.to_string(),
                    score,
                    description,
                    severity: Severity::from_score(score),
                });
                confidence += spec.weight;
            }
            CheckOutcome::Clear => {}
            CheckOutcome::Degraded { reason } => {
                warn!(check = spec.kind, %reason, "fraud check degraded");
                degraded += 1;
            }
        }
    }

    if total > 0 && degraded == total {
        warn!("every fraud check degraded, routing to manual review");
        return FraudAssessment::fallback(now);
    }

    let risk_level = RiskLevel::from_confidence(confidence);
    FraudAssessment {
        fraud_indicators: indicators,
        confidence_score: confidence,
        risk_level,
        recommended_action: risk_level.recommended_action(),
        analysis_timestamp: now,
    }
}

const HASH_STORE_CAP: usize = 65_536;
const PROFILE_SCORE_CAP: usize = 20;
const UPLOAD_RATE_LIMIT: usize = 10;

/// Seen-content hashes with insertion-order eviction once full.
struct HashStore {
    seen: HashSet<[u8; 32]>,
    order: VecDeque<[u8; 32]>,
}

impl HashStore {
    fn new() -> Self {
        Self {
            seen: HashSet::new(),
            order: VecDeque::new(),
        }
    }

    fn contains(&self, hash: &[u8; 32]) -> bool {
        self.seen.contains(hash)
    }

    fn insert(&mut self, hash: [u8; 32]) {
        if !self.seen.insert(hash) {
            return;
        }
        self.order.push_back(hash);
        while self.order.len() > HASH_STORE_CAP {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }
    }

    fn len(&self) -> usize {
        self.seen.len()
    }
}

/// Per-creator rolling behavioral state, mutated on every assessment.
#[derive(Default)]
struct CreatorProfile {
    /// Upload timestamps, pruned to the trailing 7 days.
    uploads: Vec<DateTime<Utc>>,
    /// Most recent quality scores, capped at 20.
    recent_scores: Vec<f64>,
}

impl CreatorProfile {
    fn prune_uploads(&mut self, now: DateTime<Utc>) {
        let cutoff = now - Duration::days(7);
        self.uploads.retain(|t| *t > cutoff);
    }

    fn uploads_last_hour(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - Duration::hours(1);
        self.uploads.iter().filter(|t| **t > cutoff).count()
    }

    fn push_score(&mut self, score: f64) {
        self.recent_scores.push(score);
        if self.recent_scores.len() > PROFILE_SCORE_CAP {
            let excess = self.recent_scores.len() - PROFILE_SCORE_CAP;
            self.recent_scores.drain(..excess);
        }
    }
}

pub struct FraudDetector {
    probe: Arc<dyn MediaProbe>,
    content_hashes: Mutex<HashStore>,
    profiles: Mutex<HashMap<String, CreatorProfile>>,
}

impl FraudDetector {
    pub fn new(probe: Arc<dyn MediaProbe>) -> Self {
        Self {
            probe,
            content_hashes: Mutex::new(HashStore::new()),
            profiles: Mutex::new(HashMap::new()),
        }
    }

    /// Run the content check battery. `current_score` is the quality score
    /// just computed for this record, when the caller has one; the
    /// consistency check compares it against the creator's history.
    pub fn assess_content(
        &self,
        record: &ContentRecord,
        current_score: Option<f64>,
    ) -> FraudAssessment {
        let now = Utc::now();
        self.assess_content_at(record, current_score, now)
    }

    fn assess_content_at(
        &self,
        record: &ContentRecord,
        current_score: Option<f64>,
        now: DateTime<Utc>,
    ) -> FraudAssessment {
        let duplicate = self.check_duplicate(record);
        let undisclosed_ai = content::check_undisclosed_ai(record, self.probe.as_ref());
        let manipulation = content::check_engagement_manipulation(record, self.probe.as_ref());

        // History-sensitive checks read the profile before this record's
        // score lands in it; the upload itself counts toward the rate.
        let (anomaly, inconsistency) =
            self.check_creator_history(record, current_score, now);

        let metadata = content::check_metadata_manipulation(record);

        aggregate(
            vec![
                (DUPLICATE_CONTENT, duplicate),
                (UNDISCLOSED_AI_CONTENT, undisclosed_ai),
                (ENGAGEMENT_MANIPULATION, manipulation),
                (CREATOR_BEHAVIOR_ANOMALY, anomaly),
                (QUALITY_INCONSISTENCY, inconsistency),
                (METADATA_MANIPULATION, metadata),
            ],
            now,
        )
    }

    /// Run the creator check battery against platform-supplied behavior.
    pub fn assess_creator(&self, creator_id: &str, behavior: &CreatorBehavior) -> FraudAssessment {
        let now = Utc::now();
        self.assess_creator_at(creator_id, behavior, now)
    }

    fn assess_creator_at(
        &self,
        creator_id: &str,
        behavior: &CreatorBehavior,
        now: DateTime<Utc>,
    ) -> FraudAssessment {
        let rate = self.check_upload_rate(creator_id, now);
        let bot = creator::check_bot_behavior(behavior);
        let engagement = creator::check_fake_engagement(behavior);
        let account = creator::check_fake_account(behavior);

        aggregate(
            vec![
                (UPLOAD_RATE_ABUSE, rate),
                (BOT_BEHAVIOR, bot),
                (FAKE_ENGAGEMENT, engagement),
                (FAKE_ACCOUNT, account),
            ],
            now,
        )
    }

    fn check_duplicate(&self, record: &ContentRecord) -> CheckOutcome {
        let hash = content_hash(record);
        let mut store = self.content_hashes.lock().expect("hash store lock poisoned");
        if store.contains(&hash) {
            return CheckOutcome::fired(1.0, "Content appears to be duplicated or plagiarized");
        }
        store.insert(hash);
        drop(store);

        let similarity = self.probe.duplicate_similarity(record);
        if !similarity.is_finite() {
            return CheckOutcome::degraded("similarity probe returned a non-finite value");
        }
        if similarity > content::SIMILARITY_THRESHOLD {
            CheckOutcome::fired(similarity, "Content appears to be duplicated or plagiarized")
        } else {
            CheckOutcome::Clear
        }
    }

    /// Upload-rate and score-history checks share the profile lock so the
    /// read-then-append sequence is atomic per creator.
    fn check_creator_history(
        &self,
        record: &ContentRecord,
        current_score: Option<f64>,
        now: DateTime<Utc>,
    ) -> (CheckOutcome, CheckOutcome) {
        let Some(creator_id) = record.metadata.creator_id.as_deref() else {
            return (CheckOutcome::Clear, CheckOutcome::Clear);
        };

        let mut profiles = self.profiles.lock().expect("profile lock poisoned");
        let profile = profiles.entry(creator_id.to_string()).or_default();

        profile.prune_uploads(now);
        profile.uploads.push(now);

        let anomaly =
            content::check_behavior_anomaly(profile.uploads_last_hour(now), &profile.recent_scores);
        let inconsistency =
            content::check_quality_inconsistency(&profile.recent_scores, current_score);

        if let Some(score) = current_score {
            profile.push_score(score);
        }

        (anomaly, inconsistency)
    }

    fn check_upload_rate(&self, creator_id: &str, now: DateTime<Utc>) -> CheckOutcome {
        let mut profiles = self.profiles.lock().expect("profile lock poisoned");
        let profile = profiles.entry(creator_id.to_string()).or_default();
        profile.prune_uploads(now);
        profile.uploads.push(now);

        if profile.uploads_last_hour(now) > UPLOAD_RATE_LIMIT {
            CheckOutcome::fired(0.8, "Unusually high upload rate detected")
        } else {
            CheckOutcome::Clear
        }
    }

    pub fn tracked_hashes(&self) -> usize {
        self.content_hashes
            .lock()
            .expect("hash store lock poisoned")
            .len()
    }

    pub fn tracked_creators(&self) -> usize {
        self.profiles.lock().expect("profile lock poisoned").len()
    }
}

fn content_hash(record: &ContentRecord) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(record.metadata.title.as_bytes());
    hasher.update(record.metadata.description.as_bytes());
    hasher.finalize().into()
}
