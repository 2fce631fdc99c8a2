// Feature extraction — turns a content record into a flat feature set.
//
// Features come from three sources: lexical analysis of the metadata
// (always), content-type-specific signals from the media probe, and an
// optional semantic block from the oracle. Extraction never fails — a
// broken oracle degrades to neutral defaults with a marker feature.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use sha2::{Digest, Sha256};
use tracing::warn;

use crate::models::{ContentRecord, ContentType};
use crate::oracle::{SemanticOracle, SemanticSignals};
use crate::probe::MediaProbe;

pub mod lexical;

/// How many feature sets the extractor memoizes. The memo has no TTL, so
/// it needs a hard entry bound; oldest insertions are evicted first.
const MEMO_CAP: usize = 1024;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Flag(bool),
    Label(String),
}

/// Flat mapping of named signals for one content record.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FeatureSet {
    pub content_id: String,
    pub content_type: ContentType,
    pub creator_id: Option<String>,
    values: BTreeMap<String, FeatureValue>,
}

impl FeatureSet {
    pub fn new(record: &ContentRecord) -> Self {
        Self {
            content_id: record.content_id.clone(),
            content_type: record.content_type,
            creator_id: record.metadata.creator_id.clone(),
            values: BTreeMap::new(),
        }
    }

    pub fn put_num(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_string(), FeatureValue::Number(value));
    }

    /// Insert a numeric feature clamped to its natural [0, 1] range.
    pub fn put_unit(&mut self, key: &str, value: f64) {
        self.put_num(key, value.clamp(0.0, 1.0));
    }

    pub fn put_flag(&mut self, key: &str, value: bool) {
        self.values.insert(key.to_string(), FeatureValue::Flag(value));
    }

    pub fn put_label(&mut self, key: &str, value: &str) {
        self.values
            .insert(key.to_string(), FeatureValue::Label(value.to_string()));
    }

    pub fn num(&self, key: &str) -> Option<f64> {
        match self.values.get(key) {
            Some(FeatureValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn num_or(&self, key: &str, default: f64) -> f64 {
        self.num(key).unwrap_or(default)
    }

    pub fn flag(&self, key: &str) -> bool {
        matches!(self.values.get(key), Some(FeatureValue::Flag(true)))
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(FeatureValue::Label(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Insertion-order-bounded memo for extracted feature sets.
struct BoundedMemo {
    entries: HashMap<String, FeatureSet>,
    order: VecDeque<String>,
    cap: usize,
}

impl BoundedMemo {
    fn new(cap: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            cap,
        }
    }

    fn get(&self, key: &str) -> Option<FeatureSet> {
        self.entries.get(key).cloned()
    }

    fn insert(&mut self, key: String, value: FeatureSet) {
        if !self.entries.contains_key(&key) {
            self.order.push_back(key.clone());
            while self.order.len() > self.cap {
                if let Some(evicted) = self.order.pop_front() {
                    self.entries.remove(&evicted);
                }
            }
        }
        self.entries.insert(key, value);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

pub struct FeatureExtractor {
    probe: Arc<dyn MediaProbe>,
    oracle: Arc<dyn SemanticOracle>,
    memo: Mutex<BoundedMemo>,
}

impl FeatureExtractor {
    pub fn new(probe: Arc<dyn MediaProbe>, oracle: Arc<dyn SemanticOracle>) -> Self {
        Self {
            probe,
            oracle,
            memo: Mutex::new(BoundedMemo::new(MEMO_CAP)),
        }
    }

    /// Extract all features for a record. Deterministic for a given
    /// record, probe, and oracle response; memoized by content hash.
    pub async fn extract(&self, record: &ContentRecord) -> FeatureSet {
        let memo_key = memo_key(record);
        if let Some(cached) = self
            .memo
            .lock()
            .expect("feature memo lock poisoned")
            .get(&memo_key)
        {
            return cached;
        }

        let mut features = FeatureSet::new(record);
        lexical::extract_metadata_features(&record.metadata, &mut features);

        match record.content_type {
            ContentType::Video => self.extract_video_features(record, &mut features),
            ContentType::Image => self.extract_image_features(record, &mut features),
            ContentType::Text => self.extract_text_features(record, &mut features),
        }

        self.extract_semantic_features(record, &mut features).await;

        self.memo
            .lock()
            .expect("feature memo lock poisoned")
            .insert(memo_key, features.clone());

        features
    }

    pub fn memo_len(&self) -> usize {
        self.memo.lock().expect("feature memo lock poisoned").len()
    }

    fn extract_video_features(&self, record: &ContentRecord, features: &mut FeatureSet) {
        let duration = record.metadata.duration;
        let signals = self.probe.video_signals(record);

        features.put_num("video_duration", duration);
        features.put_label("duration_category", duration_category(duration));
        features.put_num("scene_changes", (duration / 5.0).floor().max(1.0));
        features.put_num("estimated_fps", signals.estimated_fps as f64);
        features.put_label("estimated_resolution", &signals.estimated_resolution);
        features.put_flag("has_audio", signals.has_audio);
        features.put_unit("brightness_score", signals.brightness);
        features.put_unit("contrast_score", signals.contrast);
        features.put_unit("sharpness_score", signals.sharpness);
        features.put_unit("color_variety", signals.color_variety);
        features.put_unit("motion_score", signals.motion);
        features.put_unit("face_detection_confidence", signals.face_confidence);
        features.put_flag("text_overlay_detected", signals.text_overlay);
    }

    fn extract_image_features(&self, record: &ContentRecord, features: &mut FeatureSet) {
        let signals = self.probe.image_signals(record);

        features.put_num("aspect_ratio", signals.aspect_ratio);
        features.put_unit("brightness_score", signals.brightness);
        features.put_unit("contrast_score", signals.contrast);
        features.put_unit("saturation", signals.saturation);
        features.put_unit("sharpness_score", signals.sharpness);
        features.put_unit("color_diversity", signals.color_diversity);
        features.put_unit("composition_score", signals.composition);
        features.put_num("face_count", signals.face_count as f64);
        features.put_flag("has_faces", signals.face_count > 0);
        features.put_flag("has_text", signals.has_text);
    }

    fn extract_text_features(&self, record: &ContentRecord, features: &mut FeatureSet) {
        let full_text = format!(
            "{} {}",
            record.metadata.title, record.metadata.description
        );
        let full_text = full_text.trim();
        if full_text.is_empty() {
            return;
        }

        lexical::extract_text_richness(full_text, features);

        let signals = self.probe.text_signals(record);
        features.put_unit("readability_score", signals.readability);
        features.put_num("sentiment_score", signals.sentiment.clamp(-1.0, 1.0));
        features.put_unit("toxicity_score", signals.toxicity);
    }

    async fn extract_semantic_features(&self, record: &ContentRecord, features: &mut FeatureSet) {
        let signals = match self
            .oracle
            .analyze(
                &record.metadata.title,
                &record.metadata.description,
                record.content_type,
            )
            .await
        {
            Ok(signals) => signals,
            Err(e) => {
                warn!(content_id = %record.content_id, error = %e,
                    "Semantic analysis unavailable, using neutral defaults");
                features.put_flag("semantic_degraded", true);
                SemanticSignals::neutral()
            }
        };

        features.put_label("ai_category", &signals.category);
        features.put_unit("ai_educational_value", signals.educational_value);
        features.put_unit("ai_entertainment_value", signals.entertainment_value);
        features.put_unit("ai_originality", signals.originality);
        features.put_unit("ai_production_quality", signals.production_quality);
        features.put_unit("ai_engagement_potential", signals.engagement_potential);
        features.put_unit("ai_safety_score", signals.safety_score);
        features.put_unit("ai_topic_relevance", signals.topic_relevance);
        features.put_unit("ai_content_depth", signals.content_depth);
    }
}

/// Duration bucket for videos.
fn duration_category(duration: f64) -> &'static str {
    if duration < 5.0 {
        "very_short"
    } else if duration < 15.0 {
        "short"
    } else if duration < 60.0 {
        "medium"
    } else {
        "long"
    }
}

/// Content hash key for the extraction memo: title + description + the
/// whole serialized record, so any metadata change invalidates the entry.
fn memo_key(record: &ContentRecord) -> String {
    let mut hasher = Sha256::new();
    hasher.update(record.metadata.title.as_bytes());
    hasher.update(record.metadata.description.as_bytes());
    if let Ok(serialized) = serde_json::to_string(record) {
        hasher.update(serialized.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentMetadata;
    use crate::oracle::NoopOracle;
    use crate::probe::FixedProbe;

    fn video_record(id: &str, duration: f64) -> ContentRecord {
        ContentRecord {
            content_id: id.to_string(),
            content_type: ContentType::Video,
            content_url: "https://example.com/v".to_string(),
            metadata: ContentMetadata {
                title: "How to bake bread at home".to_string(),
                description: "A #baking tutorial, see https://example.com".to_string(),
                tags: vec!["baking".to_string(), "viral".to_string()],
                duration,
                creator_id: Some("creator-1".to_string()),
                ..ContentMetadata::default()
            },
            engagement: None,
        }
    }

    fn extractor() -> FeatureExtractor {
        FeatureExtractor::new(Arc::new(FixedProbe::default()), Arc::new(NoopOracle))
    }

    #[test]
    fn duration_buckets() {
        assert_eq!(duration_category(3.0), "very_short");
        assert_eq!(duration_category(5.0), "short");
        assert_eq!(duration_category(14.9), "short");
        assert_eq!(duration_category(15.0), "medium");
        assert_eq!(duration_category(60.0), "long");
    }

    #[tokio::test]
    async fn video_extraction_emits_expected_features() {
        let record = video_record("c-1", 30.0);
        let features = extractor().extract(&record).await;

        assert_eq!(features.num("video_duration"), Some(30.0));
        assert_eq!(features.label("duration_category"), Some("medium"));
        assert_eq!(features.num("scene_changes"), Some(6.0));
        assert_eq!(features.num("title_length"), Some(25.0));
        assert!(features.flag("has_trending_tags"));
        assert!(features.flag("description_has_links"));
        // Oracle is Noop, so the semantic block is present with defaults
        // and the degradation marker is set
        assert!(features.flag("semantic_degraded"));
        assert_eq!(features.num("ai_safety_score"), Some(0.8));
    }

    #[tokio::test]
    async fn extraction_is_memoized() {
        let extractor = extractor();
        let record = video_record("c-1", 30.0);
        let first = extractor.extract(&record).await;
        let second = extractor.extract(&record).await;
        assert_eq!(first, second);
        assert_eq!(extractor.memo_len(), 1);
    }

    #[tokio::test]
    async fn memo_distinguishes_changed_metadata() {
        let extractor = extractor();
        let a = video_record("c-1", 30.0);
        let mut b = video_record("c-1", 30.0);
        b.metadata.title = "Different title".to_string();
        extractor.extract(&a).await;
        extractor.extract(&b).await;
        assert_eq!(extractor.memo_len(), 2);
    }

    #[test]
    fn bounded_memo_evicts_oldest() {
        let mut memo = BoundedMemo::new(2);
        let record = video_record("x", 1.0);
        let fs = FeatureSet::new(&record);
        memo.insert("a".to_string(), fs.clone());
        memo.insert("b".to_string(), fs.clone());
        memo.insert("c".to_string(), fs);
        assert_eq!(memo.len(), 2);
        assert!(memo.get("a").is_none());
        assert!(memo.get("c").is_some());
    }
}
