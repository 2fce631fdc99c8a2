// Media probe — the swap-ready abstraction over media analysis.
//
// Real perceptual analysis (video/image quality, perceptual hashing,
// AI-content detection, engagement velocity) needs models this service
// doesn't ship. The trait keeps those signals injectable: production
// deployments plug in real analyzers, tests supply fixed values, and the
// default `HeuristicProbe` derives stable pseudo-signals from a content
// hash so the pipeline stays deterministic end to end.

use sha2::{Digest, Sha256};

use crate::models::ContentRecord;

/// Visual/audio signals for a video, all unit-range unless noted.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSignals {
    pub brightness: f64,
    pub contrast: f64,
    pub sharpness: f64,
    pub color_variety: f64,
    pub motion: f64,
    /// 0.0 when no face was detected.
    pub face_confidence: f64,
    pub text_overlay: bool,
    pub estimated_fps: u32,
    pub estimated_resolution: String,
    pub has_audio: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageSignals {
    pub aspect_ratio: f64,
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub sharpness: f64,
    pub color_diversity: f64,
    pub composition: f64,
    pub face_count: u32,
    pub has_text: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextSignals {
    pub readability: f64,
    /// -1.0 (very negative) to 1.0 (very positive).
    pub sentiment: f64,
    pub toxicity: f64,
}

/// Analysis signals the pipeline cannot derive from metadata alone.
pub trait MediaProbe: Send + Sync {
    fn video_signals(&self, record: &ContentRecord) -> VideoSignals;
    fn image_signals(&self, record: &ContentRecord) -> ImageSignals;
    fn text_signals(&self, record: &ContentRecord) -> TextSignals;

    /// Near-duplicate similarity against previously seen content,
    /// excluding exact hash matches (the detector handles those itself).
    fn duplicate_similarity(&self, record: &ContentRecord) -> f64;

    /// Probability that the content is AI-generated.
    fn ai_probability(&self, record: &ContentRecord) -> f64;

    /// How fast engagement is accruing relative to organic baselines.
    fn engagement_velocity(&self, record: &ContentRecord) -> f64;
}

/// Default probe: stable pseudo-signals derived from the content id.
///
/// The same record always produces the same signals, so cached and
/// re-computed assessments agree. The value ranges mirror what real
/// analyzers would plausibly emit for ordinary content.
pub struct HeuristicProbe;

impl HeuristicProbe {
    /// A unit-range value derived from SHA-256 of the content id and a
    /// per-signal salt.
    fn unit(&self, record: &ContentRecord, salt: &str) -> f64 {
        let mut hasher = Sha256::new();
        hasher.update(record.content_id.as_bytes());
        hasher.update(salt.as_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(bytes) as f64 / u64::MAX as f64
    }

    fn ranged(&self, record: &ContentRecord, salt: &str, lo: f64, hi: f64) -> f64 {
        lo + self.unit(record, salt) * (hi - lo)
    }
}

impl MediaProbe for HeuristicProbe {
    fn video_signals(&self, record: &ContentRecord) -> VideoSignals {
        let face_present = self.unit(record, "face") > 0.3;
        VideoSignals {
            brightness: self.ranged(record, "brightness", 0.3, 0.9),
            contrast: self.ranged(record, "contrast", 0.4, 0.8),
            sharpness: self.ranged(record, "sharpness", 0.5, 0.9),
            color_variety: self.ranged(record, "color_variety", 0.4, 0.9),
            motion: self.ranged(record, "motion", 0.2, 0.8),
            face_confidence: if face_present {
                self.ranged(record, "face_confidence", 0.6, 0.95)
            } else {
                0.0
            },
            text_overlay: self.unit(record, "text_overlay") > 0.6,
            estimated_fps: 30,
            estimated_resolution: "1080p".to_string(),
            has_audio: true,
        }
    }

    fn image_signals(&self, record: &ContentRecord) -> ImageSignals {
        let has_faces = self.unit(record, "has_faces") > 0.4;
        ImageSignals {
            aspect_ratio: self.ranged(record, "aspect_ratio", 0.8, 1.8),
            brightness: self.ranged(record, "img_brightness", 0.2, 0.9),
            contrast: self.ranged(record, "img_contrast", 0.3, 0.8),
            saturation: self.ranged(record, "saturation", 0.4, 0.9),
            sharpness: self.ranged(record, "img_sharpness", 0.5, 0.95),
            color_diversity: self.ranged(record, "color_diversity", 0.3, 0.9),
            composition: self.ranged(record, "composition", 0.4, 0.9),
            face_count: if has_faces {
                1 + (self.unit(record, "face_count") * 4.0) as u32
            } else {
                0
            },
            has_text: self.unit(record, "img_text") > 0.5,
        }
    }

    fn text_signals(&self, record: &ContentRecord) -> TextSignals {
        TextSignals {
            readability: self.ranged(record, "readability", 0.3, 0.9),
            sentiment: self.ranged(record, "sentiment", -0.5, 0.8),
            toxicity: self.ranged(record, "toxicity", 0.0, 0.3),
        }
    }

    fn duplicate_similarity(&self, record: &ContentRecord) -> f64 {
        self.ranged(record, "similarity", 0.0, 0.3)
    }

    fn ai_probability(&self, record: &ContentRecord) -> f64 {
        self.ranged(record, "ai_probability", 0.1, 0.4)
    }

    fn engagement_velocity(&self, record: &ContentRecord) -> f64 {
        self.ranged(record, "velocity", 0.1, 0.7)
    }
}

/// Test probe returning caller-chosen values for the fraud-relevant
/// signals and neutral media metrics.
pub struct FixedProbe {
    pub similarity: f64,
    pub ai_probability: f64,
    pub velocity: f64,
    pub toxicity: f64,
}

impl Default for FixedProbe {
    fn default() -> Self {
        Self {
            similarity: 0.0,
            ai_probability: 0.0,
            velocity: 0.0,
            toxicity: 0.0,
        }
    }
}

impl MediaProbe for FixedProbe {
    fn video_signals(&self, _record: &ContentRecord) -> VideoSignals {
        VideoSignals {
            brightness: 0.6,
            contrast: 0.6,
            sharpness: 0.7,
            color_variety: 0.6,
            motion: 0.5,
            face_confidence: 0.0,
            text_overlay: false,
            estimated_fps: 30,
            estimated_resolution: "1080p".to_string(),
            has_audio: true,
        }
    }

    fn image_signals(&self, _record: &ContentRecord) -> ImageSignals {
        ImageSignals {
            aspect_ratio: 1.0,
            brightness: 0.6,
            contrast: 0.6,
            saturation: 0.6,
            sharpness: 0.7,
            color_diversity: 0.6,
            composition: 0.6,
            face_count: 0,
            has_text: false,
        }
    }

    fn text_signals(&self, _record: &ContentRecord) -> TextSignals {
        TextSignals {
            readability: 0.6,
            sentiment: 0.2,
            toxicity: self.toxicity,
        }
    }

    fn duplicate_similarity(&self, _record: &ContentRecord) -> f64 {
        self.similarity
    }

    fn ai_probability(&self, _record: &ContentRecord) -> f64 {
        self.ai_probability
    }

    fn engagement_velocity(&self, _record: &ContentRecord) -> f64 {
        self.velocity
    }
}
