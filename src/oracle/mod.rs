// Semantic oracle trait — the swap-ready abstraction.
//
// The oracle supplies subjective content-quality estimates the rule-based
// extractor can't compute (originality, depth, category). The default
// implementation calls an OpenAI-compatible chat-completions endpoint;
// deployments without an API key run with `NoopOracle` and the scorer
// falls back to neutral defaults.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use crate::models::ContentType;

pub mod remote;

pub use remote::RemoteOracle;

/// Subjective quality estimates for one piece of content, all unit-range.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SemanticSignals {
    pub category: String,
    pub educational_value: f64,
    pub entertainment_value: f64,
    pub originality: f64,
    pub production_quality: f64,
    pub engagement_potential: f64,
    pub safety_score: f64,
    pub topic_relevance: f64,
    pub content_depth: f64,
}

impl Default for SemanticSignals {
    fn default() -> Self {
        Self::neutral()
    }
}

impl SemanticSignals {
    /// The documented fallback when the oracle is unavailable or returns
    /// something unparseable: 0.5 for valued fields, except safety which
    /// assumes mostly-safe content.
    pub fn neutral() -> Self {
        Self {
            category: "general".to_string(),
            educational_value: 0.5,
            entertainment_value: 0.5,
            originality: 0.5,
            production_quality: 0.5,
            engagement_potential: 0.5,
            safety_score: 0.8,
            topic_relevance: 0.5,
            content_depth: 0.5,
        }
    }

    /// Clamp every numeric field to [0, 1]. Oracle responses are not
    /// trusted to respect the prompt's stated ranges.
    pub fn clamped(mut self) -> Self {
        for v in [
            &mut self.educational_value,
            &mut self.entertainment_value,
            &mut self.originality,
            &mut self.production_quality,
            &mut self.engagement_potential,
            &mut self.safety_score,
            &mut self.topic_relevance,
            &mut self.content_depth,
        ] {
            *v = v.clamp(0.0, 1.0);
        }
        self
    }
}

/// Trait for semantic content analysis. Implementations are async because
/// the real provider is an HTTP text-completion service.
#[async_trait]
pub trait SemanticOracle: Send + Sync {
    /// Analyze a piece of content from its title and description.
    ///
    /// Errors mean the semantic block is skipped — callers substitute
    /// `SemanticSignals::neutral()` and proceed; an oracle failure must
    /// never fail the pipeline.
    async fn analyze(
        &self,
        title: &str,
        description: &str,
        content_type: ContentType,
    ) -> Result<SemanticSignals>;
}

/// Oracle used when semantic analysis is disabled (no API key configured,
/// or tests that don't care about the semantic block).
pub struct NoopOracle;

#[async_trait]
impl SemanticOracle for NoopOracle {
    async fn analyze(
        &self,
        _title: &str,
        _description: &str,
        _content_type: ContentType,
    ) -> Result<SemanticSignals> {
        anyhow::bail!("semantic oracle not configured")
    }
}
