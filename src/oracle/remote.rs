// OpenAI-compatible chat-completions oracle.
//
// Sends a fixed analysis prompt and expects the model to reply with a
// single JSON object of unit-range scores. Responses that aren't valid
// JSON (or only partially match the schema) degrade to neutral defaults
// field by field — a flaky model must never fail an assessment.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{SemanticOracle, SemanticSignals};
use crate::models::ContentType;

/// Chat-completions semantic oracle.
pub struct RemoteOracle {
    client: Client,
    url: String,
    api_key: String,
    model: String,
}

impl RemoteOracle {
    /// Create an oracle against the given endpoint. The timeout bounds
    /// the whole request — a stalled oracle call must not stall the
    /// pipeline.
    pub fn new(url: String, api_key: String, model: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build oracle HTTP client")?;
        Ok(Self {
            client,
            url,
            api_key,
            model,
        })
    }

    fn build_prompt(title: &str, description: &str, content_type: ContentType) -> String {
        format!(
            "Analyze the following {content_type} content and provide insights in JSON format:\n\
             \n\
             Title: {title}\n\
             Description: {description}\n\
             \n\
             Return a JSON object with these fields (values between 0.0 and 1.0):\n\
             - category: main content category (e.g. \"education\", \"entertainment\", \"lifestyle\", \"technology\")\n\
             - educational_value: how educational/informative the content is\n\
             - entertainment_value: how entertaining/engaging the content is\n\
             - originality: how original/unique the content appears to be\n\
             - production_quality: estimated production quality from title/description\n\
             - engagement_potential: likelihood to generate engagement\n\
             - safety_score: content safety (higher = safer)\n\
             - topic_relevance: how well title/description match the implied content\n\
             - content_depth: depth and substance of the content\n\
             \n\
             Respond only with valid JSON."
        )
    }
}

#[async_trait]
impl SemanticOracle for RemoteOracle {
    async fn analyze(
        &self,
        title: &str,
        description: &str,
        content_type: ContentType,
    ) -> Result<SemanticSignals> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system",
                    content: "You are an expert content analyst. Analyze the provided content \
                              and return structured insights in JSON format."
                        .to_string(),
                },
                Message {
                    role: "user",
                    content: Self::build_prompt(title, description, content_type),
                },
            ],
            temperature: 0.1,
            max_tokens: 1000,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to call semantic oracle")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Semantic oracle returned {}: {}", status, body);
        }

        let completion: ChatResponse = response
            .json()
            .await
            .context("Failed to parse oracle response envelope")?;

        let content = completion
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or_default();

        // A model that ignores the JSON instruction degrades to neutral
        // defaults rather than failing the extraction.
        let signals = match serde_json::from_str::<SemanticSignals>(content) {
            Ok(signals) => signals.clamped(),
            Err(e) => {
                let preview: String = content.chars().take(120).collect();
                debug!(error = %e, %preview,
                    "Oracle reply was not valid JSON, using neutral defaults");
                SemanticSignals::neutral()
            }
        };

        debug!(
            category = %signals.category,
            engagement = signals.engagement_potential,
            safety = signals.safety_score,
            "Semantic analysis complete"
        );

        Ok(signals)
    }
}

// --- Chat-completions request/response types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}
