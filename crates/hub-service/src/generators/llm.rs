use std::time::Duration;

use async_trait::async_trait;
use hub_common::{AiConfig, AppError};
use hub_core::{DomainError, RoadmapGenerator, RoadmapSpec, RoadmapStep};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument, warn};

const SYSTEM_PROMPT: &str = "You are a study planner. Reply with JSON only, shaped as \
{\"steps\":[{\"order\":1,\"title\":\"...\",\"description\":\"...\",\"resources\":[\"...\"]}]} \
with exactly one step per week.";

/// Generator backed by an OpenAI-compatible chat-completions endpoint
pub struct LlmRoadmapGenerator {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl LlmRoadmapGenerator {
    pub fn new(config: &AiConfig) -> Result<Self, AppError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AppError::Config("AI_API_KEY is not set".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key,
            model: config.model.clone(),
        })
    }

    fn user_prompt(spec: &RoadmapSpec) -> String {
        format!(
            "Create a {}-week study roadmap for \"{}\" at {} level.",
            spec.weeks,
            spec.topic,
            spec.level.as_str().to_lowercase()
        )
    }
}

impl std::fmt::Debug for LlmRoadmapGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmRoadmapGenerator")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct StepList {
    steps: Vec<RawStep>,
}

#[derive(Deserialize)]
struct RawStep {
    #[serde(default)]
    order: Option<u32>,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    resources: Vec<String>,
}

fn failed(reason: impl Into<String>) -> DomainError {
    DomainError::RoadmapGenerationFailed(reason.into())
}

/// Strip a surrounding markdown code fence, if any
fn strip_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the info string ("json") on the opening line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse the model's reply into ordered steps numbered from 1
pub(crate) fn parse_steps(content: &str) -> Result<Vec<RoadmapStep>, DomainError> {
    let list: StepList = serde_json::from_str(strip_fence(content))
        .map_err(|e| failed(format!("unreadable roadmap JSON: {e}")))?;

    let mut raw: Vec<(u32, RawStep)> = list
        .steps
        .into_iter()
        .enumerate()
        .filter(|(_, s)| !s.title.trim().is_empty())
        .map(|(i, s)| (s.order.unwrap_or(i as u32 + 1), s))
        .collect();
    if raw.is_empty() {
        return Err(failed("roadmap has no steps"));
    }
    raw.sort_by_key(|(order, _)| *order);

    Ok(raw
        .into_iter()
        .enumerate()
        .map(|(i, (_, s))| RoadmapStep {
            order: i as u32 + 1,
            title: s.title.trim().to_string(),
            description: s.description.trim().to_string(),
            resources: s
                .resources
                .into_iter()
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect(),
        })
        .collect())
}

#[async_trait]
impl RoadmapGenerator for LlmRoadmapGenerator {
    fn name(&self) -> &'static str {
        "llm"
    }

    #[instrument(skip(self, spec), fields(model = %self.model, weeks = spec.weeks))]
    async fn generate(&self, spec: &RoadmapSpec) -> Result<Vec<RoadmapStep>, DomainError> {
        let body = json!({
            "model": self.model,
            "temperature": 0.4,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": Self::user_prompt(spec) },
            ],
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, timeout = e.is_timeout(), "Roadmap request failed");
                failed("roadmap service unreachable")
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Roadmap service returned an error");
            return Err(failed(format!("roadmap service returned {status}")));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| failed(format!("unreadable roadmap response: {e}")))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| failed("empty roadmap response"))?;
        debug!(length = content.len(), "Roadmap reply received");

        parse_steps(&content)
    }
}
