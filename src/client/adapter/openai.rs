//! OpenAI chat completions adapter.

use std::time::Instant;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::base::RequestExecutor;
use super::config::{GenerationConfig, OPENAI_BASE_URL};
use super::traits::ProviderAdapter;
use crate::models::ProviderKind;
use crate::types::{PromptResult, Usage};
use crate::{Error, Result};

const ENDPOINT: &str = "/v1/chat/completions";

#[derive(Debug, Clone)]
pub struct OpenAiAdapter {
    http: reqwest::Client,
    base_url: String,
}

impl OpenAiAdapter {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: OPENAI_BASE_URL.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f64,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f64>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: ChatUsage,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Default, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn provider(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn execute(
        &self,
        prompt: &str,
        wire_id: &str,
        config: &GenerationConfig,
        api_key: &SecretString,
    ) -> Result<PromptResult> {
        let body = ChatRequest {
            model: wire_id,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: config.temperature_or_default(),
            max_tokens: config.max_tokens_or_default(),
            top_p: config.top_p,
            frequency_penalty: config.frequency_penalty,
            presence_penalty: config.presence_penalty,
        };

        let started = Instant::now();
        let request = self
            .http
            .post(format!("{}{}", self.base_url, ENDPOINT))
            .bearer_auth(api_key.expose_secret());
        let response: ChatResponse =
            RequestExecutor::post_json(self.provider(), request, &body).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Parse("OpenAI response contained no choices".into()))?;
        let text = choice.message.content.unwrap_or_default();
        let usage = Usage::new(response.usage.prompt_tokens, response.usage.completion_tokens);

        Ok(PromptResult::success(
            self.provider(),
            wire_id,
            text,
            usage,
            started.elapsed(),
        ))
    }
}
