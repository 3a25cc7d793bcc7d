//! Anthropic Messages API adapter.

use std::time::Instant;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::base::RequestExecutor;
use super::config::{ANTHROPIC_BASE_URL, GenerationConfig};
use super::traits::ProviderAdapter;
use crate::models::ProviderKind;
use crate::types::{PromptResult, Usage};
use crate::{Error, Result};

const ENDPOINT: &str = "/v1/messages";
const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone)]
pub struct AnthropicAdapter {
    http: reqwest::Client,
    base_url: String,
    api_version: String,
}

impl AnthropicAdapter {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: ANTHROPIC_BASE_URL.into(),
            api_version: API_VERSION.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: MessagesUsage,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Default, Deserialize)]
struct MessagesUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

impl MessagesResponse {
    /// Concatenated text blocks; `None` when the reply has no text block.
    fn text(&self) -> Option<String> {
        let mut blocks = self
            .content
            .iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text.as_deref())
            .peekable();
        blocks.peek()?;
        Some(blocks.collect())
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    async fn execute(
        &self,
        prompt: &str,
        wire_id: &str,
        config: &GenerationConfig,
        api_key: &SecretString,
    ) -> Result<PromptResult> {
        let body = MessagesRequest {
            model: wire_id,
            max_tokens: config.max_tokens_or_default(),
            temperature: config.temperature_or_default(),
            top_p: config.top_p,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let started = Instant::now();
        let request = self
            .http
            .post(format!("{}{}", self.base_url, ENDPOINT))
            .header("x-api-key", api_key.expose_secret())
            .header("anthropic-version", &self.api_version);
        let response: MessagesResponse =
            RequestExecutor::post_json(self.provider(), request, &body).await?;

        let text = response
            .text()
            .ok_or_else(|| Error::Parse("Anthropic response contained no text content".into()))?;
        let usage = Usage::new(response.usage.input_tokens, response.usage.output_tokens);

        Ok(PromptResult::success(
            self.provider(),
            wire_id,
            text,
            usage,
            started.elapsed(),
        ))
    }
}
