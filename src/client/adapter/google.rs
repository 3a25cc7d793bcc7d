//! Google Gemini `generateContent` adapter.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::base::RequestExecutor;
use super::config::{GOOGLE_BASE_URL, GenerationConfig};
use super::traits::ProviderAdapter;
use crate::models::ProviderKind;
use crate::types::{PromptResult, Usage};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct GoogleAdapter {
    http: reqwest::Client,
    base_url: String,
}

impl GoogleAdapter {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: GOOGLE_BASE_URL.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// The key travels as a query parameter, so it is url-encoded here.
    fn build_url(&self, wire_id: &str, api_key: &SecretString) -> Result<Url> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, wire_id);
        Url::parse_with_params(&url, &[("key", api_key.expose_secret())])
            .map_err(|e| Error::Config(format!("Invalid Google endpoint {}: {}", self.base_url, e)))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationParams,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationParams {
    temperature: f64,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: UsageMetadata,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

#[async_trait]
impl ProviderAdapter for GoogleAdapter {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Google
    }

    async fn execute(
        &self,
        prompt: &str,
        wire_id: &str,
        config: &GenerationConfig,
        api_key: &SecretString,
    ) -> Result<PromptResult> {
        let body = GenerateContentRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
            generation_config: GenerationParams {
                temperature: config.temperature_or_default(),
                max_output_tokens: config.max_tokens_or_default(),
                top_p: config.top_p,
                frequency_penalty: config.frequency_penalty,
                presence_penalty: config.presence_penalty,
            },
        };
        let url = self.build_url(wire_id, api_key)?;

        let started = Instant::now();
        let response: GenerateContentResponse =
            RequestExecutor::post_json(self.provider(), self.http.post(url), &body).await?;

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| Error::Parse("Google response contained no candidates".into()))?;
        let text: String = candidate
            .content
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        let usage = Usage::new(
            response.usage_metadata.prompt_token_count,
            response.usage_metadata.candidates_token_count,
        );

        Ok(PromptResult::success(
            self.provider(),
            wire_id,
            text,
            usage,
            started.elapsed(),
        ))
    }
}
