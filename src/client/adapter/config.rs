//! Generation parameters and provider endpoints.

use serde::{Deserialize, Serialize};

use crate::models::ProviderKind;

pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Sampling parameters shared by every model in a run.
///
/// Every field is optional. Temperature and max tokens fall back to
/// [`DEFAULT_TEMPERATURE`] and [`DEFAULT_MAX_TOKENS`]; the rest are only sent
/// when set. Ranges are passed through unchecked and left to the provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
}

impl GenerationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_frequency_penalty(mut self, penalty: f64) -> Self {
        self.frequency_penalty = Some(penalty);
        self
    }

    pub fn with_presence_penalty(mut self, penalty: f64) -> Self {
        self.presence_penalty = Some(penalty);
        self
    }

    pub fn temperature_or_default(&self) -> f64 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn max_tokens_or_default(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }
}

/// Base URL per provider; override to route through a gateway or mock server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub openai: String,
    pub anthropic: String,
    pub google: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            openai: OPENAI_BASE_URL.into(),
            anthropic: ANTHROPIC_BASE_URL.into(),
            google: GOOGLE_BASE_URL.into(),
        }
    }
}

impl Endpoints {
    /// Every provider pointed at the same base URL.
    pub fn uniform(base_url: impl Into<String>) -> Self {
        let base_url = normalize(base_url.into());
        Self {
            openai: base_url.clone(),
            anthropic: base_url.clone(),
            google: base_url,
        }
    }

    pub fn with(mut self, provider: ProviderKind, base_url: impl Into<String>) -> Self {
        let base_url = normalize(base_url.into());
        match provider {
            ProviderKind::OpenAi => self.openai = base_url,
            ProviderKind::Anthropic => self.anthropic = base_url,
            ProviderKind::Google => self.google = base_url,
        }
        self
    }

    pub fn get(&self, provider: ProviderKind) -> &str {
        match provider {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Anthropic => &self.anthropic,
            ProviderKind::Google => &self.google,
        }
    }
}

fn normalize(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.temperature_or_default(), 0.7);
        assert_eq!(config.max_tokens_or_default(), 1000);
        assert!(config.top_p.is_none());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: GenerationConfig =
            serde_json::from_str(r#"{"temperature":0.2,"top_p":0.9}"#).unwrap();
        assert_eq!(config.temperature, Some(0.2));
        assert_eq!(config.top_p, Some(0.9));
        assert_eq!(config.max_tokens_or_default(), DEFAULT_MAX_TOKENS);

        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn test_endpoints_override() {
        let endpoints = Endpoints::default().with(ProviderKind::Google, "http://localhost:9000/");
        assert_eq!(endpoints.get(ProviderKind::Google), "http://localhost:9000");
        assert_eq!(endpoints.get(ProviderKind::OpenAi), OPENAI_BASE_URL);
    }
}
