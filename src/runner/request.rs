use serde::Deserialize;

use crate::auth::CredentialMap;
use crate::client::GenerationConfig;
use crate::{Error, Result};

/// Inbound run request, shaped like the platform's JSON body:
/// `{"prompt": "...", "modelKeys": ["gpt-4o-mini"], "config": {...}}`.
///
/// Credential overrides never travel in the body; attach them with
/// [`RunRequest::with_credentials`] after resolving the caller's key store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub model_keys: Vec<String>,
    #[serde(default)]
    pub config: GenerationConfig,
    #[serde(skip)]
    pub credentials: CredentialMap,
}

impl RunRequest {
    pub fn new<I, S>(prompt: impl Into<String>, model_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prompt: prompt.into(),
            model_keys: model_keys.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_credentials(mut self, credentials: CredentialMap) -> Self {
        self.credentials = credentials;
        self
    }

    /// Returns the trimmed prompt once the request is dispatchable.
    pub fn validate(&self) -> Result<&str> {
        let prompt = self.prompt.trim();
        if prompt.is_empty() {
            return Err(Error::invalid_request("Prompt is required."));
        }
        if self.model_keys.is_empty() {
            return Err(Error::invalid_request("At least one model is required."));
        }
        Ok(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_platform_body() {
        let request: RunRequest = serde_json::from_str(
            r#"{
                "prompt": "  Explain recursion.  ",
                "modelKeys": ["gpt-4o-mini", "gemini-flash"],
                "config": {"temperature": 0.3, "max_tokens": 256}
            }"#,
        )
        .unwrap();

        assert_eq!(request.model_keys, vec!["gpt-4o-mini", "gemini-flash"]);
        assert_eq!(request.config.temperature, Some(0.3));
        assert_eq!(request.config.max_tokens, Some(256));
        assert!(request.credentials.is_empty());
        assert_eq!(request.validate().unwrap(), "Explain recursion.");
    }

    #[test]
    fn test_validation_messages() {
        let err = RunRequest::new("   ", ["gpt-4o"]).validate().unwrap_err();
        assert_eq!(err.to_string(), "Prompt is required.");
        assert!(err.is_validation());

        let err = RunRequest::new("hello", Vec::<String>::new())
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "At least one model is required.");
    }

    #[test]
    fn test_missing_fields_default() {
        let request: RunRequest = serde_json::from_str("{}").unwrap();
        assert!(request.validate().is_err());
        assert_eq!(request.config, GenerationConfig::default());
    }
}
