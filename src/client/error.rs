//! Provider error bodies.

use std::time::Duration;

use serde::Deserialize;

use crate::Error;
use crate::models::ProviderKind;

/// Google's status string for quota exhaustion, sent alongside (or instead
/// of) HTTP 429.
const RESOURCE_EXHAUSTED: &str = "RESOURCE_EXHAUSTED";

/// Superset of the error envelopes returned by the three providers.
///
/// OpenAI and Anthropic nest `{message, type}` under `error`; Google nests
/// `{code, message, status}`. Some gateways return a bare `{message}`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub error: Option<ErrorDetail>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "type")]
    pub error_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ErrorResponse {
    /// Lenient parse; anything that is not a JSON object yields an empty body.
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    fn is_resource_exhausted(&self) -> bool {
        self.error
            .as_ref()
            .and_then(|e| e.status.as_deref())
            .is_some_and(|s| s == RESOURCE_EXHAUSTED)
    }

    /// `error.message`, then `message`; empty strings do not count.
    fn message(&self) -> Option<&str> {
        self.error
            .as_ref()
            .and_then(|e| e.message.as_deref())
            .filter(|m| !m.trim().is_empty())
            .or_else(|| self.message.as_deref().filter(|m| !m.trim().is_empty()))
    }

    pub fn into_error(
        self,
        provider: ProviderKind,
        status: u16,
        retry_after: Option<Duration>,
    ) -> Error {
        if status == 429 || self.is_resource_exhausted() {
            return Error::RateLimit {
                provider,
                retry_after,
            };
        }

        let message = self
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Failed to get response from {}", provider.label()));
        let error_type = self.error.and_then(|e| e.error_type.or(e.status));

        Error::Api {
            provider,
            status: Some(status),
            message,
            error_type,
        }
    }
}

/// `Retry-After` in delta-seconds form; HTTP-date values are ignored.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
