//! Normalized per-model result and run aggregates.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::Usage;
use crate::models::ProviderKind;

/// Outcome of running one prompt against one model.
///
/// Field names follow the JSON the platform stores and renders, so the
/// struct can be serialized straight into an API response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PromptResult {
    pub response: String,
    pub tokens_used: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub duration_ms: u64,
    /// USD
    pub cost_estimate: f64,
    /// Wire id of the model that produced (or failed to produce) the response
    pub model: String,
    pub provider: ProviderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PromptResult {
    /// Successful result; cost is filled in later by the estimator.
    pub fn success(
        provider: ProviderKind,
        model: impl Into<String>,
        text: impl Into<String>,
        usage: Usage,
        duration: Duration,
    ) -> Self {
        Self {
            response: text.into(),
            tokens_used: usage.total(),
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            duration_ms: duration.as_millis() as u64,
            cost_estimate: 0.0,
            model: model.into(),
            provider,
            error: None,
        }
    }

    /// Synthetic result standing in for a failed call.
    pub fn failure(
        provider: ProviderKind,
        model: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        Self {
            response: format!("Error: {}", message),
            tokens_used: 0,
            input_tokens: 0,
            output_tokens: 0,
            duration_ms: 0,
            cost_estimate: 0.0,
            model: model.into(),
            provider,
            error: Some(message),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn usage(&self) -> Usage {
        Usage::new(self.input_tokens, self.output_tokens)
    }
}

/// Totals over a result list, as shown next to a model comparison.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub total_cost: f64,
    pub total_tokens: u64,
    pub succeeded: usize,
    pub failed: usize,
    pub average_duration_ms: f64,
}

impl RunSummary {
    pub fn from_results(results: &[PromptResult]) -> Self {
        if results.is_empty() {
            return Self::default();
        }

        let failed = results.iter().filter(|r| r.is_error()).count();
        let total_duration: u64 = results.iter().map(|r| r.duration_ms).sum();

        Self {
            total_cost: results.iter().map(|r| r.cost_estimate).sum(),
            total_tokens: results.iter().map(|r| r.tokens_used).sum(),
            succeeded: results.len() - failed,
            failed,
            average_duration_ms: total_duration as f64 / results.len() as f64,
        }
    }
}
