//! Pre-flight cost estimates shown before a run is dispatched.

use serde::Serialize;

use crate::client::DEFAULT_MAX_TOKENS;
use crate::models::ModelRegistry;
use crate::types::Usage;
use crate::Result;

/// Input tokens assumed when the prompt is still blank.
pub const DEFAULT_PROMPT_TOKEN_ESTIMATE: u64 = 120;

const TOKENS_PER_WORD: f64 = 1.3;
const MIN_PROMPT_TOKENS: u64 = 20;

/// Word-count approximation: `max(ceil(words * 1.3), 20)`, or 0 for blank text.
pub fn estimate_prompt_tokens(text: &str) -> u64 {
    let words = text.split_whitespace().count();
    if words == 0 {
        return 0;
    }
    let approx = (words as f64 * TOKENS_PER_WORD).ceil() as u64;
    approx.max(MIN_PROMPT_TOKENS)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelCostEstimate {
    pub model_key: String,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreflightEstimate {
    pub assumed_input_tokens: u64,
    /// Worst case: every model uses its full output allowance.
    pub assumed_output_tokens: u64,
    pub breakdown: Vec<ModelCostEstimate>,
    pub total_cost: f64,
}

impl PreflightEstimate {
    pub fn model_count(&self) -> usize {
        self.breakdown.len()
    }

    pub fn cost_for(&self, model_key: &str) -> Option<f64> {
        self.breakdown
            .iter()
            .find(|item| item.model_key == model_key)
            .map(|item| item.cost)
    }
}

/// Advisory estimate for running `prompt` against `model_keys`.
///
/// `max_tokens` is the caller's configured output cap; `None` uses the
/// adapter default.
pub fn preflight<S: AsRef<str>>(
    registry: &ModelRegistry,
    prompt: &str,
    model_keys: &[S],
    max_tokens: Option<u32>,
) -> Result<PreflightEstimate> {
    let specs = registry.validate_keys(model_keys)?;

    let assumed_input_tokens = match estimate_prompt_tokens(prompt) {
        0 => DEFAULT_PROMPT_TOKEN_ESTIMATE,
        n => n,
    };
    let assumed_output_tokens = u64::from(max_tokens.unwrap_or(DEFAULT_MAX_TOKENS));
    let usage = Usage::new(assumed_input_tokens, assumed_output_tokens);

    let breakdown: Vec<ModelCostEstimate> = specs
        .iter()
        .map(|spec| ModelCostEstimate {
            model_key: spec.key.clone(),
            cost: spec.pricing.cost(&usage),
        })
        .collect();
    let total_cost = breakdown.iter().map(|item| item.cost).sum();

    Ok(PreflightEstimate {
        assumed_input_tokens,
        assumed_output_tokens,
        breakdown,
        total_cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_prompt_tokens() {
        assert_eq!(estimate_prompt_tokens(""), 0);
        assert_eq!(estimate_prompt_tokens("   \n\t"), 0);
        // 3 words * 1.3 = 3.9 -> floor of 20
        assert_eq!(estimate_prompt_tokens("one two three"), 20);
        // 100 words * 1.3 = 130
        let long = vec!["word"; 100].join(" ");
        assert_eq!(estimate_prompt_tokens(&long), 130);
        // 17 * 1.3 = 22.1 -> 23
        let odd = vec!["w"; 17].join("  ");
        assert_eq!(estimate_prompt_tokens(&odd), 23);
    }

    #[test]
    fn test_preflight_breakdown() {
        let registry = ModelRegistry::builtins();
        let prompt = vec!["token"; 100].join(" ");
        let estimate = preflight(&registry, &prompt, &["gpt-4o-mini", "gemini-flash"], Some(500))
            .unwrap();

        assert_eq!(estimate.assumed_input_tokens, 130);
        assert_eq!(estimate.assumed_output_tokens, 500);
        assert_eq!(estimate.model_count(), 2);

        let mini = (130.0 / 1000.0) * 0.15 + (500.0 / 1000.0) * 0.6;
        let flash = (130.0 / 1000.0) * 0.075 + (500.0 / 1000.0) * 0.3;
        assert_eq!(estimate.cost_for("gpt-4o-mini"), Some(mini));
        assert_eq!(estimate.cost_for("gemini-flash"), Some(flash));
        assert_eq!(estimate.total_cost, mini + flash);
    }

    #[test]
    fn test_preflight_blank_prompt_uses_default() {
        let registry = ModelRegistry::builtins();
        let estimate = preflight(&registry, "", &["gpt-4o"], None).unwrap();
        assert_eq!(estimate.assumed_input_tokens, DEFAULT_PROMPT_TOKEN_ESTIMATE);
        assert_eq!(estimate.assumed_output_tokens, 1000);
    }

    #[test]
    fn test_preflight_unknown_model() {
        let registry = ModelRegistry::builtins();
        let err = preflight(&registry, "hi", &["gpt-4o", "mystery"], None).unwrap_err();
        assert_eq!(err.to_string(), "Unknown model: mystery");
    }
}
