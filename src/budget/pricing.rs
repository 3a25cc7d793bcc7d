//! Model pricing definitions for cost calculation.
//!
//! Rates are USD per 1,000 tokens, matching how the registry publishes them.
//! [`ModelPricing::cost`] is the single place the cost formula lives; both
//! post-hoc accounting and pre-flight estimates go through it.

use serde::{Deserialize, Serialize};

use crate::models::ModelRegistry;
use crate::types::{PromptResult, Usage};

const TOKENS_PER_UNIT: f64 = 1_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

impl ModelPricing {
    pub const FREE: ModelPricing = ModelPricing::new(0.0, 0.0);

    pub const fn new(input_per_1k: f64, output_per_1k: f64) -> Self {
        Self {
            input_per_1k,
            output_per_1k,
        }
    }

    pub fn cost(&self, usage: &Usage) -> f64 {
        let input = (usage.input_tokens as f64 / TOKENS_PER_UNIT) * self.input_per_1k;
        let output = (usage.output_tokens as f64 / TOKENS_PER_UNIT) * self.output_per_1k;
        input + output
    }
}

/// Prices results that only carry a provider and wire id, such as stored
/// history. The runner prices from the requested model's own spec instead.
#[derive(Debug, Clone, Copy)]
pub struct CostEstimator<'a> {
    registry: &'a ModelRegistry,
}

impl<'a> CostEstimator<'a> {
    pub fn new(registry: &'a ModelRegistry) -> Self {
        Self { registry }
    }

    pub fn estimate(&self, result: &PromptResult) -> f64 {
        self.registry
            .pricing_for(result.provider, &result.model)
            .cost(&result.usage())
    }

    pub fn apply(&self, result: &mut PromptResult) {
        result.cost_estimate = self.estimate(result);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::models::ProviderKind;

    #[test]
    fn test_cost_formula() {
        let pricing = ModelPricing::new(0.15, 0.6);
        let usage = Usage::new(1_000, 2_000);
        assert_eq!(pricing.cost(&usage), (1_000.0 / 1000.0) * 0.15 + (2_000.0 / 1000.0) * 0.6);
        assert_eq!(pricing.cost(&Usage::default()), 0.0);
    }

    #[test]
    fn test_cost_is_monotonic() {
        let pricing = ModelPricing::new(2.5, 10.0);
        let steps = [0u64, 1, 10, 999, 1_000, 50_000];
        for pair in steps.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            assert!(pricing.cost(&Usage::new(hi, 100)) >= pricing.cost(&Usage::new(lo, 100)));
            assert!(pricing.cost(&Usage::new(100, hi)) >= pricing.cost(&Usage::new(100, lo)));
        }
    }

    #[test]
    fn test_estimator_uses_reverse_lookup() {
        let registry = ModelRegistry::builtins();
        let estimator = CostEstimator::new(&registry);

        let mut result = PromptResult::success(
            ProviderKind::Anthropic,
            "claude-3-5-haiku-20241022",
            "text",
            Usage::new(2_000, 500),
            Duration::from_millis(10),
        );
        estimator.apply(&mut result);

        let expected = (2_000.0 / 1000.0) * 0.8 + (500.0 / 1000.0) * 4.0;
        assert_eq!(result.cost_estimate, expected);
    }

    #[test]
    fn test_estimator_zero_for_failures() {
        let registry = ModelRegistry::builtins();
        let mut failed = PromptResult::failure(ProviderKind::OpenAi, "gpt-4o", "down");
        CostEstimator::new(&registry).apply(&mut failed);
        assert_eq!(failed.cost_estimate, 0.0);
    }
}
