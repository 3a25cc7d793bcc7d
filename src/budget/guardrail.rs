//! Advisory spend guardrails evaluated against a pre-flight estimate.

use serde::{Deserialize, Serialize};

use super::preflight::PreflightEstimate;

/// Cheapest model per provider; the default selection in budget mode.
pub const BUDGET_MODELS: [&str; 3] = ["gpt-4o-mini", "claude-3-5-haiku", "gemini-flash"];

pub fn is_budget_model(key: &str) -> bool {
    BUDGET_MODELS.contains(&key)
}

/// What the caller has already spent today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyUsage {
    pub calls: u32,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Guardrails {
    pub high_cost_threshold: f64,
    pub max_models_before_rate_warning: usize,
    pub daily_call_limit: u32,
    pub daily_cost_limit: f64,
    pub quota_warning_ratio: f64,
}

impl Default for Guardrails {
    fn default() -> Self {
        Self {
            high_cost_threshold: 5.0,
            max_models_before_rate_warning: 4,
            daily_call_limit: 40,
            daily_cost_limit: 25.0,
            quota_warning_ratio: 0.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardrailWarning {
    /// Estimated cost exceeds the high-cost threshold; needs acknowledgement.
    HighCost,
    /// Enough models selected that provider rate limits become likely.
    RateLimitRisk,
    NearCallLimit,
    NearCostLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardrailViolation {
    CallLimitReached,
    CostLimitReached,
    CallLimitExceeded,
    CostLimitExceeded,
}

impl GuardrailViolation {
    pub fn message(&self) -> &'static str {
        match self {
            Self::CallLimitReached | Self::CallLimitExceeded => {
                "Daily model call limit reached. Try again tomorrow or reduce the number of models selected."
            }
            Self::CostLimitReached | Self::CostLimitExceeded => {
                "This run would exceed your daily cost allowance."
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuardrailReport {
    pub warnings: Vec<GuardrailWarning>,
    pub violations: Vec<GuardrailViolation>,
    /// Fraction of the daily call quota already used, capped at 1.0.
    pub call_usage_ratio: f64,
    /// Fraction of the daily cost quota already used, capped at 1.0.
    pub cost_usage_ratio: f64,
}

impl GuardrailReport {
    pub fn requires_acknowledgement(&self) -> bool {
        self.warnings.contains(&GuardrailWarning::HighCost)
    }

    pub fn is_blocked(&self) -> bool {
        !self.violations.is_empty()
    }
}

impl Guardrails {
    pub fn evaluate(&self, estimate: &PreflightEstimate, usage: DailyUsage) -> GuardrailReport {
        let mut report = GuardrailReport {
            call_usage_ratio: ratio(f64::from(usage.calls), f64::from(self.daily_call_limit)),
            cost_usage_ratio: ratio(usage.cost, self.daily_cost_limit),
            ..Default::default()
        };

        if estimate.total_cost > self.high_cost_threshold {
            report.warnings.push(GuardrailWarning::HighCost);
        }
        if estimate.model_count() > self.max_models_before_rate_warning {
            report.warnings.push(GuardrailWarning::RateLimitRisk);
        }
        if report.call_usage_ratio >= self.quota_warning_ratio {
            report.warnings.push(GuardrailWarning::NearCallLimit);
        }
        if report.cost_usage_ratio >= self.quota_warning_ratio {
            report.warnings.push(GuardrailWarning::NearCostLimit);
        }

        if usage.calls >= self.daily_call_limit {
            report.violations.push(GuardrailViolation::CallLimitReached);
        } else if u64::from(usage.calls) + estimate.model_count() as u64
            > u64::from(self.daily_call_limit)
        {
            report.violations.push(GuardrailViolation::CallLimitExceeded);
        }

        if usage.cost >= self.daily_cost_limit {
            report.violations.push(GuardrailViolation::CostLimitReached);
        } else if usage.cost + estimate.total_cost > self.daily_cost_limit {
            report.violations.push(GuardrailViolation::CostLimitExceeded);
        }

        if report.is_blocked() {
            tracing::debug!(violations = ?report.violations, "run blocked by guardrails");
        }

        report
    }
}

fn ratio(used: f64, limit: f64) -> f64 {
    if limit <= 0.0 {
        return 1.0;
    }
    (used / limit).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::preflight;
    use crate::models::ModelRegistry;

    fn estimate(keys: &[&str], max_tokens: u32) -> PreflightEstimate {
        preflight(&ModelRegistry::builtins(), "short prompt", keys, Some(max_tokens)).unwrap()
    }

    #[test]
    fn test_budget_models() {
        assert!(is_budget_model("gpt-4o-mini"));
        assert!(!is_budget_model("gpt-4o"));
    }

    #[test]
    fn test_clean_run() {
        let report = Guardrails::default().evaluate(&estimate(&BUDGET_MODELS, 1000), DailyUsage::default());
        assert!(report.warnings.is_empty());
        assert!(!report.is_blocked());
        assert!(!report.requires_acknowledgement());
    }

    #[test]
    fn test_high_cost_requires_acknowledgement() {
        // gpt-4-turbo: 200k output tokens at $30/1K = $6000
        let report = Guardrails::default().evaluate(&estimate(&["gpt-4-turbo"], 200_000), DailyUsage::default());
        assert!(report.requires_acknowledgement());
        assert!(report.violations.contains(&GuardrailViolation::CostLimitExceeded));
    }

    #[test]
    fn test_rate_limit_warning_above_four_models() {
        let keys = ["gpt-4o-mini", "gpt-4o", "claude-3-5-haiku", "gemini-flash", "gemini-pro"];
        let report = Guardrails::default().evaluate(&estimate(&keys, 10), DailyUsage::default());
        assert!(report.warnings.contains(&GuardrailWarning::RateLimitRisk));
    }

    #[test]
    fn test_call_limits() {
        let guardrails = Guardrails::default();
        let est = estimate(&BUDGET_MODELS, 10);

        let near = guardrails.evaluate(&est, DailyUsage { calls: 32, cost: 0.0 });
        assert!(near.warnings.contains(&GuardrailWarning::NearCallLimit));
        assert!(!near.is_blocked());

        let over = guardrails.evaluate(&est, DailyUsage { calls: 38, cost: 0.0 });
        assert_eq!(over.violations, vec![GuardrailViolation::CallLimitExceeded]);

        let reached = guardrails.evaluate(&est, DailyUsage { calls: 40, cost: 0.0 });
        assert_eq!(reached.violations, vec![GuardrailViolation::CallLimitReached]);
        assert_eq!(reached.call_usage_ratio, 1.0);
    }

    #[test]
    fn test_cost_limit_reached() {
        let report = Guardrails::default().evaluate(
            &estimate(&["gpt-4o-mini"], 10),
            DailyUsage { calls: 0, cost: 25.0 },
        );
        assert!(report.violations.contains(&GuardrailViolation::CostLimitReached));
        assert!(report.warnings.contains(&GuardrailWarning::NearCostLimit));
    }
}
