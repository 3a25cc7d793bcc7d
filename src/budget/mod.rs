//! Cost estimation: post-hoc accounting, pre-flight estimates and guardrails.

pub mod guardrail;
pub mod pricing;
mod preflight;

pub use guardrail::{
    BUDGET_MODELS, DailyUsage, GuardrailReport, GuardrailViolation, GuardrailWarning, Guardrails,
    is_budget_model,
};
pub use preflight::{
    DEFAULT_PROMPT_TOKEN_ESTIMATE, ModelCostEstimate, PreflightEstimate, estimate_prompt_tokens,
    preflight,
};
pub use pricing::{CostEstimator, ModelPricing};
