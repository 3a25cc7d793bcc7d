//! # model-runner
//!
//! Fans a single prompt out to several LLM providers (OpenAI, Anthropic,
//! Google), runs the calls in small concurrent batches, and returns one
//! normalized [`PromptResult`] per requested model, in request order, with a
//! cost estimate attached.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use model_runner::{CredentialMap, GenerationConfig, Runner};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), model_runner::Error> {
//!     let runner = Runner::builder().build()?;
//!     let results = runner
//!         .execute_model_runs(
//!             "Explain few-shot prompting in one paragraph.",
//!             &["gpt-4o-mini", "claude-3-5-haiku", "gemini-flash"],
//!             &GenerationConfig::default(),
//!             &CredentialMap::new(),
//!         )
//!         .await?;
//!
//!     for result in &results {
//!         println!("{} ({}): ${:.4}", result.model, result.provider, result.cost_estimate);
//!     }
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod auth;
pub mod budget;
pub mod client;
pub mod config;
pub mod models;
pub mod observability;
pub mod runner;
pub mod types;

pub use auth::{CredentialMap, CredentialResolver, StoredKey};
pub use budget::{
    CostEstimator, DailyUsage, GuardrailReport, Guardrails, ModelPricing, PreflightEstimate,
    estimate_prompt_tokens, preflight,
};
pub use client::{
    AdapterSet, AnthropicAdapter, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, Endpoints,
    GenerationConfig, GoogleAdapter, OpenAiAdapter, ProviderAdapter,
};
pub use config::{ConfigError, RunnerSettings};
pub use models::{ModelRegistry, ModelSpec, ProviderKind, registry};
pub use runner::{RunRequest, Runner, RunnerBuilder};
pub use types::{PromptResult, RunSummary, Usage};

/// Error type for model-runner operations.
///
/// Only validation errors escape a run; every per-model error is folded into
/// that model's [`PromptResult`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Requested model key is not in the registry.
    #[error("Unknown model: {key}")]
    UnknownModel { key: String },

    /// Request rejected before dispatch (empty prompt, no models).
    #[error("{0}")]
    InvalidRequest(String),

    /// No override or default key configured for the provider.
    #[error(
        "Missing API key for {provider}. Add a personal key in Settings or configure a server-side fallback."
    )]
    MissingCredential { provider: ProviderKind },

    /// Provider answered 429 (or its equivalent).
    #[error(
        "{} rate limit reached. Please wait a moment or reduce the number of simultaneous models.",
        provider.label()
    )]
    RateLimit {
        provider: ProviderKind,
        retry_after: Option<std::time::Duration>,
    },

    /// Provider returned a non-success status.
    #[error("{message}")]
    Api {
        provider: ProviderKind,
        status: Option<u16>,
        message: String,
        error_type: Option<String>,
    },

    /// Success response did not have the expected shape.
    #[error("{0}")]
    Parse(String),

    /// Transport failure (DNS, connect, timeout, reset).
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse error classification so callers can branch without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Aborts the whole run before dispatch
    Validation,
    MissingCredential,
    RateLimited,
    /// Non-success status or malformed body
    Provider,
    Transport,
    Configuration,
}

impl Error {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Error::InvalidRequest(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownModel { .. } | Error::InvalidRequest(_) => ErrorKind::Validation,
            Error::MissingCredential { .. } => ErrorKind::MissingCredential,
            Error::RateLimit { .. } => ErrorKind::RateLimited,
            Error::Api { .. } | Error::Parse(_) => ErrorKind::Provider,
            Error::Network(_) => ErrorKind::Transport,
            Error::Config(_) => ErrorKind::Configuration,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    pub fn is_rate_limited(&self) -> bool {
        self.kind() == ErrorKind::RateLimited
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => *status,
            Error::RateLimit { .. } => Some(429),
            _ => None,
        }
    }

    pub fn retry_after(&self) -> Option<std::time::Duration> {
        match self {
            Error::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
