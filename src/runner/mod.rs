//! Fan-out execution of one prompt across many models.
//!
//! Models run in consecutive batches of `max_concurrency`. Calls inside a
//! batch run concurrently and all of them settle before the next batch
//! starts; a fixed delay separates batches. Per-model failures become error
//! results in place, so the output always lines up index-for-index with the
//! requested keys.

mod batch;
mod request;

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::Instrument;

pub use batch::plan_batches;
pub use request::RunRequest;

use crate::auth::{CredentialMap, CredentialResolver};
use crate::budget::{PreflightEstimate, preflight};
use crate::client::{AdapterSet, GenerationConfig, http_client};
use crate::config::RunnerSettings;
use crate::models::{ModelRegistry, ModelSpec, registry};
use crate::observability::{RunSpans, record_run_outcome};
use crate::types::PromptResult;
use crate::{Error, Result};

#[derive(Clone, Debug)]
pub struct Runner {
    registry: Arc<ModelRegistry>,
    adapters: AdapterSet,
    credentials: CredentialResolver,
    max_concurrency: usize,
    batch_delay: Duration,
}

impl Runner {
    pub fn builder() -> RunnerBuilder {
        RunnerBuilder::default()
    }

    /// Runner over HTTP adapters configured by `settings`, with default
    /// credentials read from the environment.
    pub fn from_settings(settings: RunnerSettings) -> Result<Self> {
        Self::builder().settings(settings).build()
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    pub fn batch_delay(&self) -> Duration {
        self.batch_delay
    }

    /// Validates and runs an inbound request with its trimmed prompt.
    pub async fn execute(&self, request: RunRequest) -> Result<Vec<PromptResult>> {
        let prompt = request.validate()?;
        self.execute_model_runs(prompt, &request.model_keys, &request.config, &request.credentials)
            .await
    }

    /// Runs `prompt` against every model in `model_keys`.
    ///
    /// Returns exactly one result per key, in request order. The only error
    /// is [`Error::UnknownModel`], raised before anything is dispatched;
    /// provider, transport and credential failures are reported inside the
    /// corresponding result.
    pub async fn execute_model_runs<S: AsRef<str>>(
        &self,
        prompt: &str,
        model_keys: &[S],
        config: &GenerationConfig,
        overrides: &CredentialMap,
    ) -> Result<Vec<PromptResult>> {
        let specs = self.registry.validate_keys(model_keys)?;

        let spans = RunSpans::new();
        let run_span = spans.run_span(specs.len());

        let results = async {
            let batches = plan_batches(specs.len(), self.max_concurrency);
            let last = batches.len().saturating_sub(1);
            let mut results = Vec::with_capacity(specs.len());

            for (index, range) in batches.into_iter().enumerate() {
                let batch = &specs[range];
                let calls = batch
                    .iter()
                    .map(|spec| self.run_model(prompt, spec, config, overrides, &spans));
                let settled = join_all(calls)
                    .instrument(spans.batch_span(index, batch.len()))
                    .await;
                results.extend(settled);

                if index < last && !self.batch_delay.is_zero() {
                    tokio::time::sleep(self.batch_delay).await;
                }
            }

            record_run_outcome(&tracing::Span::current(), &results);
            results
        }
        .instrument(run_span)
        .await;

        Ok(results)
    }

    /// Single-model convenience over the same path as
    /// [`execute_model_runs`](Self::execute_model_runs).
    pub async fn run_single(
        &self,
        prompt: &str,
        model_key: &str,
        config: &GenerationConfig,
        overrides: &CredentialMap,
    ) -> Result<PromptResult> {
        let spec = self.registry.lookup(model_key)?;
        let spans = RunSpans::new();
        let result = self
            .run_model(prompt, spec, config, overrides, &spans)
            .instrument(spans.run_span(1))
            .await;
        Ok(result)
    }

    /// Worst-case cost of a run, before dispatching it.
    pub fn preflight<S: AsRef<str>>(
        &self,
        prompt: &str,
        model_keys: &[S],
        config: &GenerationConfig,
    ) -> Result<PreflightEstimate> {
        preflight(&self.registry, prompt, model_keys, config.max_tokens)
    }

    async fn run_model(
        &self,
        prompt: &str,
        spec: &ModelSpec,
        config: &GenerationConfig,
        overrides: &CredentialMap,
        spans: &RunSpans,
    ) -> PromptResult {
        let call = spans.call_span(spec.provider, &spec.key);

        let outcome = match self.credentials.resolve(spec.provider, overrides) {
            Some(api_key) => {
                self.adapters
                    .get(spec.provider)
                    .execute(prompt, &spec.wire_id, config, &api_key)
                    .instrument(call.span().clone())
                    .await
            }
            None => Err(Error::MissingCredential {
                provider: spec.provider,
            }),
        };

        let result = match outcome {
            Ok(mut result) => {
                result.cost_estimate = spec.pricing.cost(&result.usage());
                result
            }
            Err(err) => PromptResult::failure(spec.provider, &spec.wire_id, err.to_string()),
        };

        call.finish(&result);
        result
    }
}

#[derive(Default)]
pub struct RunnerBuilder {
    registry: Option<ModelRegistry>,
    adapters: Option<AdapterSet>,
    credentials: Option<CredentialResolver>,
    http: Option<reqwest::Client>,
    settings: RunnerSettings,
}

impl RunnerBuilder {
    pub fn registry(mut self, registry: ModelRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Replaces the HTTP adapters; endpoints and timeout settings no longer
    /// apply.
    pub fn adapters(mut self, adapters: AdapterSet) -> Self {
        self.adapters = Some(adapters);
        self
    }

    pub fn credentials(mut self, credentials: CredentialResolver) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn settings(mut self, settings: RunnerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.settings.max_concurrency = max_concurrency;
        self
    }

    pub fn batch_delay(mut self, delay: Duration) -> Self {
        self.settings.batch_delay = delay;
        self
    }

    pub fn build(self) -> Result<Runner> {
        let settings = self.settings;
        settings.validate()?;

        let adapters = match self.adapters {
            Some(adapters) => adapters,
            None => {
                let http = match self.http {
                    Some(http) => http,
                    None => http_client(settings.request_timeout)?,
                };
                AdapterSet::http(http, &settings.endpoints)
            }
        };

        Ok(Runner {
            registry: Arc::new(self.registry.unwrap_or_else(|| registry().clone())),
            adapters,
            credentials: self.credentials.unwrap_or_else(CredentialResolver::from_env),
            max_concurrency: settings.max_concurrency,
            batch_delay: settings.batch_delay,
        })
    }
}
