//! Runner settings loaded from a [`ConfigProvider`].

use std::time::Duration;

use super::provider::{ConfigProvider, ConfigProviderExt};
use super::{ConfigError, ConfigResult, EnvConfigProvider};
use crate::client::Endpoints;
use crate::models::ProviderKind;

pub const DEFAULT_MAX_CONCURRENCY: usize = 2;
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(350);

/// Prefix used by [`RunnerSettings::from_env`].
pub const ENV_PREFIX: &str = "MODEL_RUNNER_";

const MAX_CONCURRENCY_KEY: &str = "runner.max_concurrency";
const BATCH_DELAY_KEY: &str = "runner.batch_delay_ms";
const REQUEST_TIMEOUT_KEY: &str = "runner.request_timeout_secs";

#[derive(Debug, Clone, PartialEq)]
pub struct RunnerSettings {
    /// Models dispatched concurrently per batch.
    pub max_concurrency: usize,
    /// Pause between consecutive batches.
    pub batch_delay: Duration,
    /// Client-wide HTTP timeout; `None` waits on the transport.
    pub request_timeout: Option<Duration>,
    pub endpoints: Endpoints,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            batch_delay: DEFAULT_BATCH_DELAY,
            request_timeout: None,
            endpoints: Endpoints::default(),
        }
    }
}

impl RunnerSettings {
    /// Reads every known key, keeping the default for keys the source lacks.
    pub async fn load(source: &dyn ConfigProvider) -> ConfigResult<Self> {
        let mut settings = Self::default();

        if let Some(n) = source.get::<usize>(MAX_CONCURRENCY_KEY).await? {
            settings.max_concurrency = n;
        }
        if let Some(ms) = source.get::<u64>(BATCH_DELAY_KEY).await? {
            settings.batch_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = source.get::<u64>(REQUEST_TIMEOUT_KEY).await? {
            settings.request_timeout = Some(Duration::from_secs(secs));
        }
        for provider in ProviderKind::ALL {
            let key = format!("endpoints.{}", provider.as_str());
            if let Some(url) = source.get_string(&key).await? {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(ConfigError::invalid(key, "expected an http(s) URL"));
                }
                settings.endpoints = settings.endpoints.with(provider, url);
            }
        }

        settings.validate()?;
        tracing::debug!(
            source = source.name(),
            max_concurrency = settings.max_concurrency,
            batch_delay_ms = settings.batch_delay.as_millis() as u64,
            "runner settings loaded"
        );
        Ok(settings)
    }

    /// Reads `MODEL_RUNNER_*` environment variables.
    pub async fn from_env() -> ConfigResult<Self> {
        Self::load(&EnvConfigProvider::prefixed(ENV_PREFIX)).await
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_concurrency == 0 {
            return Err(ConfigError::invalid(MAX_CONCURRENCY_KEY, "must be at least 1"));
        }
        if self.request_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::invalid(REQUEST_TIMEOUT_KEY, "must be positive"));
        }
        Ok(())
    }
}
