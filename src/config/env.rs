//! Environment variable configuration provider.

use super::provider::ConfigProvider;
use super::{ConfigError, ConfigResult};

/// Maps `runner.max_concurrency` to `<PREFIX>RUNNER_MAX_CONCURRENCY`.
#[derive(Debug, Clone, Default)]
pub struct EnvConfigProvider {
    prefix: Option<String>,
}

impl EnvConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    fn env_key(&self, key: &str) -> String {
        let name = key.to_uppercase().replace('.', "_");
        match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, name),
            None => name,
        }
    }

    fn key_from_env(&self, env_name: &str) -> Option<String> {
        let rest = match &self.prefix {
            Some(prefix) => env_name.strip_prefix(prefix.as_str())?,
            None => env_name,
        };
        Some(rest.to_lowercase().replace('_', "."))
    }
}

#[async_trait::async_trait]
impl ConfigProvider for EnvConfigProvider {
    fn name(&self) -> &str {
        "env"
    }

    async fn get_raw(&self, key: &str) -> ConfigResult<Option<String>> {
        match std::env::var(self.env_key(key)) {
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(ConfigError::Env(e)),
        }
    }

    /// Underscores are ambiguous on the way back, so `batch_delay_ms` lists
    /// as `batch.delay.ms`.
    async fn list_keys(&self, prefix: &str) -> ConfigResult<Vec<String>> {
        let env_prefix = self.env_key(prefix);
        Ok(std::env::vars()
            .filter(|(name, _)| name.starts_with(&env_prefix))
            .filter_map(|(name, _)| self.key_from_env(&name))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_key_conversion() {
        let provider = EnvConfigProvider::new();
        assert_eq!(provider.env_key("runner.max_concurrency"), "RUNNER_MAX_CONCURRENCY");

        let provider = EnvConfigProvider::prefixed("MODEL_RUNNER_");
        assert_eq!(
            provider.env_key("endpoints.openai"),
            "MODEL_RUNNER_ENDPOINTS_OPENAI"
        );
        assert_eq!(
            provider.key_from_env("MODEL_RUNNER_ENDPOINTS_OPENAI").as_deref(),
            Some("endpoints.openai")
        );
        assert_eq!(provider.key_from_env("PATH"), None);
    }

    #[tokio::test]
    async fn test_env_provider_get() {
        let provider = EnvConfigProvider::prefixed("MR_ENV_TEST_");

        // SAFETY: Test-only environment setup, variable name unique to this test
        unsafe { std::env::set_var("MR_ENV_TEST_RUNNER_BATCH_DELAY_MS", "120") };
        let value = provider.get_raw("runner.batch_delay_ms").await.unwrap();
        assert_eq!(value.as_deref(), Some("120"));
        unsafe { std::env::remove_var("MR_ENV_TEST_RUNNER_BATCH_DELAY_MS") };
    }

    #[tokio::test]
    async fn test_env_provider_not_found() {
        let provider = EnvConfigProvider::prefixed("NONEXISTENT_PREFIX_");
        assert_eq!(provider.get_raw("runner.max_concurrency").await.unwrap(), None);
    }
}
