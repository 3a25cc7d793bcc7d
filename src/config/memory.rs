//! In-memory configuration provider, for tests and code-defined settings.

use std::collections::HashMap;

use super::ConfigResult;
use super::provider::ConfigProvider;

#[derive(Debug, Clone)]
pub struct MemoryConfigProvider {
    data: HashMap<String, String>,
    name: String,
}

impl Default for MemoryConfigProvider {
    fn default() -> Self {
        Self::named("memory")
    }
}

impl MemoryConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            data: HashMap::new(),
            name: name.into(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.data.insert(key.into(), value.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl FromIterator<(String, String)> for MemoryConfigProvider {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            data: iter.into_iter().collect(),
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
impl ConfigProvider for MemoryConfigProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_raw(&self, key: &str) -> ConfigResult<Option<String>> {
        Ok(self.data.get(key).cloned())
    }

    async fn list_keys(&self, prefix: &str) -> ConfigResult<Vec<String>> {
        Ok(self
            .data
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigProviderExt;

    #[tokio::test]
    async fn test_memory_provider_typed() {
        let provider = MemoryConfigProvider::new()
            .with("runner.max_concurrency", 4)
            .with("endpoints.openai", "http://proxy.local");

        let concurrency: Option<usize> = provider.get("runner.max_concurrency").await.unwrap();
        assert_eq!(concurrency, Some(4));
        assert_eq!(
            provider.get_string("endpoints.openai").await.unwrap().as_deref(),
            Some("http://proxy.local")
        );
        assert_eq!(provider.get_raw("runner.batch_delay_ms").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_typed_value() {
        let provider = MemoryConfigProvider::new().with("runner.max_concurrency", "lots");
        let err = provider
            .get::<usize>("runner.max_concurrency")
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Invalid value for runner.max_concurrency"));
    }

    #[tokio::test]
    async fn test_list_keys() {
        let provider: MemoryConfigProvider = [
            ("runner.max_concurrency".to_string(), "2".to_string()),
            ("runner.batch_delay_ms".to_string(), "0".to_string()),
            ("endpoints.google".to_string(), "x".to_string()),
        ]
        .into_iter()
        .collect();

        let mut keys = provider.list_keys("runner.").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["runner.batch_delay_ms", "runner.max_concurrency"]);
        assert_eq!(provider.len(), 3);
    }
}
