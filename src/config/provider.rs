//! Configuration provider trait.

use serde::de::DeserializeOwned;

use super::{ConfigError, ConfigResult};

/// Read-only source of dotted configuration keys such as
/// `runner.max_concurrency`.
#[async_trait::async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &str;

    /// Raw string value, or `None` when this source does not define the key.
    async fn get_raw(&self, key: &str) -> ConfigResult<Option<String>>;

    /// Keys this source defines under `prefix`.
    async fn list_keys(&self, prefix: &str) -> ConfigResult<Vec<String>>;
}

/// Typed access on top of [`ConfigProvider::get_raw`].
pub trait ConfigProviderExt: ConfigProvider {
    /// Value parsed as JSON, so `"3"` reads as a number and `"true"` as a
    /// bool. Unparseable values are [`ConfigError::InvalidValue`].
    fn get<T: DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = ConfigResult<Option<T>>> + Send
    where
        Self: Sync,
    {
        async move {
            let Some(raw) = self.get_raw(key).await? else {
                return Ok(None);
            };
            serde_json::from_str(raw.trim())
                .map(Some)
                .map_err(|e| ConfigError::invalid(key, e.to_string()))
        }
    }

    /// Raw value with surrounding whitespace removed; blank counts as unset.
    fn get_string(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = ConfigResult<Option<String>>> + Send
    where
        Self: Sync,
    {
        async move {
            Ok(self
                .get_raw(key)
                .await?
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty()))
        }
    }
}

impl<P: ConfigProvider + ?Sized> ConfigProviderExt for P {}
