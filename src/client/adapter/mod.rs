//! Provider adapters, one per provider family.

mod anthropic;
mod base;
mod config;
mod google;
mod openai;
mod traits;

use std::sync::Arc;

pub use anthropic::AnthropicAdapter;
pub use config::{
    ANTHROPIC_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, Endpoints, GOOGLE_BASE_URL,
    GenerationConfig, OPENAI_BASE_URL,
};
pub use google::GoogleAdapter;
pub use openai::OpenAiAdapter;
pub use traits::ProviderAdapter;

use crate::models::ProviderKind;

/// Closed provider → adapter table.
///
/// There is exactly one adapter per [`ProviderKind`], so dispatch is a plain
/// `match` and adding a provider is a compile error until it is wired here.
#[derive(Clone, Debug)]
pub struct AdapterSet {
    openai: Arc<dyn ProviderAdapter>,
    anthropic: Arc<dyn ProviderAdapter>,
    google: Arc<dyn ProviderAdapter>,
}

impl AdapterSet {
    /// HTTP adapters sharing one connection pool.
    pub fn http(http: reqwest::Client, endpoints: &Endpoints) -> Self {
        Self {
            openai: Arc::new(OpenAiAdapter::new(http.clone()).with_base_url(&endpoints.openai)),
            anthropic: Arc::new(
                AnthropicAdapter::new(http.clone()).with_base_url(&endpoints.anthropic),
            ),
            google: Arc::new(GoogleAdapter::new(http).with_base_url(&endpoints.google)),
        }
    }

    /// Explicit adapters, typically test doubles.
    pub fn new(
        openai: Arc<dyn ProviderAdapter>,
        anthropic: Arc<dyn ProviderAdapter>,
        google: Arc<dyn ProviderAdapter>,
    ) -> Self {
        Self {
            openai,
            anthropic,
            google,
        }
    }

    pub fn get(&self, provider: ProviderKind) -> &Arc<dyn ProviderAdapter> {
        match provider {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Anthropic => &self.anthropic,
            ProviderKind::Google => &self.google,
        }
    }

    pub fn replace(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        match adapter.provider() {
            ProviderKind::OpenAi => self.openai = adapter,
            ProviderKind::Anthropic => self.anthropic = adapter,
            ProviderKind::Google => self.google = adapter,
        }
        self
    }
}

impl Default for AdapterSet {
    fn default() -> Self {
        Self::http(reqwest::Client::new(), &Endpoints::default())
    }
}
