//! Provider adapter trait definition.

use std::fmt::Debug;

use async_trait::async_trait;
use secrecy::SecretString;

use super::config::GenerationConfig;
use crate::Result;
use crate::models::ProviderKind;
use crate::types::PromptResult;

/// One provider family's request/response translation.
///
/// Implementations perform exactly one HTTP call per `execute`, never retry,
/// and return a result whose `cost_estimate` is still zero.
#[async_trait]
pub trait ProviderAdapter: Send + Sync + Debug {
    fn provider(&self) -> ProviderKind;

    async fn execute(
        &self,
        prompt: &str,
        wire_id: &str,
        config: &GenerationConfig,
        api_key: &SecretString,
    ) -> Result<PromptResult>;
}
