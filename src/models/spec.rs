use serde::{Deserialize, Serialize};

use super::provider::ProviderKind;
use crate::budget::ModelPricing;

pub type ModelKey = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Stable internal name, e.g. `gpt-4o-mini`.
    pub key: ModelKey,
    pub name: String,
    /// Identifier sent to the provider; may differ from `key`.
    pub wire_id: String,
    pub provider: ProviderKind,
    pub capabilities: Capabilities,
    pub pricing: ModelPricing,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Capabilities {
    pub context_window: u64,
    pub vision: bool,
}

impl ModelSpec {
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        wire_id: impl Into<String>,
        provider: ProviderKind,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            wire_id: wire_id.into(),
            provider,
            capabilities: Capabilities {
                context_window: 0,
                vision: false,
            },
            pricing: ModelPricing::FREE,
        }
    }

    pub fn with_context_window(mut self, tokens: u64) -> Self {
        self.capabilities.context_window = tokens;
        self
    }

    pub fn with_vision(mut self, vision: bool) -> Self {
        self.capabilities.vision = vision;
        self
    }

    pub fn with_pricing(mut self, input_per_1k: f64, output_per_1k: f64) -> Self {
        self.pricing = ModelPricing::new(input_per_1k, output_per_1k);
        self
    }

    pub fn supports_images(&self) -> bool {
        self.capabilities.vision
    }

    pub fn context_window(&self) -> u64 {
        self.capabilities.context_window
    }
}
