use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use super::builtin;
use super::provider::ProviderKind;
use super::spec::{ModelKey, ModelSpec};
use crate::budget::ModelPricing;
use crate::{Error, Result};

static REGISTRY: OnceLock<ModelRegistry> = OnceLock::new();

pub fn registry() -> &'static ModelRegistry {
    REGISTRY.get_or_init(ModelRegistry::builtins)
}

/// Read-only after construction; safe to share across tasks without locking.
#[derive(Debug, Default, Clone)]
pub struct ModelRegistry {
    models: BTreeMap<ModelKey, ModelSpec>,
    by_wire_id: HashMap<(ProviderKind, String), ModelKey>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtins() -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry);
        registry
    }

    pub fn register(&mut self, spec: ModelSpec) -> Result<()> {
        if self.models.contains_key(&spec.key) {
            return Err(Error::Config(format!(
                "Duplicate model key: {}",
                spec.key
            )));
        }

        let wire_key = (spec.provider, spec.wire_id.clone());
        if let Some(existing) = self.by_wire_id.get(&wire_key) {
            tracing::warn!(
                key = %spec.key,
                existing = %existing,
                wire_id = %spec.wire_id,
                "wire id already mapped; reverse lookup keeps the first entry"
            );
        } else {
            self.by_wire_id.insert(wire_key, spec.key.clone());
        }

        self.models.insert(spec.key.clone(), spec);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&ModelSpec> {
        self.models.get(key)
    }

    pub fn lookup(&self, key: &str) -> Result<&ModelSpec> {
        self.get(key).ok_or_else(|| Error::UnknownModel {
            key: key.to_string(),
        })
    }

    /// Resolves every key or fails on the first unknown one.
    pub fn validate_keys<S: AsRef<str>>(&self, keys: &[S]) -> Result<Vec<&ModelSpec>> {
        keys.iter().map(|key| self.lookup(key.as_ref())).collect()
    }

    pub fn for_wire_id(&self, provider: ProviderKind, wire_id: &str) -> Option<&ModelSpec> {
        let key = self.by_wire_id.get(&(provider, wire_id.to_string()))?;
        self.models.get(key)
    }

    /// Pricing for a wire id, degrading to the provider's default model.
    pub fn pricing_for(&self, provider: ProviderKind, wire_id: &str) -> ModelPricing {
        if let Some(spec) = self.for_wire_id(provider, wire_id) {
            return spec.pricing;
        }

        match self.get(provider.default_model_key()) {
            Some(fallback) => {
                tracing::warn!(
                    %provider,
                    wire_id,
                    fallback = %fallback.key,
                    "pricing resolved via provider default"
                );
                fallback.pricing
            }
            None => {
                tracing::warn!(%provider, wire_id, "no pricing available; estimating zero cost");
                ModelPricing::FREE
            }
        }
    }

    pub fn for_provider(&self, provider: ProviderKind) -> impl Iterator<Item = &ModelSpec> {
        self.models.values().filter(move |spec| spec.provider == provider)
    }

    pub fn all(&self) -> impl Iterator<Item = &ModelSpec> {
        self.models.values()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_catalog() {
        let registry = ModelRegistry::builtins();
        assert_eq!(registry.len(), 7);

        let sonnet = registry.lookup("claude-3-5-sonnet").unwrap();
        assert_eq!(sonnet.wire_id, "claude-3-5-sonnet-20241022");
        assert_eq!(sonnet.provider, ProviderKind::Anthropic);
        assert_eq!(sonnet.context_window(), 200_000);

        let haiku = registry.lookup("claude-3-5-haiku").unwrap();
        assert!(!haiku.supports_images());
    }

    #[test]
    fn test_lookup_unknown() {
        let err = ModelRegistry::builtins()
            .lookup("unknown-model-x")
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown model: unknown-model-x");
        assert!(err.is_validation());
    }

    #[test]
    fn test_validate_keys_fails_on_first_unknown() {
        let registry = ModelRegistry::builtins();
        let err = registry
            .validate_keys(&["gpt-4o-mini", "nope-1", "nope-2"])
            .unwrap_err();
        assert!(err.to_string().contains("nope-1"));

        let specs = registry
            .validate_keys(&["gemini-flash", "gpt-4o"])
            .unwrap();
        assert_eq!(specs[0].key, "gemini-flash");
        assert_eq!(specs[1].key, "gpt-4o");
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut registry = ModelRegistry::builtins();
        let dup = ModelSpec::new("gpt-4o", "Dup", "gpt-4o-dup", ProviderKind::OpenAi);
        assert!(registry.register(dup).is_err());
    }

    #[test]
    fn test_reverse_lookup_is_namespaced() {
        let registry = ModelRegistry::builtins();
        assert_eq!(
            registry
                .for_wire_id(ProviderKind::Google, "gemini-1.5-flash")
                .map(|s| s.key.as_str()),
            Some("gemini-flash")
        );
        assert!(
            registry
                .for_wire_id(ProviderKind::OpenAi, "gemini-1.5-flash")
                .is_none()
        );
    }

    #[test]
    fn test_pricing_falls_back_to_provider_default() {
        let registry = ModelRegistry::builtins();
        let fallback = registry.pricing_for(ProviderKind::Anthropic, "claude-unknown");
        assert_eq!(fallback, registry.lookup("claude-3-5-sonnet").unwrap().pricing);

        let empty = ModelRegistry::new();
        assert_eq!(
            empty.pricing_for(ProviderKind::OpenAi, "gpt-4o"),
            ModelPricing::FREE
        );
    }

    #[test]
    fn test_for_provider() {
        let registry = registry();
        assert_eq!(registry.for_provider(ProviderKind::OpenAi).count(), 3);
        assert_eq!(registry.for_provider(ProviderKind::Google).count(), 2);
    }
}
