//! Override-then-default credential resolution.

use std::collections::HashMap;

use secrecy::SecretString;

use super::credential::{CredentialMap, is_blank};
use crate::models::ProviderKind;

/// Process-wide default keys, layered under per-call [`CredentialMap`]s.
///
/// Built once at start-up and shared read-only across runs. Each provider
/// resolves independently: an override for one provider never hides the
/// default of another.
#[derive(Clone, Debug, Default)]
pub struct CredentialResolver {
    defaults: HashMap<ProviderKind, SecretString>,
}

impl CredentialResolver {
    /// Resolver with no defaults; only overrides are used.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `OPENAI_API_KEY`, `ANTHROPIC_API_KEY` and `GOOGLE_API_KEY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds defaults by looking up each provider's environment variable
    /// name through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut resolver = Self::new();
        for provider in ProviderKind::ALL {
            if let Some(key) = lookup(provider.api_key_env()) {
                resolver = resolver.with_default(provider, key);
            }
        }
        tracing::debug!(
            providers = ?resolver.defaults.keys().collect::<Vec<_>>(),
            "default credentials loaded"
        );
        resolver
    }

    pub fn with_default(mut self, provider: ProviderKind, key: impl Into<String>) -> Self {
        let key = key.into();
        if key.trim().is_empty() {
            self.defaults.remove(&provider);
        } else {
            self.defaults.insert(provider, SecretString::from(key));
        }
        self
    }

    pub fn has_default(&self, provider: ProviderKind) -> bool {
        self.defaults.contains_key(&provider)
    }

    /// Override from `overrides` if present and non-empty, else the default.
    pub fn resolve(
        &self,
        provider: ProviderKind,
        overrides: &CredentialMap,
    ) -> Option<SecretString> {
        if let Some(key) = overrides.get(provider).filter(|key| !is_blank(key)) {
            tracing::trace!(%provider, source = "override", "credential resolved");
            return Some(key.clone());
        }
        let key = self.defaults.get(&provider).filter(|key| !is_blank(key))?;
        tracing::trace!(%provider, source = "default", "credential resolved");
        Some(key.clone())
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> CredentialResolver {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CredentialResolver::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_override_wins() {
        let resolver = CredentialResolver::new().with_default(ProviderKind::OpenAi, "server-key");
        let overrides = CredentialMap::new().with(ProviderKind::OpenAi, "user-key");

        let key = resolver.resolve(ProviderKind::OpenAi, &overrides).unwrap();
        assert_eq!(key.expose_secret(), "user-key");
    }

    #[test]
    fn test_falls_back_per_provider() {
        let resolver = env(&[("OPENAI_API_KEY", "server-openai"), ("GOOGLE_API_KEY", "server-google")]);
        let overrides = CredentialMap::new().with(ProviderKind::Google, "user-google");

        assert_eq!(
            resolver
                .resolve(ProviderKind::OpenAi, &overrides)
                .unwrap()
                .expose_secret(),
            "server-openai"
        );
        assert_eq!(
            resolver
                .resolve(ProviderKind::Google, &overrides)
                .unwrap()
                .expose_secret(),
            "user-google"
        );
        assert!(resolver.resolve(ProviderKind::Anthropic, &overrides).is_none());
    }

    #[test]
    fn test_empty_env_value_is_absent() {
        let resolver = env(&[("ANTHROPIC_API_KEY", "")]);
        assert!(!resolver.has_default(ProviderKind::Anthropic));
        assert!(
            resolver
                .resolve(ProviderKind::Anthropic, &CredentialMap::new())
                .is_none()
        );
    }
}
