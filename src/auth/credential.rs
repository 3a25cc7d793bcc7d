//! Per-caller credential overrides.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::models::ProviderKind;

/// Provider → secret lookup supplied with a single run.
///
/// Entries shadow the process defaults held by
/// [`CredentialResolver`](super::CredentialResolver). Empty secrets are never
/// stored, so an empty string behaves the same as an absent key.
#[derive(Clone, Debug, Default)]
pub struct CredentialMap {
    keys: HashMap<ProviderKind, SecretString>,
}

impl CredentialMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, provider: ProviderKind, key: impl Into<String>) -> Self {
        self.insert(provider, key);
        self
    }

    pub fn insert(&mut self, provider: ProviderKind, key: impl Into<String>) {
        let key = key.into();
        if key.trim().is_empty() {
            self.keys.remove(&provider);
            return;
        }
        self.keys.insert(provider, SecretString::from(key));
    }

    pub fn get(&self, provider: ProviderKind) -> Option<&SecretString> {
        self.keys.get(&provider)
    }

    pub fn contains(&self, provider: ProviderKind) -> bool {
        self.keys.contains_key(&provider)
    }

    pub fn providers(&self) -> impl Iterator<Item = ProviderKind> + '_ {
        self.keys.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Builds overrides from key-store rows.
    ///
    /// Inactive rows, unknown providers and keys that are not base64-encoded
    /// UTF-8 are skipped. When a provider appears more than once the last
    /// active row wins.
    pub fn from_stored_keys<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a StoredKey>,
    {
        let mut map = Self::new();
        for row in rows {
            if !row.is_active {
                continue;
            }
            let provider = match row.provider.parse::<ProviderKind>() {
                Ok(provider) => provider,
                Err(e) => {
                    tracing::debug!(provider = %row.provider, error = %e, "skipping stored key");
                    continue;
                }
            };
            match row.decode() {
                Some(key) => map.insert(provider, key),
                None => {
                    tracing::debug!(%provider, "skipping undecodable stored key");
                }
            }
        }
        map
    }
}

impl FromIterator<(ProviderKind, String)> for CredentialMap {
    fn from_iter<T: IntoIterator<Item = (ProviderKind, String)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (provider, key) in iter {
            map.insert(provider, key);
        }
        map
    }
}

/// A row from the per-user key store.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredKey {
    pub provider: String,
    /// Base64 of the raw key bytes.
    pub encoded_key: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl StoredKey {
    pub fn new(provider: ProviderKind, key: &str) -> Self {
        Self {
            provider: provider.as_str().to_string(),
            encoded_key: STANDARD.encode(key.as_bytes()),
            is_active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    fn decode(&self) -> Option<String> {
        let bytes = STANDARD.decode(self.encoded_key.trim()).ok()?;
        String::from_utf8(bytes).ok()
    }
}

pub(crate) fn is_blank(secret: &SecretString) -> bool {
    secret.expose_secret().trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_is_absent() {
        let map = CredentialMap::new()
            .with(ProviderKind::OpenAi, "")
            .with(ProviderKind::Google, "g-key");
        assert!(!map.contains(ProviderKind::OpenAi));
        assert_eq!(map.get(ProviderKind::Google).unwrap().expose_secret(), "g-key");
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_blank_insert_clears_existing() {
        let mut map = CredentialMap::new().with(ProviderKind::Anthropic, "sk-ant");
        map.insert(ProviderKind::Anthropic, "  ");
        assert!(map.is_empty());
    }

    #[test]
    fn test_debug_redacts() {
        let map = CredentialMap::new().with(ProviderKind::OpenAi, "sk-very-secret");
        assert!(!format!("{map:?}").contains("sk-very-secret"));
    }

    #[test]
    fn test_from_stored_keys() {
        let rows = vec![
            StoredKey::new(ProviderKind::OpenAi, "sk-openai"),
            StoredKey::new(ProviderKind::Anthropic, "sk-ant").inactive(),
            StoredKey {
                provider: "google".into(),
                encoded_key: "%%% not base64 %%%".into(),
                is_active: true,
            },
            StoredKey {
                provider: "mistral".into(),
                encoded_key: STANDARD.encode("m-key"),
                is_active: true,
            },
        ];

        let map = CredentialMap::from_stored_keys(&rows);
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get(ProviderKind::OpenAi).unwrap().expose_secret(),
            "sk-openai"
        );
    }

    #[test]
    fn test_stored_key_json() {
        let row: StoredKey = serde_json::from_str(
            r#"{"provider":"anthropic","encodedKey":"c2stYW50LWtleQ==","isActive":true}"#,
        )
        .unwrap();
        let map = CredentialMap::from_stored_keys([&row]);
        assert_eq!(
            map.get(ProviderKind::Anthropic).unwrap().expose_secret(),
            "sk-ant-key"
        );
    }
}
