//! JSON file configuration provider.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tokio::sync::OnceCell;

use super::provider::ConfigProvider;
use super::{ConfigError, ConfigResult};

/// Reads a JSON object file once, on first access.
///
/// Keys resolve as dotted paths into nested objects, and a literal dotted key
/// at the top level (`{"runner.max_concurrency": 3}`) is accepted too. A
/// missing file is an empty source.
pub struct FileConfigProvider {
    path: PathBuf,
    data: OnceCell<Map<String, Value>>,
}

impl FileConfigProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn data(&self) -> ConfigResult<&Map<String, Value>> {
        self.data.get_or_try_init(|| self.load()).await
    }

    async fn load(&self) -> ConfigResult<Map<String, Value>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "config file not found");
                return Ok(Map::new());
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content).map_err(|source| ConfigError::Malformed {
            path: self.path.display().to_string(),
            source,
        })
    }
}

fn lookup<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    if let Some(value) = map.get(key) {
        return Some(value);
    }
    let mut parts = key.split('.');
    let mut current = map.get(parts.next()?)?;
    for part in parts {
        current = current.get(part)?;
    }
    Some(current)
}

fn flatten(prefix: &str, map: &Map<String, Value>, out: &mut Vec<String>) {
    for (name, value) in map {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };
        match value {
            Value::Object(inner) => flatten(&key, inner, out),
            _ => out.push(key),
        }
    }
}

#[async_trait::async_trait]
impl ConfigProvider for FileConfigProvider {
    fn name(&self) -> &str {
        "file"
    }

    async fn get_raw(&self, key: &str) -> ConfigResult<Option<String>> {
        let data = self.data().await?;
        Ok(match lookup(data, key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        })
    }

    async fn list_keys(&self, prefix: &str) -> ConfigResult<Vec<String>> {
        let mut keys = Vec::new();
        flatten("", self.data().await?, &mut keys);
        keys.retain(|k| k.starts_with(prefix));
        Ok(keys)
    }
}

impl std::fmt::Debug for FileConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfigProvider")
            .field("path", &self.path)
            .field("loaded", &self.data.initialized())
            .finish()
    }
}
