//! Runner configuration.
//!
//! Settings are read through [`ConfigProvider`]s, which can be stacked so
//! that, for example, environment variables override a JSON file:
//!
//! ```rust,no_run
//! use model_runner::config::{
//!     CompositeConfigProvider, EnvConfigProvider, FileConfigProvider, RunnerSettings,
//! };
//!
//! # async fn example() -> Result<(), model_runner::ConfigError> {
//! let source = CompositeConfigProvider::new()
//!     .provider(Box::new(EnvConfigProvider::prefixed("MODEL_RUNNER_")))
//!     .provider(Box::new(FileConfigProvider::new("runner.json")));
//! let settings = RunnerSettings::load(&source).await?;
//! # Ok(())
//! # }
//! ```

mod composite;
mod env;
mod file;
mod memory;
mod provider;
mod settings;

pub use composite::CompositeConfigProvider;
pub use env::EnvConfigProvider;
pub use file::FileConfigProvider;
pub use memory::MemoryConfigProvider;
pub use provider::{ConfigProvider, ConfigProviderExt};
pub use settings::RunnerSettings;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Config file is not a JSON object
    #[error("Malformed config file {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment error: {0}")]
    Env(#[from] std::env::VarError),
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::invalid("runner.batch_delay_ms", "expected an integer");
        assert_eq!(
            err.to_string(),
            "Invalid value for runner.batch_delay_ms: expected an integer"
        );
    }
}
