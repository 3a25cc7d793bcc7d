//! HTTP layer: provider adapters and the shared `reqwest` client.

pub mod adapter;
mod error;

use std::time::Duration;

pub use adapter::{
    AdapterSet, AnthropicAdapter, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, Endpoints,
    GenerationConfig, GoogleAdapter, OpenAiAdapter, ProviderAdapter,
};

use crate::{Error, Result};

/// Builds the client shared by all adapters.
///
/// No timeout unless one is given; a hung provider holds its batch open
/// until the transport gives up.
pub fn http_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(Error::Network)
}
