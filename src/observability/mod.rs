//! Structured tracing for runs, batches and provider calls.
//!
//! The crate only emits `tracing` spans and events; installing a subscriber
//! is left to the application. With the `subscriber` feature,
//! [`init_tracing`] installs a formatted stderr subscriber:
//!
//! ```toml
//! model-runner = { version = "0.1", features = ["subscriber"] }
//! ```

mod spans;

pub use spans::{ProviderCallSpan, RunSpans, record_run_outcome};

/// Installs a fmt subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter` (for example `"model_runner=debug"`).
#[cfg(feature = "subscriber")]
#[cfg_attr(docsrs, doc(cfg(feature = "subscriber")))]
pub fn init_tracing(default_filter: &str) -> crate::Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .try_init()
        .map_err(|e| crate::Error::Config(format!("Failed to install tracing subscriber: {}", e)))
}
