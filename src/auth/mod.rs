//! Provider credentials.
//!
//! - [`CredentialMap`]: per-call overrides, usually a user's own keys
//! - [`CredentialResolver`]: process defaults, consulted when no override exists

mod credential;
mod resolver;

pub use credential::{CredentialMap, StoredKey};
pub use resolver::CredentialResolver;
