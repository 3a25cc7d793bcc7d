mod builtin;
mod provider;
mod registry;
mod spec;

pub use provider::ProviderKind;
pub use registry::{ModelRegistry, registry};
pub use spec::{Capabilities, ModelKey, ModelSpec};
