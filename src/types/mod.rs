//! Core result types shared by adapters and the runner.

mod response;
mod usage;

pub use response::{PromptResult, RunSummary};
pub use usage::Usage;
