//! Normalized token counters.

use serde::{Deserialize, Serialize};

/// Token usage reported by a provider, normalized across wire schemas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Prompt-side tokens (`prompt_tokens`, `input_tokens`, `promptTokenCount`)
    pub input_tokens: u64,
    /// Generated tokens (`completion_tokens`, `output_tokens`, `candidatesTokenCount`)
    pub output_tokens: u64,
}

impl Usage {
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Total tokens (input + output)
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}
