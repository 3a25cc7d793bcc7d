use super::provider::ProviderKind;
use super::registry::ModelRegistry;
use super::spec::ModelSpec;

pub fn register_all(registry: &mut ModelRegistry) {
    for spec in openai().into_iter().chain(anthropic()).chain(google()) {
        // Keys below are distinct; a collision here is a catalog bug.
        if let Err(e) = registry.register(spec) {
            tracing::error!(error = %e, "builtin model rejected");
        }
    }
}

fn openai() -> Vec<ModelSpec> {
    vec![
        ModelSpec::new("gpt-4o", "GPT-4o", "gpt-4o", ProviderKind::OpenAi)
            .with_context_window(128_000)
            .with_pricing(2.5, 10.0)
            .with_vision(true),
        ModelSpec::new("gpt-4o-mini", "GPT-4o Mini", "gpt-4o-mini", ProviderKind::OpenAi)
            .with_context_window(128_000)
            .with_pricing(0.15, 0.6)
            .with_vision(true),
        ModelSpec::new("gpt-4-turbo", "GPT-4 Turbo", "gpt-4-turbo", ProviderKind::OpenAi)
            .with_context_window(128_000)
            .with_pricing(10.0, 30.0)
            .with_vision(true),
    ]
}

fn anthropic() -> Vec<ModelSpec> {
    vec![
        ModelSpec::new(
            "claude-3-5-sonnet",
            "Claude 3.5 Sonnet",
            "claude-3-5-sonnet-20241022",
            ProviderKind::Anthropic,
        )
        .with_context_window(200_000)
        .with_pricing(3.0, 15.0)
        .with_vision(true),
        ModelSpec::new(
            "claude-3-5-haiku",
            "Claude 3.5 Haiku",
            "claude-3-5-haiku-20241022",
            ProviderKind::Anthropic,
        )
        .with_context_window(200_000)
        .with_pricing(0.8, 4.0)
        .with_vision(false),
    ]
}

fn google() -> Vec<ModelSpec> {
    vec![
        ModelSpec::new(
            "gemini-pro",
            "Gemini 1.5 Pro",
            "gemini-1.5-pro",
            ProviderKind::Google,
        )
        .with_context_window(2_000_000)
        .with_pricing(1.25, 5.0)
        .with_vision(true),
        ModelSpec::new(
            "gemini-flash",
            "Gemini 1.5 Flash",
            "gemini-1.5-flash",
            ProviderKind::Google,
        )
        .with_context_window(1_000_000)
        .with_pricing(0.075, 0.3)
        .with_vision(true),
    ]
}
