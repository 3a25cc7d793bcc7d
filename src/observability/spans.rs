//! Structured span definitions for tracing.

use std::time::Instant;

use tracing::{Level, Span, field, span};
use uuid::Uuid;

use crate::models::ProviderKind;
use crate::types::PromptResult;

/// Span factory for one `execute_model_runs` call.
///
/// Every span created here carries the same `run_id`, so the batches and
/// provider calls of concurrent runs can be told apart in the logs.
#[derive(Debug, Clone)]
pub struct RunSpans {
    run_id: Uuid,
}

impl Default for RunSpans {
    fn default() -> Self {
        Self::new()
    }
}

impl RunSpans {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn run_span(&self, models: usize) -> Span {
        span!(
            Level::INFO,
            "runner.execute",
            run_id = %self.run_id,
            models = models,
            succeeded = field::Empty,
            failed = field::Empty,
        )
    }

    pub fn batch_span(&self, index: usize, size: usize) -> Span {
        span!(
            Level::DEBUG,
            "batch",
            run_id = %self.run_id,
            batch = index,
            size = size,
        )
    }

    pub fn call_span(&self, provider: ProviderKind, model_key: &str) -> ProviderCallSpan {
        ProviderCallSpan::new(self.run_id, provider, model_key)
    }
}

/// Tracks one provider call and records its outcome on the span.
pub struct ProviderCallSpan {
    span: Span,
    start: Instant,
}

impl ProviderCallSpan {
    fn new(run_id: Uuid, provider: ProviderKind, model_key: &str) -> Self {
        let span = span!(
            Level::DEBUG,
            "provider.call",
            run_id = %run_id,
            provider = %provider,
            model = model_key,
            input_tokens = field::Empty,
            output_tokens = field::Empty,
            latency_ms = field::Empty,
            is_error = field::Empty,
        );
        Self {
            span,
            start: Instant::now(),
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn finish(self, result: &PromptResult) {
        let latency_ms = self.start.elapsed().as_millis() as u64;
        self.span.record("latency_ms", latency_ms);
        self.span.record("is_error", result.is_error());
        self.span.record("input_tokens", result.input_tokens);
        self.span.record("output_tokens", result.output_tokens);

        let _guard = self.span.enter();
        match &result.error {
            Some(error) => tracing::warn!(model = %result.model, error = %error, "provider call failed"),
            None => tracing::debug!(
                model = %result.model,
                duration_ms = result.duration_ms,
                tokens = result.tokens_used,
                "provider call completed"
            ),
        }
    }
}

/// Records the run outcome on a span created by [`RunSpans::run_span`].
pub fn record_run_outcome(span: &Span, results: &[PromptResult]) {
    let failed = results.iter().filter(|r| r.is_error()).count();
    span.record("succeeded", results.len() - failed);
    span.record("failed", failed);
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn test_run_id_is_stable() {
        let spans = RunSpans::new();
        let id = spans.run_id();
        let _run = spans.run_span(3);
        let _batch = spans.batch_span(0, 2);
        assert_eq!(spans.run_id(), id);
        assert_ne!(RunSpans::new().run_id(), id);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn test_call_span_finish_logs_failure() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let spans = RunSpans::new();
        tracing::subscriber::with_default(subscriber, || {
            let call = spans.call_span(ProviderKind::OpenAi, "gpt-4o");
            call.finish(&PromptResult::failure(ProviderKind::OpenAi, "gpt-4o", "boom"));
        });

        let output = captured.text();
        assert!(output.contains("provider call failed"));
        assert!(output.contains("boom"));
        assert!(output.contains(&spans.run_id().to_string()));
    }
}
