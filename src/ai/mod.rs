//! One-word answers from an external text-generation service.
//!
//! The service is reached through [`TextGenerator`], so the delegate can be
//! driven by the Gemini client in production and by a stub in tests.

pub mod gemini;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::error::BfhlError;
use crate::normalize::normalize_answer;

/// Failure reported by a [`TextGenerator`]. Never shown to API callers.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Response contained no text")]
    EmptyResponse,
}

/// Sampling knobs passed with every prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_output_tokens: 20,
            temperature: 0.1,
        }
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, ProviderError>;
}

#[derive(Clone)]
pub struct AiDelegate {
    generator: Arc<dyn TextGenerator>,
    options: GenerationOptions,
}

impl AiDelegate {
    pub fn new(generator: Arc<dyn TextGenerator>, options: GenerationOptions) -> Self {
        Self { generator, options }
    }

    /// Asks the generator once and returns the first word of its answer.
    pub async fn answer(&self, question: &str) -> Result<String, BfhlError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(BfhlError::invalid_argument(
                "AI input must be a non-empty string",
            ));
        }

        let raw = self
            .generator
            .generate(&build_prompt(question), &self.options)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "text generation failed");
                BfhlError::AiRequestFailed
            })?;

        normalize_answer(&raw).map_err(|_| {
            tracing::error!(raw_len = raw.len(), "text generation returned no usable word");
            BfhlError::AiRequestFailed
        })
    }
}

pub fn build_prompt(question: &str) -> String {
    format!(
        "Answer the following question with exactly one word. \
         Do not add punctuation, formatting or explanation.\n\n\
         Question: {question}\n\nAnswer:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct StubGenerator {
        reply: Result<String, ()>,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl StubGenerator {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: Err(()),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(
            &self,
            prompt: &str,
            _options: &GenerationOptions,
        ) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .clone()
                .map_err(|_| ProviderError::NetworkError("connection refused".to_string()))
        }
    }

    fn delegate(stub: &Arc<StubGenerator>) -> AiDelegate {
        AiDelegate::new(stub.clone(), GenerationOptions::default())
    }

    #[tokio::test]
    async fn answers_with_normalized_word() {
        let stub = StubGenerator::replying("**Paris.**\n");
        let answer = delegate(&stub)
            .answer("  What is the capital of France?  ")
            .await
            .unwrap();

        assert_eq!(answer, "Paris");
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
        let prompts = stub.prompts.lock().unwrap();
        assert!(prompts[0].contains("Question: What is the capital of France?\n"));
        assert!(prompts[0].contains("exactly one word"));
    }

    #[tokio::test]
    async fn blank_question_is_invalid_and_skips_generator() {
        let stub = StubGenerator::replying("unused");
        let err = delegate(&stub).answer("   ").await.unwrap_err();

        assert!(matches!(err, BfhlError::InvalidArgument(_)));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn generator_failure_is_opaque_and_not_retried() {
        let stub = StubGenerator::failing();
        let err = delegate(&stub).answer("Why?").await.unwrap_err();

        assert_eq!(err, BfhlError::AiRequestFailed);
        assert_eq!(err.to_string(), "AI request failed");
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_answer_maps_to_request_failed() {
        let stub = StubGenerator::replying(" ** ");
        let err = delegate(&stub).answer("Why?").await.unwrap_err();

        assert_eq!(err, BfhlError::AiRequestFailed);
    }
}
