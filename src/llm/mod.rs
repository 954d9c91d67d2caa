//! Hosted LLM access
//!
//! A thin client over the Anthropic, OpenAI and Ollama HTTP APIs. Prompts
//! are built by callers; this module only estimates their size, refuses
//! oversized input and returns the completion text.

pub mod client;

pub use client::LlmClient;

use thiserror::Error;

/// Characters per token used for size estimates
pub const CHARS_PER_TOKEN: usize = 4;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM API error: {0}")]
    ApiError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Input too large: ~{estimated} tokens exceeds the limit of {limit}")]
    InputTooLarge { estimated: usize, limit: usize },
}

pub type LlmResult<T> = Result<T, LlmError>;

/// Rough token count: one token per four characters
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / CHARS_PER_TOKEN
}

/// Fail with `InputTooLarge` when `text` is estimated above `limit` tokens
pub fn check_token_limit(text: &str, limit: usize) -> LlmResult<usize> {
    let estimated = estimate_tokens(text);
    if estimated > limit {
        return Err(LlmError::InputTooLarge { estimated, limit });
    }
    Ok(estimated)
}

/// Cut `text` to about `max_tokens` tokens, marking the cut with `...`
pub fn truncate_text(text: &str, max_tokens: usize) -> String {
    let max_chars = max_tokens * CHARS_PER_TOKEN;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}
