// file: src/llm/mod.rs
// description: language model access for question generation
// reference: internal module structure

pub mod client;
pub mod prompt;
pub mod response;

pub use client::ChatCompletionClient;
pub use prompt::{PromptOptions, SYSTEM_PROMPT, build_prompt};
pub use response::parse_questions;

use crate::error::Result;
use std::future::Future;

/// Anything that turns a system and user prompt into model text.
pub trait CompletionBackend: Send + Sync {
    fn complete(&self, system: &str, user: &str) -> impl Future<Output = Result<String>> + Send;
}
