//! LLM provider backends for DocSage.
//!
//! One client covers every OpenAI-compatible API (OpenAI itself, Ollama,
//! LM Studio, vLLM, ...). Endpoints are distinguished only by base URL
//! and API key, both taken from [`DocsageConfig`].

use docsage_core::config::DocsageConfig;
use docsage_core::error::Result;
use docsage_core::traits::{ChatModel, Embedder};

pub mod openai_compatible;

pub use openai_compatible::OpenAiCompatibleClient;

/// Build the chat backend from config.
pub fn create_chat_model(config: &DocsageConfig) -> Result<Box<dyn ChatModel>> {
    Ok(Box::new(OpenAiCompatibleClient::from_config(config)?))
}

/// Build the embedding backend from config.
pub fn create_embedder(config: &DocsageConfig) -> Result<Box<dyn Embedder>> {
    Ok(Box::new(OpenAiCompatibleClient::from_config(config)?))
}
