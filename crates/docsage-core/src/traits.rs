//! Provider abstractions.
//!
//! The rest of the system talks to LLM backends through these traits, so a
//! provider can be swapped without touching the agents or the retriever.

use async_trait::async_trait;

use crate::error::Result;

/// Sampling parameters for a single completion call.
#[derive(Debug, Clone)]
pub struct CompletionParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A chat-completion backend.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Run a single system + user exchange and return the assistant text.
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
        params: &CompletionParams,
    ) -> Result<String>;
}

/// A text-embedding backend.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts, preserving order.
    ///
    /// Providers that support batch endpoints should override this; the
    /// default issues one request per text.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }
}
