//! DocSage error types.

use thiserror::Error;

/// Errors produced across the DocSage crates.
#[derive(Debug, Error)]
pub enum DocsageError {
    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No API key available for the named provider.
    #[error("API key missing for provider '{0}'")]
    ApiKeyMissing(String),

    /// Transport-level HTTP failure (connect, timeout, malformed body).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The provider answered with an error payload.
    #[error("Provider error: {0}")]
    Provider(String),

    /// The retrieval index has not finished building.
    #[error("Retriever not initialized yet.")]
    NotReady,

    /// Knowledge base loading or indexing failure.
    #[error("Knowledge base error: {0}")]
    Knowledge(String),

    /// Tool discovery or invocation failure.
    #[error("Tool error: {0}")]
    Tool(String),
}

pub type Result<T> = std::result::Result<T, DocsageError>;
