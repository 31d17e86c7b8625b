//! DocSage configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsageConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for DocsageConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            retrieval: RetrievalConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl DocsageConfig {
    /// Load config from `$DOCSAGE_CONFIG` if set, else the default path
    /// (~/.docsage/config.toml). A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = match std::env::var("DOCSAGE_CONFIG") {
            Ok(p) if !p.is_empty() => PathBuf::from(p),
            _ => Self::default_path(),
        };
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::DocsageError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| crate::error::DocsageError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".docsage")
            .join("config.toml")
    }
}

/// LLM backend configuration (OpenAI-compatible API).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String { "https://api.openai.com/v1".into() }
fn default_api_key() -> String { String::new() }
fn default_model() -> String { "gpt-4o-mini".into() }
fn default_embedding_model() -> String { "text-embedding-3-small".into() }
fn default_timeout_secs() -> u64 { 30 }

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: default_api_key(),
            model: default_model(),
            embedding_model: default_embedding_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmConfig {
    /// API key from the config file, falling back to `OPENAI_API_KEY`.
    pub fn resolved_api_key(&self) -> Option<String> {
        if !self.api_key.is_empty() {
            return Some(self.api_key.clone());
        }
        std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty())
    }

    /// Whether the configured endpoint rejects unauthenticated requests.
    /// Local backends (Ollama, LM Studio) do not need a key.
    pub fn requires_api_key(&self) -> bool {
        self.endpoint.contains("api.openai.com")
    }
}

/// Knowledge base and retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_knowledge_dir")]
    pub knowledge_dir: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_knowledge_dir() -> String { "knowledge_base".into() }
fn default_top_k() -> usize { 3 }

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            knowledge_dir: default_knowledge_dir(),
            top_k: default_top_k(),
        }
    }
}

impl RetrievalConfig {
    /// Knowledge dir with `~` expanded.
    pub fn resolved_knowledge_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.knowledge_dir).to_string())
    }
}

/// Tool server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8000 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Base URL agents use to reach the tool server.
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}
