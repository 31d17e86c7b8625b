//! Unified OpenAI-compatible client.
//!
//! One struct handles chat completions and embeddings for all
//! OpenAI-compatible APIs. Local backends (Ollama, LM Studio) work with an
//! empty API key; the Authorization header is simply omitted.

use std::time::Duration;

use async_trait::async_trait;
use docsage_core::config::DocsageConfig;
use docsage_core::error::{DocsageError, Result};
use docsage_core::traits::{ChatModel, CompletionParams, Embedder};
use serde_json::{Value, json};

/// Client for any OpenAI-compatible API.
pub struct OpenAiCompatibleClient {
    /// Base URL without trailing slash (e.g., "https://api.openai.com/v1").
    base_url: String,
    /// API key. Empty means unauthenticated (local backends).
    api_key: String,
    /// Whether the endpoint rejects unauthenticated requests.
    requires_key: bool,
    /// Model for embeddings requests.
    embedding_model: String,
    /// HTTP client.
    client: reqwest::Client,
}

impl OpenAiCompatibleClient {
    pub fn from_config(config: &DocsageConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.llm.timeout_secs))
            .build()
            .map_err(|e| DocsageError::Http(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: config.llm.endpoint.trim_end_matches('/').to_string(),
            api_key: config.llm.resolved_api_key().unwrap_or_default(),
            requires_key: config.llm.requires_api_key(),
            embedding_model: config.llm.embedding_model.clone(),
            client,
        })
    }

    /// Attach the auth header when a key is configured.
    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.api_key.is_empty() {
            req
        } else {
            req.header("Authorization", format!("Bearer {}", self.api_key))
        }
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        if self.requires_key && self.api_key.is_empty() {
            return Err(DocsageError::ApiKeyMissing("openai".into()));
        }

        tracing::debug!("POST {url}");
        let req = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body);
        let resp = self
            .apply_auth(req)
            .send()
            .await
            .map_err(|e| DocsageError::Http(format!("connection failed ({url}): {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            tracing::warn!("API error {} from {}", status, url);
            return Err(DocsageError::Provider(format!(
                "API error {status}: {text}"
            )));
        }

        resp.json()
            .await
            .map_err(|e| DocsageError::Http(e.to_string()))
    }

    async fn request_embeddings(&self, input: Value) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.base_url);
        tracing::debug!("Embeddings request (model={})", self.embedding_model);
        let body = json!({
            "model": self.embedding_model,
            "input": input,
        });
        let json = self.post_json(&url, &body).await?;
        parse_embeddings(&json)
    }
}

#[async_trait]
impl ChatModel for OpenAiCompatibleClient {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
        params: &CompletionParams,
    ) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(
            "Chat completion request (model={}, temperature={})",
            params.model,
            params.temperature
        );
        let body = json!({
            "model": params.model,
            "temperature": params.temperature,
            "max_tokens": params.max_tokens,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_message },
            ],
        });
        let json = self.post_json(&url, &body).await?;
        parse_chat_content(&json)
    }
}

#[async_trait]
impl Embedder for OpenAiCompatibleClient {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.request_embeddings(json!([text])).await?;
        embeddings
            .pop()
            .ok_or_else(|| DocsageError::Provider("No embedding in response".into()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let embeddings = self.request_embeddings(json!(texts)).await?;
        if embeddings.len() != texts.len() {
            return Err(DocsageError::Provider(format!(
                "Embedding count mismatch: sent {} texts, got {} embeddings",
                texts.len(),
                embeddings.len()
            )));
        }
        Ok(embeddings)
    }
}

/// Pull the assistant text out of a chat completion response.
fn parse_chat_content(json: &Value) -> Result<String> {
    let choice = json["choices"]
        .get(0)
        .ok_or_else(|| DocsageError::Provider("No choices in response".into()))?;
    let content = choice["message"]["content"]
        .as_str()
        .ok_or_else(|| DocsageError::Provider("No content in response".into()))?;
    Ok(content.to_string())
}

/// Pull the vectors out of an embeddings response, in input order.
fn parse_embeddings(json: &Value) -> Result<Vec<Vec<f32>>> {
    let data = json["data"]
        .as_array()
        .ok_or_else(|| DocsageError::Provider("No data in embeddings response".into()))?;
    let mut embeddings = Vec::with_capacity(data.len());
    for item in data {
        let values = item["embedding"]
            .as_array()
            .ok_or_else(|| DocsageError::Provider("No embedding in response item".into()))?;
        embeddings.push(
            values
                .iter()
                .filter_map(|v| v.as_f64())
                .map(|v| v as f32)
                .collect(),
        );
    }
    Ok(embeddings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_content() {
        let json = json!({
            "choices": [
                { "message": { "role": "assistant", "content": "Hello there" } }
            ]
        });
        assert_eq!(parse_chat_content(&json).unwrap(), "Hello there");
    }

    #[test]
    fn test_parse_chat_content_no_choices() {
        let json = json!({ "choices": [] });
        let err = parse_chat_content(&json).unwrap_err();
        assert!(err.to_string().contains("No choices"));
    }

    #[test]
    fn test_parse_chat_content_missing_content() {
        let json = json!({
            "choices": [ { "message": { "role": "assistant" } } ]
        });
        let err = parse_chat_content(&json).unwrap_err();
        assert!(err.to_string().contains("No content"));
    }

    #[test]
    fn test_parse_embeddings() {
        let json = json!({
            "data": [
                { "embedding": [0.1, 0.2] },
                { "embedding": [0.3, 0.4] },
            ]
        });
        let embeddings = parse_embeddings(&json).unwrap();
        assert_eq!(embeddings.len(), 2);
        assert!((embeddings[1][0] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_parse_embeddings_missing_data() {
        let json = json!({ "error": "bad request" });
        assert!(parse_embeddings(&json).is_err());
    }

    fn keyless_client(base_url: &str, requires_key: bool) -> OpenAiCompatibleClient {
        OpenAiCompatibleClient {
            base_url: base_url.to_string(),
            api_key: String::new(),
            requires_key,
            embedding_model: "text-embedding-3-small".to_string(),
            client: reqwest::Client::new(),
        }
    }

    #[tokio::test]
    async fn test_missing_key_rejected_before_sending() {
        let client = keyless_client("https://api.openai.com/v1", true);
        let params = CompletionParams {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            max_tokens: 16,
        };
        let err = client.complete("system", "hi", &params).await.unwrap_err();
        assert!(matches!(err, DocsageError::ApiKeyMissing(_)));

        let err = client.embed("hi").await.unwrap_err();
        assert!(matches!(err, DocsageError::ApiKeyMissing(_)));
    }

    #[tokio::test]
    async fn test_local_endpoint_allows_empty_key() {
        // Unreachable port: a transport error means the request got past
        // the key check.
        let client = keyless_client("http://127.0.0.1:9/v1", false);
        let err = client.embed("hi").await.unwrap_err();
        assert!(matches!(err, DocsageError::Http(_)));
    }
}
