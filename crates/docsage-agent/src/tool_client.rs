//! HTTP client for the tool server.

use std::time::{Duration, Instant};

use docsage_core::error::{DocsageError, Result};
use docsage_core::types::{
    RetrievedSnippet, ToolInvocationRequest, ToolInvocationResponse, ToolListResponse, ToolSpec,
};

/// Client side of the tool server protocol: tool discovery plus
/// document_retriever invocation.
pub struct ToolServerClient {
    base_url: String,
    client: reqwest::Client,
}

impl ToolServerClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DocsageError::Http(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List the tools the server exposes. Also serves as the connectivity
    /// check at chat startup.
    pub async fn discover(&self) -> Result<Vec<ToolSpec>> {
        let url = format!("{}/tools", self.base_url);
        tracing::info!("Discovering tools: GET {}", url);

        let resp = self.client.get(&url).send().await.map_err(|e| {
            DocsageError::Http(format!(
                "Cannot connect to tool server at {}: {e}",
                self.base_url
            ))
        })?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(DocsageError::Tool(format!(
                "Tool discovery failed ({status}): {text}"
            )));
        }

        let data: ToolListResponse = resp
            .json()
            .await
            .map_err(|e| DocsageError::Http(e.to_string()))?;
        let names: Vec<&str> = data.tools.iter().map(|t| t.name.as_str()).collect();
        tracing::info!("Discovered {} tool(s): {:?}", data.tools.len(), names);
        Ok(data.tools)
    }

    /// Invoke the document_retriever tool with a search query.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedSnippet>> {
        let url = format!("{}/tools/document_retriever", self.base_url);
        tracing::info!(
            "Invoking tool: POST {} (query='{}')",
            url,
            crate::safe_truncate(query, 80)
        );

        let started = Instant::now();
        let resp = self
            .client
            .post(&url)
            .json(&ToolInvocationRequest {
                query: query.to_string(),
            })
            .send()
            .await
            .map_err(|e| {
                DocsageError::Http(format!(
                    "Cannot connect to tool server at {}: {e}",
                    self.base_url
                ))
            })?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(DocsageError::Tool(format!(
                "document_retriever failed ({status}): {text}"
            )));
        }

        let data: ToolInvocationResponse = resp
            .json()
            .await
            .map_err(|e| DocsageError::Http(e.to_string()))?;
        tracing::info!(
            "Tool call completed in {:.1} ms with {} snippet(s)",
            started.elapsed().as_secs_f64() * 1000.0,
            data.results.len()
        );
        for (i, snippet) in data.results.iter().enumerate() {
            tracing::info!(
                "  Snippet {}: [{} / {}] (score={:.4})",
                i + 1,
                snippet.source,
                snippet.section,
                snippet.relevance_score
            );
        }
        Ok(data.results)
    }
}
