//! API route handlers for the tool server.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;
use std::time::Instant;

use docsage_core::error::DocsageError;
use docsage_core::types::{
    ToolInputSchema, ToolInvocationRequest, ToolInvocationResponse, ToolListResponse, ToolSpec,
};

use super::server::AppState;

pub const RETRIEVER_TOOL_NAME: &str = "document_retriever";

/// Spec for the one tool this server exposes.
fn document_retriever_spec() -> ToolSpec {
    let mut properties = serde_json::Map::new();
    properties.insert(
        "query".to_string(),
        serde_json::json!({
            "type": "string",
            "description": "The search query to run against the knowledge base.",
        }),
    );
    ToolSpec {
        name: RETRIEVER_TOOL_NAME.to_string(),
        description: "Searches the internal knowledge base and returns relevant text \
                      snippets. Use this tool when you need factual information from \
                      internal documents such as performance reports, architecture docs, \
                      incident reports, roadmaps, and team structure."
            .to_string(),
        input_schema: ToolInputSchema {
            schema_type: "object".to_string(),
            properties,
            required: vec!["query".to_string()],
        },
    }
}

/// Error wrapper mapping domain errors to HTTP responses.
#[derive(Debug)]
pub struct ApiError(pub DocsageError);

impl From<DocsageError> for ApiError {
    fn from(e: DocsageError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            DocsageError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Health check endpoint.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "docsage-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Tool discovery endpoint.
pub async fn list_tools() -> Json<ToolListResponse> {
    tracing::info!("Listing available tools");
    Json(ToolListResponse {
        tools: vec![document_retriever_spec()],
    })
}

/// Run a retrieval query. 503 while the index is still building.
pub async fn invoke_document_retriever(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ToolInvocationRequest>,
) -> Result<Json<ToolInvocationResponse>, ApiError> {
    let guard = state.retriever.read().await;
    let retriever = guard.as_ref().ok_or(ApiError(DocsageError::NotReady))?;

    tracing::info!(
        "Tool invocation: {}(query='{}')",
        RETRIEVER_TOOL_NAME,
        safe_truncate(&request.query, 80)
    );
    let started = Instant::now();
    let results = retriever
        .query(&request.query, state.config.retrieval.top_k)
        .await?;
    tracing::info!(
        "{} returned {} snippet(s) in {:.1} ms",
        RETRIEVER_TOOL_NAME,
        results.len(),
        started.elapsed().as_secs_f64() * 1000.0
    );

    Ok(Json(ToolInvocationResponse {
        tool_name: RETRIEVER_TOOL_NAME.to_string(),
        results,
    }))
}

/// Truncate to a char boundary so log lines never split a multibyte char.
fn safe_truncate(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docsage_core::config::DocsageConfig;
    use docsage_core::error::Result;
    use docsage_core::traits::Embedder;
    use docsage_retriever::DocumentRetriever;
    use tempfile::TempDir;

    struct StubEmbedder;

    #[async_trait]
    impl Embedder for StubEmbedder {
        fn name(&self) -> &str {
            "stub"
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            if text.to_lowercase().contains("latency") {
                Ok(vec![1.0, 0.0])
            } else {
                Ok(vec![0.0, 1.0])
            }
        }
    }

    fn empty_state() -> Arc<AppState> {
        Arc::new(AppState {
            config: DocsageConfig::default(),
            retriever: Arc::new(tokio::sync::RwLock::new(None)),
        })
    }

    async fn ready_state() -> (Arc<AppState>, TempDir) {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("perf.md"),
            "# Performance\n\n## Latency\n\nThe p99 latency regression traces back to the August deploy.\n",
        )
        .unwrap();
        let retriever = DocumentRetriever::build(dir.path(), Box::new(StubEmbedder))
            .await
            .unwrap();
        let state = Arc::new(AppState {
            config: DocsageConfig::default(),
            retriever: Arc::new(tokio::sync::RwLock::new(Some(retriever))),
        });
        (state, dir)
    }

    #[tokio::test]
    async fn test_invoke_before_index_ready_is_503() {
        let state = empty_state();
        let result = invoke_document_retriever(
            State(state),
            Json(ToolInvocationRequest {
                query: "anything".into(),
            }),
        )
        .await;
        let err = match result {
            Err(e) => e,
            Ok(_) => panic!("expected an error before the index is built"),
        };
        assert!(matches!(err.0, DocsageError::NotReady));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_invoke_returns_scored_snippets() {
        let (state, _dir) = ready_state().await;
        let Json(response) = invoke_document_retriever(
            State(state),
            Json(ToolInvocationRequest {
                query: "latency issues".into(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.tool_name, RETRIEVER_TOOL_NAME);
        assert_eq!(response.results.len(), 1);
        let snippet = &response.results[0];
        assert_eq!(snippet.source, "perf.md");
        assert_eq!(snippet.section, "Latency");
        assert!(snippet.relevance_score >= 0.0 && snippet.relevance_score <= 1.0);
    }

    #[tokio::test]
    async fn test_list_tools_exposes_retriever() {
        let Json(response) = list_tools().await;
        assert_eq!(response.tools.len(), 1);
        let tool = &response.tools[0];
        assert_eq!(tool.name, RETRIEVER_TOOL_NAME);
        assert_eq!(tool.input_schema.schema_type, "object");
        assert_eq!(tool.input_schema.required, vec!["query".to_string()]);
        assert!(tool.input_schema.properties.contains_key("query"));
    }

    #[tokio::test]
    async fn test_health_check() {
        let Json(body) = health_check().await;
        assert_eq!(body["status"], "ok");
    }

    #[test]
    fn test_safe_truncate() {
        assert_eq!(safe_truncate("short", 80), "short");
        assert_eq!(safe_truncate("abcdef", 4), "abcd");
        assert_eq!(safe_truncate("áéíóú", 3), "á");
    }
}
