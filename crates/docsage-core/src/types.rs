//! Wire types for the tool server protocol.
//!
//! These structs define the request/response bodies exchanged between the
//! manager agent and the tool server. They are the source of truth for the
//! JSON shapes on both sides.

use serde::{Deserialize, Serialize};

/// JSON Schema fragment describing a tool's input parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInputSchema {
    #[serde(rename = "type", default = "default_schema_type")]
    pub schema_type: String,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub required: Vec<String>,
}

fn default_schema_type() -> String {
    "object".into()
}

/// Specification of a single tool exposed by the tool server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Unique name of the tool.
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: ToolInputSchema,
}

/// Response body for `GET /tools`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolListResponse {
    pub tools: Vec<ToolSpec>,
}

/// Request body for `POST /tools/document_retriever`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocationRequest {
    /// The search query to run against the knowledge base.
    pub query: String,
}

/// A single retrieved snippet with source metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedSnippet {
    /// The content of the retrieved chunk.
    pub text: String,
    /// Source file name (e.g. "q3_model_performance.md").
    pub source: String,
    /// Section heading within the source document.
    pub section: String,
    /// Relevance in [0.0, 1.0], higher is more relevant, 4 decimal places.
    pub relevance_score: f32,
}

/// Response body for `POST /tools/document_retriever`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocationResponse {
    #[serde(default = "default_tool_name")]
    pub tool_name: String,
    #[serde(default)]
    pub results: Vec<RetrievedSnippet>,
}

fn default_tool_name() -> String {
    "document_retriever".into()
}
