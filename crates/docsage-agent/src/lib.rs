//! Manager and Specialist agents for DocSage.
//!
//! The Manager is the orchestrator: it classifies each question with a
//! deterministic LLM call, fetches context from the tool server when the
//! question needs internal documents, and hands retrieval results to the
//! Specialist for synthesis. The Manager never answers a knowledge
//! question itself; it either answers small talk directly or delegates.

use docsage_core::config::DocsageConfig;
use docsage_core::error::Result;
use docsage_core::traits::{ChatModel, CompletionParams};
use docsage_core::types::ToolSpec;
use docsage_providers::create_chat_model;

pub mod decision;
pub mod prompts;
pub mod specialist;
pub mod tool_client;

pub use decision::Decision;
pub use specialist::SpecialistAgent;
pub use tool_client::ToolServerClient;

use prompts::MANAGER_SYSTEM_PROMPT;

/// The orchestrating agent. Owns the decision model, the tool server
/// client, and the specialist.
pub struct ManagerAgent {
    chat: Box<dyn ChatModel>,
    model: String,
    tool_client: ToolServerClient,
    specialist: SpecialistAgent,
}

impl ManagerAgent {
    pub fn new(config: &DocsageConfig) -> Result<Self> {
        let chat = create_chat_model(config)?;
        let specialist =
            SpecialistAgent::new(create_chat_model(config)?, config.llm.model.clone());
        let tool_client = ToolServerClient::new(&config.server.url())?;
        tracing::info!(
            "Manager agent initialized (model={}, tool_server={})",
            config.llm.model,
            tool_client.base_url()
        );
        Ok(Self {
            chat,
            model: config.llm.model.clone(),
            tool_client,
            specialist,
        })
    }

    /// Ask the tool server what it offers. Doubles as the startup
    /// connectivity check.
    pub async fn discover_tools(&self) -> Result<Vec<ToolSpec>> {
        self.tool_client.discover().await
    }

    /// Classify the question with a deterministic model call. Any failure
    /// here degrades to retrieval rather than surfacing an error.
    async fn decide(&self, question: &str) -> Decision {
        tracing::info!(
            "Asking LLM to decide action for question: '{}'",
            safe_truncate(question, 100)
        );
        let params = CompletionParams {
            model: self.model.clone(),
            temperature: 0.0,
            max_tokens: 200,
        };
        match self
            .chat
            .complete(MANAGER_SYSTEM_PROMPT, question, &params)
            .await
        {
            Ok(raw) => {
                tracing::debug!("Manager LLM raw response: {}", raw);
                Decision::parse(&raw, question)
            }
            Err(e) => {
                tracing::warn!("Decision model call failed ({e}); falling back to retrieval");
                Decision::Retrieve {
                    query: question.to_string(),
                }
            }
        }
    }

    /// Run the full workflow for one question: decide, retrieve if needed,
    /// synthesize. Retrieval failures come back as an error answer string
    /// so an interactive session keeps going.
    pub async fn run(&self, question: &str) -> Result<String> {
        tracing::info!("Processing question: '{}'", safe_truncate(question, 100));

        let query = match self.decide(question).await {
            Decision::DirectAnswer { answer } => {
                tracing::info!("Manager answered directly (no retrieval needed)");
                return Ok(answer);
            }
            Decision::Retrieve { query } => query,
        };

        tracing::info!(
            "Manager decided to retrieve documents with query: '{}'",
            safe_truncate(&query, 100)
        );
        let snippets = match self.tool_client.retrieve(&query).await {
            Ok(snippets) => snippets,
            Err(e) => {
                tracing::error!("Tool invocation failed: {e}");
                return Ok(format!(
                    "Error: Failed to retrieve documents from the tool server: {e}"
                ));
            }
        };

        if snippets.is_empty() {
            tracing::warn!("No snippets retrieved; specialist will note missing info");
        }

        tracing::info!(
            "Delegating to specialist with {} context snippet(s)",
            snippets.len()
        );
        let answer = self.specialist.run(question, &snippets).await?;
        tracing::info!(
            "Final answer generated ({} characters)",
            answer.chars().count()
        );
        Ok(answer)
    }
}

/// Truncate to a char boundary so log lines never split a multibyte char.
pub(crate) fn safe_truncate(s: &str, max_bytes: usize) -> &str {
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
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use docsage_core::error::DocsageError;
    use docsage_core::traits::Embedder;
    use docsage_retriever::DocumentRetriever;
    use docsage_server::{AppState, build_router};

    struct StubChat {
        reply: Option<String>,
    }

    #[async_trait]
    impl ChatModel for StubChat {
        fn name(&self) -> &str {
            "stub"
        }

        async fn complete(
            &self,
            _system_prompt: &str,
            _user_message: &str,
            _params: &CompletionParams,
        ) -> Result<String> {
            match &self.reply {
                Some(reply) => Ok(reply.clone()),
                None => Err(DocsageError::Provider("stub offline".into())),
            }
        }
    }

    /// Manager wired to an unreachable tool server, so any retrieval
    /// attempt shows up as an error answer.
    fn manager_with(decision_reply: Option<&str>, specialist_reply: Option<&str>) -> ManagerAgent {
        ManagerAgent {
            chat: Box::new(StubChat {
                reply: decision_reply.map(String::from),
            }),
            model: "test-model".to_string(),
            tool_client: ToolServerClient::new("http://127.0.0.1:9").unwrap(),
            specialist: SpecialistAgent::new(
                Box::new(StubChat {
                    reply: specialist_reply.map(String::from),
                }),
                "test-model".to_string(),
            ),
        }
    }

    #[tokio::test]
    async fn test_direct_answer_skips_retrieval() {
        let manager = manager_with(
            Some(r#"{"action": "direct_answer", "answer": "Hello! How can I help?"}"#),
            None,
        );
        let answer = manager.run("hello").await.unwrap();
        assert_eq!(answer, "Hello! How can I help?");
    }

    #[tokio::test]
    async fn test_retrieval_failure_becomes_error_answer() {
        let manager = manager_with(Some(r#"{"action": "retrieve", "query": "latency"}"#), None);
        let answer = manager.run("what happened to latency?").await.unwrap();
        assert!(
            answer.starts_with("Error: Failed to retrieve documents from the tool server:"),
            "unexpected answer: {answer}"
        );
    }

    #[tokio::test]
    async fn test_decision_failure_falls_back_to_retrieval() {
        let manager = manager_with(None, None);
        let answer = manager.run("anything at all").await.unwrap();
        assert!(answer.starts_with("Error: Failed to retrieve documents"));
    }

    struct NullEmbedder;

    #[async_trait]
    impl Embedder for NullEmbedder {
        fn name(&self) -> &str {
            "null"
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![0.0])
        }
    }

    struct RecordingChat {
        seen_user_message: Arc<Mutex<String>>,
        reply: String,
    }

    #[async_trait]
    impl ChatModel for RecordingChat {
        fn name(&self) -> &str {
            "recording"
        }

        async fn complete(
            &self,
            _system_prompt: &str,
            user_message: &str,
            _params: &CompletionParams,
        ) -> Result<String> {
            *self.seen_user_message.lock().unwrap() = user_message.to_string();
            Ok(self.reply.clone())
        }
    }

    #[tokio::test]
    async fn test_zero_snippet_retrieval_still_synthesizes() {
        // A live tool server over an empty knowledge base returns zero
        // snippets; the turn must still go through the specialist.
        let dir = tempfile::tempdir().unwrap();
        let retriever = DocumentRetriever::build(dir.path(), Box::new(NullEmbedder))
            .await
            .unwrap();
        let app = build_router(AppState {
            config: DocsageConfig::default(),
            retriever: Arc::new(tokio::sync::RwLock::new(Some(retriever))),
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let seen = Arc::new(Mutex::new(String::new()));
        let manager = ManagerAgent {
            chat: Box::new(StubChat {
                reply: Some(r#"{"action": "retrieve", "query": "roadmap"}"#.to_string()),
            }),
            model: "test-model".to_string(),
            tool_client: ToolServerClient::new(&format!("http://{addr}")).unwrap(),
            specialist: SpecialistAgent::new(
                Box::new(RecordingChat {
                    seen_user_message: seen.clone(),
                    reply: "Nothing on file.".to_string(),
                }),
                "test-model".to_string(),
            ),
        };

        let answer = manager.run("what is on the roadmap?").await.unwrap();
        assert_eq!(answer, "Nothing on file.");
        let message = seen.lock().unwrap().clone();
        assert!(message.contains("No context snippets were retrieved."));
    }

    #[test]
    fn test_safe_truncate() {
        assert_eq!(safe_truncate("short", 80), "short");
        assert_eq!(safe_truncate("abcdef", 4), "abcd");
        assert_eq!(safe_truncate("áéíóú", 3), "á");
    }
}
