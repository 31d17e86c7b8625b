//! Specialist agent: synthesizes a grounded, cited answer from retrieved
//! context.

use docsage_core::error::Result;
use docsage_core::traits::{ChatModel, CompletionParams};
use docsage_core::types::RetrievedSnippet;

use crate::prompts::SPECIALIST_SYSTEM_PROMPT;

/// Turns a question plus retrieved snippets into a final answer with
/// inline citations and a sources footer.
pub struct SpecialistAgent {
    chat: Box<dyn ChatModel>,
    model: String,
}

impl SpecialistAgent {
    pub fn new(chat: Box<dyn ChatModel>, model: String) -> Self {
        tracing::info!("Specialist agent initialized (model={})", model);
        Self { chat, model }
    }

    /// Generate a synthesized answer for the question from the snippets.
    /// Runs even with no snippets so the model can state what is missing.
    pub async fn run(&self, question: &str, snippets: &[RetrievedSnippet]) -> Result<String> {
        let formatted_context = format_context(snippets);
        let user_message = format!(
            "## User Question\n{question}\n\n## Retrieved Context\n{formatted_context}\n\n\
             Please synthesize a comprehensive answer based on the context above. \
             Remember to cite all sources inline."
        );

        tracing::debug!("Specialist prompt:\n{user_message}");
        tracing::info!("Calling LLM for synthesis (model={})", self.model);

        let params = CompletionParams {
            model: self.model.clone(),
            temperature: 0.2,
            max_tokens: 1500,
        };
        let answer = self
            .chat
            .complete(SPECIALIST_SYSTEM_PROMPT, &user_message, &params)
            .await?;
        let answer = if answer.is_empty() {
            "No answer generated.".to_string()
        } else {
            answer
        };

        tracing::info!(
            "Specialist generated answer ({} characters)",
            answer.chars().count()
        );
        Ok(answer)
    }
}

/// Format snippets into the context block the specialist prompt expects.
pub fn format_context(snippets: &[RetrievedSnippet]) -> String {
    if snippets.is_empty() {
        return "No context snippets were retrieved.".to_string();
    }
    let parts: Vec<String> = snippets
        .iter()
        .enumerate()
        .map(|(i, snippet)| {
            format!(
                "--- Snippet {} ---\nSource: {}\nSection: {}\nRelevance Score: {}\nContent:\n{}\n",
                i + 1,
                snippet.source,
                snippet.section,
                snippet.relevance_score,
                snippet.text
            )
        })
        .collect();
    parts.join("\n")
}
