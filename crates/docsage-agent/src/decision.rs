//! Manager decision parsing.
//!
//! The decision model is instructed to answer with a single JSON object,
//! but LLM output is untrusted: it may wrap the JSON in code fences, use
//! an unknown action, or return garbage. Parsing never fails; anything
//! unusable degrades to retrieval with the original question, which is
//! the safe default for a Q&A system.

use serde::Deserialize;

/// Answer when the model picks `direct_answer` but supplies no text.
pub const FALLBACK_ANSWER: &str = "I'm not sure how to respond to that.";

/// What the manager decided to do with a question.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Query the knowledge base, then synthesize.
    Retrieve { query: String },
    /// Answer conversationally without touching the knowledge base.
    DirectAnswer { answer: String },
}

#[derive(Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum RawDecision {
    Retrieve {
        #[serde(default)]
        query: Option<String>,
    },
    DirectAnswer {
        #[serde(default)]
        answer: Option<String>,
    },
}

impl Decision {
    /// Parse the decision model's raw output. `original_question` fills in
    /// whenever the model omits the query or the JSON is unusable.
    pub fn parse(raw: &str, original_question: &str) -> Self {
        let cleaned = strip_code_fences(raw);
        match serde_json::from_str::<RawDecision>(cleaned) {
            Ok(RawDecision::DirectAnswer { answer }) => Decision::DirectAnswer {
                answer: answer
                    .filter(|a| !a.is_empty())
                    .unwrap_or_else(|| FALLBACK_ANSWER.to_string()),
            },
            Ok(RawDecision::Retrieve { query }) => Decision::Retrieve {
                query: query
                    .filter(|q| !q.is_empty())
                    .unwrap_or_else(|| original_question.to_string()),
            },
            Err(e) => {
                tracing::warn!("Failed to parse decision as JSON ({e}): {raw}");
                Decision::Retrieve {
                    query: original_question.to_string(),
                }
            }
        }
    }
}

/// Strip markdown code fences some models wrap around JSON output.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // The opening fence line may carry a language tag; drop the whole line.
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };
    let body = match body.rsplit_once("```") {
        Some((head, _)) => head,
        None => body,
    };
    body.trim()
}
