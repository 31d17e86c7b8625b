//! Document retriever: loads a markdown knowledge base into a vector
//! store and answers natural-language queries with scored snippets.

use std::path::Path;

use docsage_core::error::{DocsageError, Result};
use docsage_core::traits::Embedder;
use docsage_core::types::RetrievedSnippet;

use crate::chunker::split_into_sections;
use crate::index::{VectorStore, relevance_from_distance};

/// Chunks with fewer characters than this carry no useful signal and are
/// skipped at index time.
pub const MIN_CHUNK_CHARS: usize = 30;

/// Embeds and indexes every `.md` file in a directory, then serves
/// relevance-scored snippet queries.
pub struct DocumentRetriever {
    store: VectorStore,
    embedder: Box<dyn Embedder>,
}

impl std::fmt::Debug for DocumentRetriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentRetriever")
            .field("store", &self.store)
            .field("embedder", &self.embedder.name())
            .finish()
    }
}

impl DocumentRetriever {
    /// Index every markdown file under `knowledge_dir`. Files are loaded
    /// in name order so chunk ids are stable across runs.
    pub async fn build(knowledge_dir: &Path, embedder: Box<dyn Embedder>) -> Result<Self> {
        let mut file_names: Vec<String> = std::fs::read_dir(knowledge_dir)
            .map_err(|e| {
                DocsageError::Knowledge(format!(
                    "Failed to read knowledge dir {}: {e}",
                    knowledge_dir.display()
                ))
            })?
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry.path().extension().is_some_and(|ext| ext == "md")
                    && entry.file_type().map(|t| t.is_file()).unwrap_or(false)
            })
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        file_names.sort();

        if file_names.is_empty() {
            tracing::warn!("No .md files found in {}", knowledge_dir.display());
            return Ok(Self {
                store: VectorStore::new(),
                embedder,
            });
        }

        let mut texts: Vec<String> = Vec::new();
        let mut metas: Vec<(String, String)> = Vec::new();
        for name in &file_names {
            let path = knowledge_dir.join(name);
            let content = std::fs::read_to_string(&path).map_err(|e| {
                DocsageError::Knowledge(format!("Failed to read {}: {e}", path.display()))
            })?;
            let sections = split_into_sections(&content, name);
            tracing::info!("Loaded '{}': {} section(s) extracted", name, sections.len());
            for section in sections {
                if section.body.chars().count() < MIN_CHUNK_CHARS {
                    continue;
                }
                texts.push(section.body);
                metas.push((name.clone(), section.title));
            }
        }

        let mut store = VectorStore::new();
        if texts.is_empty() {
            tracing::warn!("No indexable chunks in {}", knowledge_dir.display());
            return Ok(Self { store, embedder });
        }

        let embeddings = embedder.embed_batch(&texts).await?;
        for ((text, (source, section)), embedding) in
            texts.into_iter().zip(metas).zip(embeddings)
        {
            store.insert(text, source, section, embedding)?;
        }
        tracing::info!(
            "📚 Indexed {} chunks from {} documents",
            store.len(),
            file_names.len()
        );
        Ok(Self { store, embedder })
    }

    /// Return up to `top_k` snippets relevant to `query_text`, best first.
    pub async fn query(&self, query_text: &str, top_k: usize) -> Result<Vec<RetrievedSnippet>> {
        if self.store.is_empty() {
            tracing::info!("Knowledge base is empty; returning no snippets");
            return Ok(Vec::new());
        }
        let query_embedding = self.embedder.embed(query_text).await?;
        let hits = self.store.search(&query_embedding, top_k);
        let snippets: Vec<RetrievedSnippet> = hits
            .into_iter()
            .map(|hit| RetrievedSnippet {
                text: hit.entry.text.clone(),
                source: hit.entry.source.clone(),
                section: hit.entry.section.clone(),
                relevance_score: relevance_from_distance(hit.distance),
            })
            .collect();
        tracing::info!(
            "Query '{}' returned {} snippet(s)",
            safe_truncate(query_text, 80),
            snippets.len()
        );
        Ok(snippets)
    }

    /// Number of indexed chunks.
    pub fn chunk_count(&self) -> usize {
        self.store.len()
    }
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
