//! In-memory vector store with exhaustive cosine search.

use docsage_core::error::{DocsageError, Result};

/// One embedded chunk.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub id: u64,
    pub text: String,
    pub source: String,
    pub section: String,
    pub embedding: Vec<f32>,
}

/// A search result referencing a stored entry.
#[derive(Debug)]
pub struct SearchHit<'a> {
    pub entry: &'a IndexEntry,
    /// Cosine distance in [0.0, 2.0]. Lower is closer.
    pub distance: f32,
}

/// Flat vector store. All entries share one embedding dimension, fixed by
/// the first insert.
#[derive(Debug, Default)]
pub struct VectorStore {
    entries: Vec<IndexEntry>,
    dim: Option<usize>,
}

impl VectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a chunk and return its id. Ids are assigned sequentially
    /// in insertion order, starting at 0.
    pub fn insert(
        &mut self,
        text: String,
        source: String,
        section: String,
        embedding: Vec<f32>,
    ) -> Result<u64> {
        match self.dim {
            None => self.dim = Some(embedding.len()),
            Some(dim) if dim != embedding.len() => {
                return Err(DocsageError::Knowledge(format!(
                    "embedding dimension mismatch: expected {dim}, got {}",
                    embedding.len()
                )));
            }
            Some(_) => {}
        }
        let id = self.entries.len() as u64;
        self.entries.push(IndexEntry {
            id,
            text,
            source,
            section,
            embedding,
        });
        Ok(id)
    }

    /// Return the `k` entries closest to `query` by cosine distance,
    /// nearest first. Returns fewer than `k` when the store is smaller.
    /// A query with the wrong dimension returns nothing.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<SearchHit<'_>> {
        if self.entries.is_empty() || k == 0 {
            return Vec::new();
        }
        if let Some(dim) = self.dim {
            if query.len() != dim {
                tracing::warn!(
                    "Query embedding has dimension {}, index has {}; returning no results",
                    query.len(),
                    dim
                );
                return Vec::new();
            }
        }
        let mut hits: Vec<SearchHit<'_>> = self
            .entries
            .iter()
            .map(|entry| SearchHit {
                entry,
                distance: 1.0 - cosine_similarity(query, &entry.embedding),
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(k);
        hits
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cosine similarity of two vectors. Zero-magnitude input yields 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag = magnitude(a) * magnitude(b);
    if mag == 0.0 { 0.0 } else { dot / mag }
}

fn magnitude(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Map a cosine distance to a relevance score in [0.0, 1.0], rounded to
/// 4 decimal places. Distance 0 scores 1.0, distance 2 scores 0.0.
pub fn relevance_from_distance(distance: f32) -> f32 {
    let score = (1.0 - f64::from(distance) / 2.0).clamp(0.0, 1.0);
    ((score * 10_000.0).round() / 10_000.0) as f32
}
