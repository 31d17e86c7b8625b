//! Markdown chunking and in-memory vector search for DocSage.
//!
//! Design:
//! - Knowledge lives as plain `.md` files in a directory. No database,
//!   no sidecar index files. The index is rebuilt from scratch on startup.
//! - Documents are split on level-2 headings so each chunk is one coherent
//!   section, small enough to embed and quote whole.
//! - Search is exhaustive cosine distance over an in-memory store. For
//!   knowledge bases in the hundreds-of-chunks range this is faster than
//!   any ANN structure and has zero tuning knobs.
//!
//! Flow:
//! 1. [`chunker::split_into_sections`] turns one markdown file into
//!    `(section title, body)` pairs.
//! 2. [`VectorStore`] holds the embedded chunks and answers k-NN queries.
//! 3. [`DocumentRetriever`] ties both to an [`Embedder`] and exposes
//!    `build` + `query`.
//!
//! [`Embedder`]: docsage_core::traits::Embedder

pub mod chunker;
pub mod index;
pub mod retriever;

pub use index::VectorStore;
pub use retriever::DocumentRetriever;
