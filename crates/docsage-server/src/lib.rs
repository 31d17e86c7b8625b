//! HTTP tool server exposing the document retriever.
//!
//! The server is the only process that talks to the knowledge base. Agents
//! reach it over HTTP: `GET /tools` to discover what is available, then
//! `POST /tools/document_retriever` to run a query. Indexing happens in a
//! background task at startup so the endpoints bind immediately; the
//! retriever endpoint answers 503 until the index is ready.

pub mod routes;
pub mod server;

pub use server::{AppState, build_router, start};
