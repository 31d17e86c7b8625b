//! # DocSage Core
//!
//! Shared building blocks for the DocSage workspace: configuration,
//! the error type, wire types for the tool server protocol, and the
//! collaborator traits implemented by language model providers.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use error::{DocsageError, Result};
