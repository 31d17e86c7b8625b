//! HTTP server implementation using Axum.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use docsage_core::config::DocsageConfig;
use docsage_providers::create_embedder;
use docsage_retriever::DocumentRetriever;

/// Shared state for the tool server.
#[derive(Clone)]
pub struct AppState {
    pub config: DocsageConfig,
    /// None until background indexing completes.
    pub retriever: Arc<tokio::sync::RwLock<Option<DocumentRetriever>>>,
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(super::routes::health_check))
        .route("/tools", get(super::routes::list_tools))
        .route(
            "/tools/document_retriever",
            post(super::routes::invoke_document_retriever),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the tool server.
///
/// The knowledge base is indexed in a spawned task so the listener binds
/// without waiting on embedding calls. Until the task finishes, tool
/// invocations get 503.
pub async fn start(config: DocsageConfig) -> anyhow::Result<()> {
    let retriever: Arc<tokio::sync::RwLock<Option<DocumentRetriever>>> =
        Arc::new(tokio::sync::RwLock::new(None));

    let build_config = config.clone();
    let build_slot = retriever.clone();
    tokio::spawn(async move {
        let knowledge_dir = build_config.retrieval.resolved_knowledge_dir();
        tracing::info!("Loading knowledge base from: {}", knowledge_dir.display());
        let started = Instant::now();
        let embedder = match create_embedder(&build_config) {
            Ok(e) => e,
            Err(e) => {
                tracing::error!("❌ Failed to create embedder: {e}");
                return;
            }
        };
        match DocumentRetriever::build(&knowledge_dir, embedder).await {
            Ok(r) => {
                let chunks = r.chunk_count();
                *build_slot.write().await = Some(r);
                tracing::info!(
                    "✅ Tool server is ready ({} chunks indexed in {:.2}s)",
                    chunks,
                    started.elapsed().as_secs_f64()
                );
            }
            Err(e) => {
                tracing::error!("❌ Knowledge base indexing failed: {e}");
            }
        }
    });

    let state = AppState {
        config: config.clone(),
        retriever,
    };
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🌐 Tool server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
