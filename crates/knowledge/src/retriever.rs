//! Context retrieval for incoming enquiries.
//!
//! Retrieval never fails the request: when the index was not loaded, the
//! query cannot be embedded, or no chunk file survives, the bundle degrades
//! to a fixed placeholder and generation proceeds without grounding.

use std::path::PathBuf;
use std::sync::Arc;

use ledgerbrief_core::provider::{EmbeddingRequest, Provider};
use tracing::{debug, warn};

use crate::index::KnowledgeIndex;

/// Context text used when no chunks could be retrieved.
pub const CONTEXT_UNAVAILABLE: &str = "Policy lookup not available (knowledge index not loaded).";

/// Separator between chunks in the composed prompt.
pub const CHUNK_SEPARATOR: &str = "\n\n---\n\n";

/// The outcome of a retrieval pass.
#[derive(Debug, Clone)]
pub struct ContextBundle {
    /// Retrieved chunk texts, best match first. Empty when degraded.
    pub chunks: Vec<String>,

    /// True when retrieval fell back to the placeholder.
    pub degraded: bool,
}

impl ContextBundle {
    /// A bundle carrying no retrieved context.
    pub fn unavailable() -> Self {
        Self {
            chunks: Vec::new(),
            degraded: true,
        }
    }

    /// The context text to interpolate into the prompt: the joined chunks,
    /// or the placeholder when nothing was retrieved.
    pub fn joined(&self) -> String {
        if self.degraded || self.chunks.is_empty() {
            CONTEXT_UNAVAILABLE.to_string()
        } else {
            self.chunks.join(CHUNK_SEPARATOR)
        }
    }

    /// The first `limit` characters of the joined context, for echoing
    /// back to the caller.
    pub fn preview(&self, limit: usize) -> String {
        self.joined().chars().take(limit).collect()
    }
}

/// Embeds queries and pulls the best-matching policy chunks off disk.
pub struct Retriever {
    index: Option<KnowledgeIndex>,
    provider: Arc<dyn Provider>,
    embedding_model: String,
    data_dir: PathBuf,
    top_k: usize,
}

impl Retriever {
    pub fn new(
        index: Option<KnowledgeIndex>,
        provider: Arc<dyn Provider>,
        embedding_model: impl Into<String>,
        data_dir: impl Into<PathBuf>,
        top_k: usize,
    ) -> Self {
        Self {
            index,
            provider,
            embedding_model: embedding_model.into(),
            data_dir: data_dir.into(),
            top_k,
        }
    }

    /// True when no index is loaded and every retrieval will degrade.
    pub fn degraded(&self) -> bool {
        self.index.is_none()
    }

    /// Retrieve context for `query`.
    ///
    /// Newlines in the query are flattened to spaces before embedding.
    /// Chunk files that cannot be read are skipped with a warning.
    pub async fn retrieve(&self, query: &str) -> ContextBundle {
        let Some(index) = &self.index else {
            debug!("No knowledge index loaded, using placeholder context");
            return ContextBundle::unavailable();
        };

        let flattened = query.replace('\n', " ");
        let request = EmbeddingRequest {
            model: self.embedding_model.clone(),
            inputs: vec![flattened],
        };

        let embedding = match self.provider.embed(request).await {
            Ok(response) => match response.embeddings.into_iter().next() {
                Some(vector) => vector,
                None => {
                    warn!("Embedding response carried no vectors, continuing without context");
                    return ContextBundle::unavailable();
                }
            },
            Err(e) => {
                warn!(error = %e, "Query embedding failed, continuing without context");
                return ContextBundle::unavailable();
            }
        };

        let mut chunks = Vec::new();
        for hit in index.search(&embedding, self.top_k) {
            let path = self.data_dir.join(&hit.chunk_file);
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => {
                    debug!(chunk = %hit.chunk_file, score = hit.score, "Retrieved context chunk");
                    chunks.push(text.trim().to_string());
                }
                Err(e) => {
                    warn!(chunk = %path.display(), error = %e, "Skipping unreadable chunk file");
                }
            }
        }

        if chunks.is_empty() {
            return ContextBundle::unavailable();
        }

        ContextBundle {
            chunks,
            degraded: false,
        }
    }
}
