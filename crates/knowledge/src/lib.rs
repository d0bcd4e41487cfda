//! Knowledge retrieval for Ledgerbrief.
//!
//! Loads the precomputed embedding index produced by the offline chunking
//! job, embeds incoming queries through the configured provider, and pulls
//! the closest policy chunks off disk to ground the generated response.
//!
//! Retrieval is deliberately fail-open. A missing or corrupt index, a
//! failed embedding call, or unreadable chunk files degrade the context to
//! a fixed placeholder instead of failing the enquiry.

pub mod index;
pub mod retriever;
pub mod vector;

pub use index::{ChunkEntry, KnowledgeIndex, SearchHit};
pub use retriever::{ContextBundle, Retriever, CHUNK_SEPARATOR, CONTEXT_UNAVAILABLE};
pub use vector::cosine_similarity;
