//! On-disk similarity index for policy chunk embeddings.
//!
//! The index is produced offline by the chunking job and loaded read-only
//! at startup. Layout: a 4-byte magic `LBX1`, the embedding dimension and
//! row count as little-endian u32s, then `count * dim` little-endian f32s
//! in row-major order. A sibling JSON file maps each row to the chunk file
//! holding its source text.

use std::fs;
use std::path::Path;

use ledgerbrief_core::error::KnowledgeError;
use serde::{Deserialize, Serialize};

use crate::vector;

/// File magic for the binary index format.
pub const MAGIC: [u8; 4] = *b"LBX1";

const HEADER_LEN: usize = 12;

/// One row of the metadata file: the chunk file backing an index row,
/// relative to the knowledge data directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkEntry {
    pub chunk_file: String,
}

/// A scored index row.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub ordinal: usize,
    pub score: f32,
    pub chunk_file: String,
}

/// Immutable in-memory copy of the embedding index and its chunk metadata.
#[derive(Debug)]
pub struct KnowledgeIndex {
    dim: usize,
    vectors: Vec<f32>,
    entries: Vec<ChunkEntry>,
}

impl KnowledgeIndex {
    /// Load an index and its metadata from disk.
    ///
    /// Fails with `Unreadable` when either file cannot be read and
    /// `Malformed` when the binary layout or metadata disagree with the
    /// declared header.
    pub fn load(
        index_path: impl AsRef<Path>,
        metadata_path: impl AsRef<Path>,
    ) -> Result<Self, KnowledgeError> {
        let index_path = index_path.as_ref();
        let metadata_path = metadata_path.as_ref();

        let raw = fs::read(index_path).map_err(|e| {
            KnowledgeError::Unreadable(format!("{}: {}", index_path.display(), e))
        })?;

        if raw.len() < HEADER_LEN {
            return Err(KnowledgeError::Malformed(format!(
                "index file is {} bytes, shorter than the {} byte header",
                raw.len(),
                HEADER_LEN
            )));
        }
        if raw[0..4] != MAGIC {
            return Err(KnowledgeError::Malformed(
                "index file does not start with the LBX1 magic".to_string(),
            ));
        }

        let dim = u32::from_le_bytes([raw[4], raw[5], raw[6], raw[7]]) as usize;
        let count = u32::from_le_bytes([raw[8], raw[9], raw[10], raw[11]]) as usize;

        if dim == 0 {
            return Err(KnowledgeError::Malformed(
                "index declares a zero embedding dimension".to_string(),
            ));
        }

        let expected = count
            .checked_mul(dim)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| {
                KnowledgeError::Malformed("declared vector payload overflows".to_string())
            })?;
        let payload = &raw[HEADER_LEN..];
        if payload.len() != expected {
            return Err(KnowledgeError::Malformed(format!(
                "expected {} payload bytes for {} rows of dimension {}, found {}",
                expected,
                count,
                dim,
                payload.len()
            )));
        }

        let mut vectors = Vec::with_capacity(count * dim);
        for bytes in payload.chunks_exact(4) {
            vectors.push(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]));
        }

        let meta_raw = fs::read(metadata_path).map_err(|e| {
            KnowledgeError::Unreadable(format!("{}: {}", metadata_path.display(), e))
        })?;
        let entries: Vec<ChunkEntry> = serde_json::from_slice(&meta_raw).map_err(|e| {
            KnowledgeError::Malformed(format!("{}: {}", metadata_path.display(), e))
        })?;

        if entries.len() != count {
            return Err(KnowledgeError::Malformed(format!(
                "metadata lists {} chunks but the index holds {} rows",
                entries.len(),
                count
            )));
        }

        tracing::info!(rows = count, dim, "Knowledge index loaded");

        Ok(Self {
            dim,
            vectors,
            entries,
        })
    }

    /// Encode rows into the binary index layout.
    ///
    /// Reference encoder for the offline chunking job and for tests.
    pub fn encode(dim: usize, rows: &[Vec<f32>]) -> Result<Vec<u8>, KnowledgeError> {
        let mut out = Vec::with_capacity(HEADER_LEN + rows.len() * dim * 4);
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&(dim as u32).to_le_bytes());
        out.extend_from_slice(&(rows.len() as u32).to_le_bytes());
        for (i, row) in rows.iter().enumerate() {
            if row.len() != dim {
                return Err(KnowledgeError::Malformed(format!(
                    "row {} has dimension {}, expected {}",
                    i,
                    row.len(),
                    dim
                )));
            }
            for value in row {
                out.extend_from_slice(&value.to_le_bytes());
            }
        }
        Ok(out)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rank all rows against `query` and return the top `k` with their
    /// chunk file names attached.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<SearchHit> {
        vector::nearest(&self.vectors, self.dim, query, k)
            .into_iter()
            .map(|(ordinal, score)| SearchHit {
                ordinal,
                score,
                chunk_file: self.entries[ordinal].chunk_file.clone(),
            })
            .collect()
    }
}
