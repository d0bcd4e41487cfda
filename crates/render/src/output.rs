//! Durable output for rendered documents.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ledgerbrief_core::error::RenderError;
use tracing::debug;
use uuid::Uuid;

/// Compute the output path for a rendered document.
///
/// Documents are namespaced by discipline and named from the requester, a
/// UTC timestamp and a short random suffix, so two requests from the same
/// requester in the same second cannot collide.
pub fn document_path(
    output_dir: &Path,
    discipline: &str,
    full_name: &str,
    now: DateTime<Utc>,
) -> PathBuf {
    let folder = discipline.to_lowercase().replace(' ', "_");
    let suffix = Uuid::new_v4().simple().to_string();
    let file = format!(
        "{}_{}_{}.pdf",
        full_name.replace(' ', "_"),
        now.format("%Y%m%d_%H%M%S"),
        &suffix[..8]
    );
    output_dir.join(folder).join(file)
}

/// Write document bytes to disk, creating parent directories as needed.
pub fn write_document(path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| RenderError::Write {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    }
    fs::write(path, bytes).map_err(|e| RenderError::Write {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "Document written");
    Ok(())
}
