//! Error types for the Ledgerbrief domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Ledgerbrief operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Knowledge index errors ---
    #[error("Knowledge error: {0}")]
    Knowledge(#[from] KnowledgeError),

    // --- Document rendering errors ---
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    // --- Delivery errors ---
    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("Index unreadable: {0}")]
    Unreadable(String),

    #[error("Index malformed: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Document emission failed: {0}")]
    Emission(String),

    #[error("Document write failed: {path}: {reason}")]
    Write { path: String, reason: String },
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("No valid email addresses provided")]
    NoRecipients,

    #[error("Mail vendor unreachable: {0}")]
    Network(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn render_error_displays_correctly() {
        let err = Error::Render(RenderError::Write {
            path: "output/accounting/report.pdf".into(),
            reason: "permission denied".into(),
        });
        assert!(err.to_string().contains("report.pdf"));
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn delivery_error_wraps_into_top_level() {
        let err: Error = DeliveryError::NoRecipients.into();
        assert!(err.to_string().contains("email addresses"));
    }
}
