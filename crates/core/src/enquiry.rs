//! The inbound enquiry — one professional query plus requester metadata.
//!
//! An enquiry is immutable once received and exists only for the duration of
//! one request. Every optional metadata field carries the literal fallback
//! the prompt template expects, so composition never has to branch on
//! missing values.

use serde::{Deserialize, Serialize};

fn default_full_name() -> String {
    "User".to_string()
}

fn default_supervisor_name() -> String {
    "Supervisor".to_string()
}

fn default_not_specified() -> String {
    "Not specified".to_string()
}

/// A single accounting query with its routing and profile metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enquiry {
    /// The free-text question. Required; the gateway rejects blank queries.
    #[serde(default)]
    pub query: String,

    /// Display name of the requester.
    #[serde(default = "default_full_name")]
    pub full_name: String,

    /// Primary recipient address.
    #[serde(default)]
    pub user_email: Option<String>,

    /// Supervisor recipient address.
    #[serde(default)]
    pub supervisor_email: Option<String>,

    /// Oversight (HR) recipient address.
    #[serde(default)]
    pub hr_email: Option<String>,

    /// Display name of the supervisor.
    #[serde(default = "default_supervisor_name")]
    pub supervisor_name: String,

    /// Professional discipline; selects the review instruction and the
    /// output folder.
    #[serde(default = "default_not_specified")]
    pub discipline: String,

    #[serde(default = "default_not_specified")]
    pub job_title: String,

    #[serde(default = "default_not_specified")]
    pub seniority_level: String,

    #[serde(default = "default_not_specified")]
    pub timeline: String,

    #[serde(default = "default_not_specified")]
    pub site: String,

    /// Funnel answers captured by the intake form.
    #[serde(default = "default_not_specified")]
    pub funnel_1: String,

    #[serde(default = "default_not_specified")]
    pub funnel_2: String,

    #[serde(default = "default_not_specified")]
    pub funnel_3: String,
}

impl Enquiry {
    /// A minimal enquiry with every metadata field at its documented default.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            full_name: default_full_name(),
            user_email: None,
            supervisor_email: None,
            hr_email: None,
            supervisor_name: default_supervisor_name(),
            discipline: default_not_specified(),
            job_title: default_not_specified(),
            seniority_level: default_not_specified(),
            timeline: default_not_specified(),
            site: default_not_specified(),
            funnel_1: default_not_specified(),
            funnel_2: default_not_specified(),
            funnel_3: default_not_specified(),
        }
    }
}
