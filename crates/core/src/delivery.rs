//! Delivery domain types and the Dispatcher trait.
//!
//! A dispatch is one outbound bulk-send call carrying the rendered document
//! to every recipient. The vendor's verdict travels back to the caller as a
//! receipt; a non-2xx vendor status is data, not an error.

use crate::error::DeliveryError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Which cover-message template a recipient gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientRole {
    /// The requester themselves
    Primary,
    /// The requester's supervisor
    Supervisor,
    /// HR / compliance oversight
    Oversight,
}

/// One addressee of the rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub email: String,
    pub name: String,
    pub role: RecipientRole,
}

impl Recipient {
    pub fn new(email: impl Into<String>, name: impl Into<String>, role: RecipientRole) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            role,
        }
    }
}

/// Everything one dispatch needs: who, what subject, and the document.
#[derive(Debug, Clone)]
pub struct DeliveryJob {
    pub recipients: Vec<Recipient>,

    pub subject: String,

    /// Requester display name, interpolated into the cover bodies.
    pub requester: String,

    /// Preformatted UTC submission stamp for the primary cover body.
    pub submitted_at: String,

    /// Attachment filename as shown to recipients.
    pub attachment_name: String,

    /// The rendered document bytes.
    pub document: Vec<u8>,
}

/// The vendor's verdict on one dispatch, surfaced verbatim to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub status_code: u16,
    pub body: serde_json::Value,
}

/// The outbound delivery boundary.
///
/// One implementation per mail vendor; the gateway holds it as a trait
/// object so tests can substitute a recording stub.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// A human-readable name for this dispatcher (e.g., "mailjet").
    fn name(&self) -> &str;

    /// Send the document to every recipient in one bulk call.
    ///
    /// Errors only on transport failure; a vendor rejection comes back as a
    /// receipt with the vendor's status code.
    async fn dispatch(&self, job: &DeliveryJob) -> std::result::Result<DeliveryReceipt, DeliveryError>;
}
