//! Mailjet bulk-send dispatcher.
//!
//! One HTTP call per dispatch: the v3.1 send API takes a `Messages` array,
//! so every recipient travels in the same request. The vendor's status code
//! and body come back as a receipt whatever they are; only a transport
//! failure is an error.

use async_trait::async_trait;
use base64::Engine;
use ledgerbrief_config::DeliveryConfig;
use ledgerbrief_core::delivery::{DeliveryJob, DeliveryReceipt, Dispatcher};
use ledgerbrief_core::error::DeliveryError;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::roster::cover_body;

/// Dispatcher backed by the Mailjet v3.1 send API.
pub struct MailjetDispatcher {
    client: reqwest::Client,
    endpoint: String,
    public_key: String,
    private_key: String,
    from_email: String,
    from_name: String,
}

impl MailjetDispatcher {
    pub fn new(config: &DeliveryConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: config.endpoint.clone(),
            public_key: config.public_key.clone().unwrap_or_default(),
            private_key: config.private_key.clone().unwrap_or_default(),
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
        }
    }

    /// Build the vendor payload: one message per recipient, all sharing the
    /// subject and the attached document, each with its role-specific body.
    fn build_payload(&self, job: &DeliveryJob) -> Value {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&job.document);
        let messages: Vec<Value> = job
            .recipients
            .iter()
            .map(|recipient| {
                let text = cover_body(recipient, &job.requester, &job.submitted_at);
                json!({
                    "From": {"Email": self.from_email, "Name": self.from_name},
                    "To": [{"Email": recipient.email, "Name": recipient.name}],
                    "Subject": job.subject,
                    "TextPart": text,
                    "HTMLPart": format!("<pre>{text}</pre>"),
                    "Attachments": [{
                        "ContentType": "application/pdf",
                        "Filename": job.attachment_name,
                        "Base64Content": encoded,
                    }],
                })
            })
            .collect();
        json!({ "Messages": messages })
    }
}

#[async_trait]
impl Dispatcher for MailjetDispatcher {
    fn name(&self) -> &str {
        "mailjet"
    }

    async fn dispatch(
        &self,
        job: &DeliveryJob,
    ) -> std::result::Result<DeliveryReceipt, DeliveryError> {
        let payload = self.build_payload(job);
        debug!(
            recipients = job.recipients.len(),
            subject = %job.subject,
            "Dispatching document"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.public_key, Some(&self.private_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| DeliveryError::Network(e.to_string()))?;

        let status_code = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        // Mailjet answers JSON on both success and rejection, but a proxy in
        // between may not; keep whatever came back.
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        if (200..300).contains(&status_code) {
            info!(status_code, "Mail vendor accepted dispatch");
        } else {
            warn!(status_code, "Mail vendor rejected dispatch");
        }

        Ok(DeliveryReceipt { status_code, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerbrief_core::delivery::{Recipient, RecipientRole};

    fn dispatcher() -> MailjetDispatcher {
        let mut config = DeliveryConfig::default();
        config.public_key = Some("mj-public".to_string());
        config.private_key = Some("mj-private".to_string());
        MailjetDispatcher::new(&config)
    }

    fn job() -> DeliveryJob {
        DeliveryJob {
            recipients: vec![
                Recipient::new("jane@example.co.uk", "Jane Doe", RecipientRole::Primary),
                Recipient::new("sam@example.co.uk", "Sam Lee", RecipientRole::Supervisor),
            ],
            subject: "AI Analysis for Jane Doe - 2026-01-15 09:30:05".to_string(),
            requester: "Jane Doe".to_string(),
            submitted_at: "2026-01-15 09:30:05".to_string(),
            attachment_name: "Jane_Doe_20260115_093005_ab12cd34.pdf".to_string(),
            document: b"%PDF-sample".to_vec(),
        }
    }

    #[test]
    fn payload_carries_one_message_per_recipient() {
        let payload = dispatcher().build_payload(&job());
        let messages = payload["Messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["To"][0]["Email"], "jane@example.co.uk");
        assert_eq!(messages[1]["To"][0]["Email"], "sam@example.co.uk");
        assert_eq!(
            messages[0]["Subject"],
            "AI Analysis for Jane Doe - 2026-01-15 09:30:05"
        );
    }

    #[test]
    fn html_part_wraps_text_in_pre() {
        let payload = dispatcher().build_payload(&job());
        let text = payload["Messages"][0]["TextPart"].as_str().unwrap();
        let html = payload["Messages"][0]["HTMLPart"].as_str().unwrap();
        assert!(text.starts_with("To: Jane Doe,"));
        assert_eq!(html, format!("<pre>{text}</pre>"));
    }

    #[test]
    fn attachment_round_trips_through_base64() {
        let payload = dispatcher().build_payload(&job());
        let attachment = &payload["Messages"][0]["Attachments"][0];
        assert_eq!(attachment["ContentType"], "application/pdf");
        assert_eq!(
            attachment["Filename"],
            "Jane_Doe_20260115_093005_ab12cd34.pdf"
        );
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(attachment["Base64Content"].as_str().unwrap())
            .unwrap();
        assert_eq!(decoded, b"%PDF-sample");
    }

    #[test]
    fn every_message_shares_the_attachment() {
        let payload = dispatcher().build_payload(&job());
        let first = payload["Messages"][0]["Attachments"][0]["Base64Content"].clone();
        let second = payload["Messages"][1]["Attachments"][0]["Base64Content"].clone();
        assert_eq!(first, second);
    }

    #[test]
    fn from_identity_comes_from_config() {
        let payload = dispatcher().build_payload(&job());
        assert_eq!(
            payload["Messages"][0]["From"]["Email"],
            "noreply@ledgerbrief.uk"
        );
        assert_eq!(payload["Messages"][0]["From"]["Name"], "Ledgerbrief Reports");
    }
}
