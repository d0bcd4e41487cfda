//! Recipient roster assembly and role-specific cover messages.

use ledgerbrief_core::delivery::{Recipient, RecipientRole};
use ledgerbrief_core::enquiry::Enquiry;
use ledgerbrief_core::error::DeliveryError;

/// Assemble the delivery roster for an enquiry.
///
/// Roster order is requester, supervisor, oversight. An address that is
/// absent or blank contributes no recipient; an enquiry with no usable
/// address at all cannot be delivered and is rejected before any
/// generation work starts.
pub fn build_recipients(enquiry: &Enquiry) -> Result<Vec<Recipient>, DeliveryError> {
    let mut recipients = Vec::new();
    if let Some(email) = present(&enquiry.user_email) {
        recipients.push(Recipient::new(email, &enquiry.full_name, RecipientRole::Primary));
    }
    if let Some(email) = present(&enquiry.supervisor_email) {
        recipients.push(Recipient::new(
            email,
            &enquiry.supervisor_name,
            RecipientRole::Supervisor,
        ));
    }
    if let Some(email) = present(&enquiry.hr_email) {
        recipients.push(Recipient::new(email, "HR Department", RecipientRole::Oversight));
    }
    if recipients.is_empty() {
        return Err(DeliveryError::NoRecipients);
    }
    Ok(recipients)
}

fn present(email: &Option<String>) -> Option<&str> {
    email.as_deref().map(str::trim).filter(|e| !e.is_empty())
}

/// The cover message for one recipient.
///
/// The greeting names the recipient; the body sentence depends on the role.
/// `submitted_at` is the preformatted UTC stamp shown to the requester.
pub fn cover_body(recipient: &Recipient, requester: &str, submitted_at: &str) -> String {
    match recipient.role {
        RecipientRole::Primary => format!(
            "To: {},\n\nPlease find attached the AI-generated analysis based on your query submitted on {}.\n",
            recipient.name, submitted_at
        ),
        RecipientRole::Supervisor => format!(
            "To: {},\n\nPlease review the attached report submitted by {}. It contains AI-generated analysis for internal review.\n",
            recipient.name, requester
        ),
        RecipientRole::Oversight => format!(
            "To: {},\n\nThis document was generated following a query submitted by {}. Please file or follow up according to internal procedures.\n",
            recipient.name, requester
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_enquiry() -> Enquiry {
        let mut enquiry = Enquiry::new("When are accounts due?");
        enquiry.full_name = "Jane Doe".to_string();
        enquiry.supervisor_name = "Sam Lee".to_string();
        enquiry.user_email = Some("jane@example.co.uk".to_string());
        enquiry.supervisor_email = Some("sam@example.co.uk".to_string());
        enquiry.hr_email = Some("hr@example.co.uk".to_string());
        enquiry
    }

    #[test]
    fn roster_order_is_requester_supervisor_oversight() {
        let recipients = build_recipients(&full_enquiry()).unwrap();
        assert_eq!(recipients.len(), 3);
        assert_eq!(recipients[0].role, RecipientRole::Primary);
        assert_eq!(recipients[0].name, "Jane Doe");
        assert_eq!(recipients[1].role, RecipientRole::Supervisor);
        assert_eq!(recipients[1].name, "Sam Lee");
        assert_eq!(recipients[2].role, RecipientRole::Oversight);
        assert_eq!(recipients[2].name, "HR Department");
    }

    #[test]
    fn single_address_yields_single_recipient() {
        let mut enquiry = full_enquiry();
        enquiry.supervisor_email = None;
        enquiry.hr_email = None;
        let recipients = build_recipients(&enquiry).unwrap();
        assert_eq!(recipients.len(), 1);
        assert_eq!(recipients[0].email, "jane@example.co.uk");
    }

    #[test]
    fn blank_addresses_are_skipped() {
        let mut enquiry = full_enquiry();
        enquiry.user_email = Some("   ".to_string());
        enquiry.supervisor_email = Some(String::new());
        let recipients = build_recipients(&enquiry).unwrap();
        assert_eq!(recipients.len(), 1);
        assert_eq!(recipients[0].role, RecipientRole::Oversight);
    }

    #[test]
    fn no_addresses_is_an_error() {
        let enquiry = Enquiry::new("anything");
        let err = build_recipients(&enquiry).unwrap_err();
        assert!(matches!(err, DeliveryError::NoRecipients));
    }

    #[test]
    fn primary_body_references_submission_time() {
        let recipient = Recipient::new("jane@example.co.uk", "Jane Doe", RecipientRole::Primary);
        let body = cover_body(&recipient, "Jane Doe", "2026-01-15 09:30:05");
        assert_eq!(
            body,
            "To: Jane Doe,\n\nPlease find attached the AI-generated analysis based on your query submitted on 2026-01-15 09:30:05.\n"
        );
    }

    #[test]
    fn supervisor_body_names_the_requester() {
        let recipient = Recipient::new("sam@example.co.uk", "Sam Lee", RecipientRole::Supervisor);
        let body = cover_body(&recipient, "Jane Doe", "ignored");
        assert_eq!(
            body,
            "To: Sam Lee,\n\nPlease review the attached report submitted by Jane Doe. It contains AI-generated analysis for internal review.\n"
        );
    }

    #[test]
    fn oversight_body_asks_for_filing() {
        let recipient = Recipient::new("hr@example.co.uk", "HR Department", RecipientRole::Oversight);
        let body = cover_body(&recipient, "Jane Doe", "ignored");
        assert_eq!(
            body,
            "To: HR Department,\n\nThis document was generated following a query submitted by Jane Doe. Please file or follow up according to internal procedures.\n"
        );
    }
}
