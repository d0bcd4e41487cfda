//! Outbound mail delivery.
//!
//! [`roster`] decides who receives a report and what each cover message
//! says; [`mailjet`] carries the rendered document to the vendor in one
//! bulk call.

pub mod mailjet;
pub mod roster;

pub use mailjet::MailjetDispatcher;
pub use roster::{build_recipients, cover_body};
