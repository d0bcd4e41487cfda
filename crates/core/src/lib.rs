//! # Ledgerbrief Core
//!
//! Domain types, traits, and error definitions for the Ledgerbrief reporting
//! service. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external boundary (language-model provider, mail dispatcher) is
//! defined as a trait here. Implementations live in their respective crates.
//! This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod answer;
pub mod delivery;
pub mod enquiry;
pub mod error;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use answer::{Section, StructuredAnswer, NUMBERED_SECTIONS};
pub use delivery::{DeliveryJob, DeliveryReceipt, Dispatcher, Recipient, RecipientRole};
pub use enquiry::Enquiry;
pub use error::{Error, Result};
pub use message::{Message, Role};
pub use provider::{
    EmbeddingRequest, EmbeddingResponse, Provider, ProviderRequest, ProviderResponse, Usage,
};
