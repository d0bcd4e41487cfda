//! The Ledgerbrief answer pipeline.
//!
//! Three stages, strictly sequential per enquiry:
//!
//! 1. [`prompt::compose`] interpolates the enquiry and retrieved context
//!    into the fixed instruction template.
//! 2. [`generator::Generator`] drafts an answer through the configured
//!    provider and conditionally reviews it under a domain instruction.
//! 3. [`structurer::structure`] parses the final text into named document
//!    sections for rendering.
//!
//! Nothing here touches the filesystem or the network beyond the provider
//! trait, which keeps every stage testable with scripted mocks.

pub mod generator;
pub mod prompt;
pub mod structurer;
pub mod test_support;

pub use generator::{strip_echoed_query, Generator};
pub use prompt::{compose, CONTEXT_HEADING};
pub use structurer::structure;
