//! Report rendering: layout planning, PDF emission and durable output.
//!
//! The stages are deliberately separate. [`plan`] turns a structured answer
//! into typed layout blocks, [`pdf`] typesets those blocks onto A4 pages,
//! and [`output`] decides where the finished document lives on disk.

pub mod output;
pub mod pdf;
pub mod plan;

pub use output::{document_path, write_document};
pub use pdf::render_pdf;
pub use plan::{plan_document, Block, AI_NOTE, COPYRIGHT, DISCLAIMER};
