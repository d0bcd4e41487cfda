//! Document layout planning.
//!
//! `plan_document` walks a structured answer and emits a flat sequence of
//! typed [`Block`]s. Keeping the plan separate from PDF emission means the
//! layout rules (front matter, which sections become numbered lists, the
//! fixed footer) stay testable without decoding a PDF byte stream.

use chrono::DateTime;
use chrono_tz::Tz;
use ledgerbrief_core::answer::{StructuredAnswer, NUMBERED_SECTIONS};
use regex_lite::Regex;

/// Disclaimer printed at the foot of every document.
pub const DISCLAIMER: &str = "This document was generated by Ledgerbrief Ltd using AI assistance (OpenAI). Please review for accuracy and relevance before taking any formal action.";

/// Copyright notice printed after the disclaimer.
pub const COPYRIGHT: &str = "© Ledgerbrief Ltd 2026. All rights reserved.";

/// Provenance note printed above the answer sections.
pub const AI_NOTE: &str = "Note: This report was prepared using AI analysis based on the submitted query.";

/// Timestamp format for the header and footer lines, e.g.
/// `05 March 2026 at 14:30:00 (GMT)`.
const TIME_FORMAT: &str = "%d %B %Y at %H:%M:%S (%Z)";

// ─── Blocks ─────────────────────────────────────────────────────────────────

/// One typed unit of document layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Requester title line at the top of the document.
    Title(String),
    /// Generation timestamp under the title.
    Meta(String),
    /// Fixed front-matter heading such as `ORIGINAL QUERY`.
    Heading(String),
    /// Horizontal rule.
    Divider,
    /// The original query, quoted and set in italics.
    Quote(String),
    /// Provenance note, set in bold.
    Note(String),
    /// Uppercased per-section heading.
    SectionHeading(String),
    /// Flowing body text.
    Paragraph(String),
    /// One entry of a numbered list.
    NumberedItem(u32, String),
    /// Vertical gap before the footer.
    Spacer,
}

// ─── Planning ───────────────────────────────────────────────────────────────

/// Lay out a structured answer as a complete report.
///
/// Front matter (title, timestamp, quoted query, provenance note) and the
/// footer (disclaimer, copyright, generation line) are fixed; only the
/// section blocks in between depend on the answer. Sections whose title
/// appears in [`NUMBERED_SECTIONS`] are renumbered as lists, everything
/// else flows as a paragraph with emphasis markers removed.
pub fn plan_document(
    answer: &StructuredAnswer,
    query: &str,
    requester: &str,
    generated_at: DateTime<Tz>,
) -> Vec<Block> {
    let stamp = generated_at.format(TIME_FORMAT);
    let mut blocks = vec![
        Block::Title(format!("RESPONSE FOR {}", requester.to_uppercase())),
        Block::Meta(format!("Generated: {stamp}")),
        Block::Heading("ORIGINAL QUERY".to_string()),
        Block::Divider,
        Block::Quote(format!("\"{}\"", query.trim())),
        Block::Divider,
        Block::Heading("AI RESPONSE".to_string()),
        Block::Note(AI_NOTE.to_string()),
    ];

    for section in answer.sections() {
        blocks.push(Block::SectionHeading(section.title.to_uppercase()));
        if NUMBERED_SECTIONS.contains(&section.title.as_str()) {
            for (i, entry) in list_entries(&section.body).into_iter().enumerate() {
                blocks.push(Block::NumberedItem(i as u32 + 1, entry));
            }
        } else {
            blocks.push(Block::Paragraph(strip_emphasis(&section.body)));
        }
    }

    blocks.push(Block::Spacer);
    blocks.push(Block::Divider);
    blocks.push(Block::Paragraph(DISCLAIMER.to_string()));
    blocks.push(Block::Paragraph(COPYRIGHT.to_string()));
    blocks.push(Block::Meta(format!("Report generated on {stamp}")));
    blocks
}

/// Extract list entries from a section body, tolerating any mix of
/// numbering and bullet markers the model produced. Entries come back
/// bare so the caller can renumber from 1.
fn list_entries(body: &str) -> Vec<String> {
    let numbered = Regex::new(r"^[-•–]?\s*\d+[.)]?\s*").expect("literal pattern");
    let bulleted = Regex::new(r"^[-•–]\s*").expect("literal pattern");
    body.lines()
        .filter_map(|line| {
            let line = line.trim();
            let line = numbered.replace(line, "");
            let line = bulleted.replace(&line, "").into_owned();
            if line.is_empty() { None } else { Some(line) }
        })
        .collect()
}

/// Remove `**bold**` emphasis markers, keeping the inner text.
fn strip_emphasis(body: &str) -> String {
    let emphasis = Regex::new(r"\*\*(.*?)\*\*").expect("literal pattern");
    emphasis.replace_all(body, "$1").into_owned()
}

// ─── Tests ──────────────────────────────────────────────────────────────────
