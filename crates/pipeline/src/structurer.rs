//! Turns free-form model output into named document sections.
//!
//! Model output is asked for `### Title` headings but arrives with every
//! kind of variance: no headings at all, text restated before the first
//! heading, greeting lines inside the reply section, repeated titles,
//! headings with nothing after the marker. The parser walks the text line
//! by line with an explicit cursor so each case is a plain transition
//! instead of a regex side effect.

use ledgerbrief_core::answer::{StructuredAnswer, NUMBERED_SECTIONS};
use regex_lite::Regex;

/// Title assigned to reply text that arrives before any heading.
const LEADING_TITLE: &str = "Enquirer Reply";

/// Display title the leading section is renamed to.
const CANONICAL_LEADING_TITLE: &str = "Initial Response";

/// What the body lines currently being collected belong to.
enum Cursor {
    /// Text before the first heading.
    Preamble,
    /// Text under a titled heading.
    Section(String),
    /// Text under a heading with an empty title. Dropped on flush.
    Discard,
}

/// Parse raw model output into an ordered section mapping.
///
/// Never fails: input with no headings (or where every heading discards its
/// body) collapses into a single "Initial Response" section holding the
/// trimmed input verbatim. With headings present, preamble text becomes the
/// leading reply section with greeting boilerplate stripped, and a repeated
/// title keeps its first position but takes the latest body.
pub fn structure(raw: &str) -> StructuredAnswer {
    let mut answer = StructuredAnswer::new();

    if !raw.lines().any(|line| heading_title(line).is_some()) {
        answer.upsert(CANONICAL_LEADING_TITLE, raw.trim());
        return answer;
    }

    let mut cursor = Cursor::Preamble;
    let mut buffer: Vec<&str> = Vec::new();

    for line in raw.lines() {
        match heading_title(line) {
            Some(title) => {
                flush(&mut answer, &cursor, &buffer);
                buffer.clear();
                cursor = if title.is_empty() {
                    Cursor::Discard
                } else {
                    Cursor::Section(title.to_string())
                };
            }
            None => buffer.push(line),
        }
    }
    flush(&mut answer, &cursor, &buffer);

    if answer.is_empty() {
        answer.upsert(CANONICAL_LEADING_TITLE, raw.trim());
        return answer;
    }

    answer.rename(LEADING_TITLE, CANONICAL_LEADING_TITLE);
    answer
}

/// A heading is a line starting with `### ` at column zero. Returns the
/// trimmed title text, which may be empty.
fn heading_title(line: &str) -> Option<&str> {
    line.strip_prefix("### ").map(str::trim)
}

fn flush(answer: &mut StructuredAnswer, cursor: &Cursor, buffer: &[&str]) {
    match cursor {
        Cursor::Discard => {}
        Cursor::Preamble => {
            let raw_body = buffer.join("\n").trim().to_string();
            if !raw_body.is_empty() {
                answer.upsert(LEADING_TITLE, strip_leading_boilerplate(&raw_body));
            }
        }
        Cursor::Section(title) => {
            let body = buffer.join("\n");
            let body = if is_reply_title(title) {
                drop_greeting_lines(&body)
            } else if NUMBERED_SECTIONS.contains(&title.as_str()) {
                normalize_list_body(&body)
            } else {
                body.trim().to_string()
            };
            answer.upsert(title.clone(), body);
        }
    }
}

fn is_reply_title(title: &str) -> bool {
    let key = title.to_lowercase();
    key == "enquirer reply" || key == "initial response"
}

/// Strip a restated section name and a greeting from the start of the
/// leading section's body.
fn strip_leading_boilerplate(body: &str) -> String {
    let restated = Regex::new(r"(?i)^\s*enquirer reply\s*").expect("literal pattern");
    let greeting = Regex::new(r"(?i)^\s*hello,\s*").expect("literal pattern");
    let body = restated.replace(body, "");
    greeting.replace(&body, "").into_owned()
}

/// Drop lines that consist solely of a greeting or a restated reply title.
fn drop_greeting_lines(body: &str) -> String {
    let filler = Regex::new(r"(?i)^\s*(enquirer reply|hello,?)\s*$").expect("literal pattern");
    let kept: Vec<&str> = body.lines().filter(|line| !filler.is_match(line)).collect();
    kept.join("\n").trim().to_string()
}

/// Strip manual bullet or number prefixes from each line of a list section
/// and drop lines left blank, so the renderer can renumber cleanly.
fn normalize_list_body(body: &str) -> String {
    let numbered = Regex::new(r"^[-•–]?\s*\d+[.)]?\s*").expect("literal pattern");
    let bulleted = Regex::new(r"^[-•–]\s*").expect("literal pattern");

    let mut items = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        let line = numbered.replace(line, "");
        let line = bulleted.replace(&line, "");
        if !line.is_empty() {
            items.push(line.into_owned());
        }
    }
    items.join("\n")
}
