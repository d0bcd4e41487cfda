//! PDF emission.
//!
//! Walks a block plan and typesets it onto A4 pages with the built-in
//! Helvetica faces. Text is word-wrapped to a fixed column width and a new
//! page is started whenever the cursor runs out of room.

use std::io::BufWriter;

use ledgerbrief_core::error::RenderError;
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point,
};
use tracing::debug;

use crate::plan::Block;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_X: f32 = 20.0;
const TOP_START: f32 = 277.0;
const BOTTOM_MARGIN: f32 = 18.0;
const BODY_WRAP: usize = 88;
const LIST_WRAP: usize = 84;

/// Render a planned document to PDF bytes.
pub fn render_pdf(title: &str, blocks: &[Block]) -> Result<Vec<u8>, RenderError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(emission)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(emission)?;
    let italic = doc
        .add_builtin_font(BuiltinFont::HelveticaOblique)
        .map_err(emission)?;

    let mut emitter = Emitter {
        doc: &doc,
        layer: doc.get_page(first_page).get_layer(first_layer),
        regular,
        bold,
        italic,
        y: Mm(TOP_START),
    };
    for block in blocks {
        emitter.emit(block);
    }

    let mut buffer = BufWriter::new(Vec::new());
    doc.save(&mut buffer).map_err(emission)?;
    let bytes = buffer.into_inner().map_err(emission)?;
    debug!(blocks = blocks.len(), bytes = bytes.len(), "Document rendered");
    Ok(bytes)
}

fn emission<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Emission(err.to_string())
}

// ─── Page cursor ────────────────────────────────────────────────────────────

#[derive(Copy, Clone)]
enum Face {
    Regular,
    Bold,
    Italic,
}

struct Emitter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    y: Mm,
}

impl Emitter<'_> {
    fn emit(&mut self, block: &Block) {
        match block {
            Block::Title(text) => {
                self.line(text, 14.0, Face::Bold, Mm(MARGIN_X), Mm(9.0));
                self.y -= Mm(2.0);
            }
            Block::Meta(text) => {
                self.line(text, 10.0, Face::Regular, Mm(MARGIN_X), Mm(7.0));
            }
            Block::Heading(text) => {
                self.line(text, 11.0, Face::Bold, Mm(MARGIN_X), Mm(6.0));
            }
            Block::Divider => self.rule(),
            Block::Quote(text) => self.text_block(text, 11.0, Face::Italic),
            Block::Note(text) => self.text_block(text, 10.0, Face::Bold),
            Block::SectionHeading(text) => {
                self.y -= Mm(2.0);
                self.line(text, 12.0, Face::Bold, Mm(MARGIN_X), Mm(7.0));
            }
            Block::Paragraph(text) => self.text_block(text, 11.0, Face::Regular),
            Block::NumberedItem(number, text) => {
                let entry = format!("{number}. {text}");
                for line in wrap_block(&entry, LIST_WRAP) {
                    self.line(&line, 11.0, Face::Regular, Mm(MARGIN_X + 5.0), Mm(5.0));
                }
            }
            Block::Spacer => self.y -= Mm(5.0),
        }
    }

    fn line(&mut self, text: &str, size: f32, face: Face, x: Mm, leading: Mm) {
        self.ensure_room(leading);
        let font = match face {
            Face::Regular => self.regular.clone(),
            Face::Bold => self.bold.clone(),
            Face::Italic => self.italic.clone(),
        };
        self.layer.use_text(text, size, x, self.y, &font);
        self.y -= leading;
    }

    fn text_block(&mut self, text: &str, size: f32, face: Face) {
        for line in wrap_block(text, BODY_WRAP) {
            self.line(&line, size, face, Mm(MARGIN_X), Mm(5.0));
        }
        self.y -= Mm(2.0);
    }

    fn rule(&mut self) {
        self.ensure_room(Mm(6.0));
        let rule = Line {
            points: vec![
                (Point::new(Mm(MARGIN_X), self.y), false),
                (Point::new(Mm(PAGE_WIDTH - MARGIN_X), self.y), false),
            ],
            is_closed: false,
        };
        self.layer.set_outline_thickness(0.6);
        self.layer.add_line(rule);
        self.y -= Mm(6.0);
    }

    fn ensure_room(&mut self, needed: Mm) {
        if self.y - needed < Mm(BOTTOM_MARGIN) {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = Mm(TOP_START);
        }
    }
}

// ─── Wrapping ───────────────────────────────────────────────────────────────

/// Wrap multi-line text, preserving source line breaks. Blank source lines
/// survive as blank output lines so vertical spacing is kept.
fn wrap_block(text: &str, max_chars: usize) -> Vec<String> {
    let mut out = Vec::new();
    for raw in text.lines() {
        out.extend(wrap_line(raw, max_chars));
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

fn wrap_line(line: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        if !current.is_empty() && current.len() + word.len() + 1 > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{plan_document, DISCLAIMER};
    use chrono::TimeZone;
    use chrono_tz::Europe::London;
    use ledgerbrief_core::answer::StructuredAnswer;

    fn sample_blocks() -> Vec<Block> {
        let mut answer = StructuredAnswer::new();
        answer.upsert("Initial Response", "Your filing deadline is nine months after year end.");
        answer.upsert("Action Sheet", "Check Companies House record\nBook a review meeting");
        let at = London.with_ymd_and_hms(2026, 2, 3, 10, 0, 0).unwrap();
        plan_document(&answer, "When are accounts due?", "Jane Doe", at)
    }

    #[test]
    fn renders_valid_pdf_bytes() {
        let bytes = render_pdf("Ledgerbrief report", &sample_blocks()).unwrap();
        assert!(bytes.len() > 500);
        assert_eq!(&bytes[0..4], b"%PDF");
    }

    #[test]
    fn long_documents_span_pages_without_error() {
        let mut blocks = sample_blocks();
        let filler = "entry text that wraps across the column and pushes the cursor down".to_string();
        for n in 0..400 {
            blocks.push(Block::NumberedItem(n + 1, filler.clone()));
        }
        let bytes = render_pdf("Ledgerbrief report", &blocks).unwrap();
        assert_eq!(&bytes[0..4], b"%PDF");
    }

    #[test]
    fn footer_text_still_renders_after_empty_body() {
        let blocks = vec![
            Block::Title("RESPONSE FOR JANE".to_string()),
            Block::Paragraph(DISCLAIMER.to_string()),
        ];
        let bytes = render_pdf("Ledgerbrief report", &blocks).unwrap();
        assert_eq!(&bytes[0..4], b"%PDF");
    }

    #[test]
    fn wrap_line_respects_width() {
        let lines = wrap_line("one two three four five six", 9);
        assert_eq!(lines, vec!["one two", "three", "four five", "six"]);
    }

    #[test]
    fn wrap_line_keeps_empty_input_as_blank_line() {
        assert_eq!(wrap_line("", 40), vec![String::new()]);
    }

    #[test]
    fn wrap_block_preserves_source_breaks() {
        let lines = wrap_block("first line\n\nsecond line", 40);
        assert_eq!(lines, vec!["first line", "", "second line"]);
    }
}
