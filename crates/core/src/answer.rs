//! StructuredAnswer — the named-section decomposition of a model reply.
//!
//! Section identity is the case-insensitive trimmed title. First occurrence
//! fixes a section's position and display title; a later occurrence of the
//! same normalized title replaces the body (last-write-wins). Iteration
//! order is first-seen order, which is also the order the renderer walks.

/// Section titles rendered as numbered lists rather than paragraphs.
/// Matched by exact display title.
pub const NUMBERED_SECTIONS: [&str; 2] = ["Action Sheet", "Policy Notes"];

/// One named section of a structured answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Display title, as first seen (trimmed, original casing).
    pub title: String,

    /// Body text, trimmed.
    pub body: String,
}

/// An ordered mapping from section title to section body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredAnswer {
    sections: Vec<Section>,
}

fn normalized(title: &str) -> String {
    title.trim().to_lowercase()
}

impl StructuredAnswer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a section, or replace the body of an existing one.
    ///
    /// The existing section keeps its position and its first-seen title.
    pub fn upsert(&mut self, title: impl Into<String>, body: impl Into<String>) {
        let title = title.into();
        let body = body.into();
        let key = normalized(&title);
        match self.sections.iter_mut().find(|s| normalized(&s.title) == key) {
            Some(section) => section.body = body,
            None => self.sections.push(Section {
                title: title.trim().to_string(),
                body,
            }),
        }
    }

    /// Rewrite the display title of the section matching `from`
    /// (case-insensitive). Positions and bodies are untouched.
    pub fn rename(&mut self, from: &str, to: &str) {
        let key = normalized(from);
        for section in &mut self.sections {
            if normalized(&section.title) == key {
                section.title = to.to_string();
            }
        }
    }

    /// Sections in first-seen order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Body of the section with the given title (case-insensitive), if any.
    pub fn get(&self, title: &str) -> Option<&str> {
        let key = normalized(title);
        self.sections
            .iter()
            .find(|s| normalized(&s.title) == key)
            .map(|s| s.body.as_str())
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
