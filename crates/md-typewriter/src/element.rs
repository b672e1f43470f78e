//! Values flowing through the pipeline.

/// A run of inline text with a single emphasis state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub emphasized: bool,
}

impl Span {
    pub fn new(text: impl Into<String>, emphasized: bool) -> Self {
        Self {
            text: text.into(),
            emphasized,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    pub fn strong(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }
}

/// A classified group of lines, before inline parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRun {
    /// Heading with level (1-6) and trimmed display text
    Heading { level: u8, text: String },

    /// Consecutive non-heading lines joined by single spaces
    Paragraph(String),
}

/// The smallest schedulable piece of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderUnit {
    Text(Span),
    Heading { level: u8, text: String },
    ParagraphBreak,
}

/// Kind of container a document sink is asked to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Paragraph,
    Heading(u8),
}

impl ContainerKind {
    pub fn is_paragraph(&self) -> bool {
        matches!(self, ContainerKind::Paragraph)
    }
}
