//! In-memory document sink.

use crate::element::{ContainerKind, Span};
use crate::scheduler::DocumentSink;

/// One container of a [`DocumentTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: ContainerKind,
    pub spans: Vec<Span>,
}

impl Block {
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn is_blank(&self) -> bool {
        self.spans.iter().all(|s| s.text.trim().is_empty())
    }
}

/// A flat list of paragraphs and headings, built by the render scheduler.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DocumentTree {
    blocks: Vec<Block>,
}

impl DocumentTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Blocks that hold visible text.
    pub fn visible_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| !b.is_blank())
    }

    /// Plain text of the document, one blank line between blocks.
    pub fn text_content(&self) -> String {
        self.visible_blocks()
            .map(|b| b.text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Render as an HTML fragment. Blank paragraphs are omitted.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for block in self.visible_blocks() {
            let tag = match block.kind {
                ContainerKind::Paragraph => "p".to_string(),
                ContainerKind::Heading(level) => format!("h{level}"),
            };
            html.push('<');
            html.push_str(&tag);
            html.push('>');
            for span in &block.spans {
                if span.emphasized {
                    html.push_str("<strong>");
                    push_escaped(&mut html, &span.text);
                    html.push_str("</strong>");
                } else {
                    push_escaped(&mut html, &span.text);
                }
            }
            html.push_str("</");
            html.push_str(&tag);
            html.push_str(">\n");
        }
        html
    }
}

impl DocumentSink for DocumentTree {
    type Container = usize;

    fn open_container(&mut self, kind: ContainerKind) -> usize {
        self.blocks.push(Block {
            kind,
            spans: Vec::new(),
        });
        self.blocks.len() - 1
    }

    fn append_text(&mut self, container: usize, text: &str, emphasized: bool) {
        if let Some(block) = self.blocks.get_mut(container) {
            block.spans.push(Span::new(text, emphasized));
        }
    }

    fn is_blank(&self, container: usize) -> bool {
        self.blocks.get(container).map_or(true, Block::is_blank)
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
