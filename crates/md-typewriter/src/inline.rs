//! Inline emphasis parsing.

use crate::element::Span;

/// Split paragraph text into spans on the `**` emphasis toggle.
///
/// Each `**` flips the emphasis state and is never emitted as text. An
/// unterminated toggle leaves the rest of `text` emphasized; the state is
/// local to this call. There is no escaping: `\**` still toggles.
pub fn parse_inline(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut emphasized = false;
    let mut rest = text;

    while let Some(pos) = rest.find("**") {
        push_span(&mut spans, &rest[..pos], emphasized);
        emphasized = !emphasized;
        rest = &rest[pos + 2..];
    }
    push_span(&mut spans, rest, emphasized);

    spans
}

fn push_span(spans: &mut Vec<Span>, text: &str, emphasized: bool) {
    if !text.is_empty() {
        spans.push(Span::new(text, emphasized));
    }
}
