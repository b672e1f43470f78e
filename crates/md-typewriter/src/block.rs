//! Block-level classification: headings versus paragraph runs.

use crate::element::LineRun;
use tracing::debug;

/// Highest heading level; deeper markers clamp to it.
const MAX_HEADING_LEVEL: usize = 6;

/// Splits complete lines into headings and merged paragraph runs.
///
/// Consecutive non-heading lines merge into one paragraph. The paragraph
/// being built is carried across calls until a heading or the final batch
/// closes it, so the output does not depend on how lines were batched.
#[derive(Debug, Default)]
pub struct BlockClassifier {
    paragraph: String,
}

impl BlockClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a batch of complete lines.
    pub fn classify<S: AsRef<str>>(&mut self, lines: &[S], is_final: bool) -> Vec<LineRun> {
        let mut runs = Vec::new();

        for line in lines {
            let line = line.as_ref();
            match heading_marker(line) {
                Some((level, text)) => {
                    self.flush(&mut runs);
                    runs.push(LineRun::Heading {
                        level,
                        text: text.to_string(),
                    });
                }
                None => self.append(line),
            }
        }

        if is_final {
            self.flush(&mut runs);
        }

        runs
    }

    /// Text of the paragraph still waiting for a heading or end of stream.
    pub fn pending_paragraph(&self) -> &str {
        &self.paragraph
    }

    fn append(&mut self, line: &str) {
        // blank lines add nothing and do not end the paragraph
        if line.trim().is_empty() {
            return;
        }
        if !self.paragraph.is_empty() {
            self.paragraph.push(' ');
        }
        self.paragraph.push_str(line);
    }

    fn flush(&mut self, runs: &mut Vec<LineRun>) {
        if self.paragraph.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.paragraph);
        debug!("flushing paragraph run ({} bytes)", text.len());
        runs.push(LineRun::Paragraph(text));
    }
}

/// Detect a heading line, returning its level and trimmed display text.
///
/// A heading is one or more `#` at the start of the trimmed line, followed
/// by whitespace or the end of the line.
pub fn heading_marker(line: &str) -> Option<(u8, &str)> {
    let trimmed = line.trim();
    let hashes = trimmed.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 {
        return None;
    }

    let rest = &trimmed[hashes..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let level = hashes.min(MAX_HEADING_LEVEL) as u8;
    Some((level, rest.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_marker() {
        assert_eq!(heading_marker("# Title"), Some((1, "Title")));
        assert_eq!(heading_marker("  ###   Sub  "), Some((3, "Sub")));
        assert_eq!(heading_marker("##"), Some((2, "")));
        assert_eq!(heading_marker("#\tTabbed"), Some((1, "Tabbed")));
        assert_eq!(heading_marker("######## deep"), Some((6, "deep")));
        assert_eq!(heading_marker("#hashtag"), None);
        assert_eq!(heading_marker("no # heading"), None);
        assert_eq!(heading_marker(""), None);
    }

    #[test]
    fn test_paragraph_carried_across_batches() {
        let mut classifier = BlockClassifier::new();
        assert!(classifier.classify(&["Hello"], false).is_empty());
        assert_eq!(classifier.pending_paragraph(), "Hello");

        let runs = classifier.classify(&["world"], true);
        assert_eq!(runs, vec![LineRun::Paragraph("Hello world".to_string())]);
        assert_eq!(classifier.pending_paragraph(), "");
    }

    #[test]
    fn test_heading_flushes_paragraph_first() {
        let mut classifier = BlockClassifier::new();
        let runs = classifier.classify(&["intro", "## Part", "body"], false);
        assert_eq!(
            runs,
            vec![
                LineRun::Paragraph("intro".to_string()),
                LineRun::Heading {
                    level: 2,
                    text: "Part".to_string()
                },
            ]
        );
        assert_eq!(classifier.pending_paragraph(), "body");
    }

    #[test]
    fn test_blank_lines_contribute_nothing() {
        let mut classifier = BlockClassifier::new();
        let runs = classifier.classify(&["one", "", "   ", "two", ""], true);
        assert_eq!(runs, vec![LineRun::Paragraph("one two".to_string())]);
    }

    #[test]
    fn test_only_blank_lines_produce_nothing() {
        let mut classifier = BlockClassifier::new();
        assert!(classifier.classify(&["", " "], true).is_empty());
    }
}
