//! Server-sent event envelopes carrying chunks and progress.

use crate::Error;
use md_typewriter::ChunkAccumulator;
use serde::{Deserialize, Serialize};

/// One inbound event. A single event may carry a chunk, a progress signal,
/// or both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamEvent {
    #[serde(default)]
    pub chunk: Option<String>,

    #[serde(default)]
    pub progress: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl StreamEvent {
    pub fn chunk(text: impl Into<String>) -> Self {
        Self {
            chunk: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn progress(percent: f64) -> Self {
        Self {
            progress: Some(percent),
            ..Default::default()
        }
    }

    pub fn with_progress(mut self, percent: f64) -> Self {
        self.progress = Some(percent);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// The chunk text, if present and non-empty.
    pub fn text(&self) -> Option<&str> {
        self.chunk.as_deref().filter(|c| !c.is_empty())
    }

    /// Progress reached 100 without content: the upstream's terminal error.
    pub fn is_terminal_without_chunk(&self) -> bool {
        self.progress.is_some_and(|p| p >= 100.0) && self.text().is_none()
    }

    /// Encode as a `data:` line followed by the blank separator line.
    pub fn to_sse(&self) -> Result<String, Error> {
        Ok(format!("data: {}\n\n", serde_json::to_string(self)?))
    }
}

/// Decode one SSE line. Non-`data:` lines yield `Ok(None)`.
pub fn decode_line(line: &str) -> Result<Option<StreamEvent>, Error> {
    let Some(payload) = line.strip_prefix("data:") else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_str(payload.trim_start())?))
}

/// Splits a byte stream into SSE lines and decodes their envelopes.
///
/// Malformed envelopes are logged and skipped; the stream continues.
#[derive(Debug, Default)]
pub struct SseDecoder {
    lines: ChunkAccumulator,
    skipped: usize,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) -> Vec<StreamEvent> {
        let lines = self.lines.ingest_bytes(bytes);
        self.decode_all(lines)
    }

    /// End of input: decode a final line that had no terminating newline.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let last = self.lines.finalize();
        self.decode_all(vec![last])
    }

    /// Number of malformed envelopes skipped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn decode_all(&mut self, lines: Vec<String>) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        for line in lines {
            match decode_line(&line) {
                Ok(Some(event)) => events.push(event),
                Ok(None) => {}
                Err(err) => {
                    self.skipped += 1;
                    tracing::warn!("skipping malformed event {line:?}: {err}");
                }
            }
        }
        events
    }
}
