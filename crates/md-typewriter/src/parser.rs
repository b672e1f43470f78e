//! The parsing half of the pipeline: fragments in, render units out.

use crate::accumulator::ChunkAccumulator;
use crate::block::BlockClassifier;
use crate::element::{LineRun, RenderUnit};
use crate::inline::parse_inline;
use crate::queue::RenderQueue;
use tracing::debug;

/// Incremental markdown parser for streaming input.
///
/// Owns the chunk accumulator, the block classifier and the render queue.
/// Units are produced as soon as the lines they depend on are complete; a
/// paragraph is only emitted once a heading or the end of the stream closes
/// it.
pub struct StreamParser {
    accumulator: ChunkAccumulator,
    classifier: BlockClassifier,
    queue: RenderQueue,

    /// Set once the stream has ended
    finalized: bool,
}

impl StreamParser {
    pub fn new() -> Self {
        Self {
            accumulator: ChunkAccumulator::new(),
            classifier: BlockClassifier::new(),
            queue: RenderQueue::new(),
            finalized: false,
        }
    }

    /// Push a text fragment. Returns how many units were enqueued.
    pub fn push(&mut self, fragment: &str) -> usize {
        if self.finalized {
            debug!("ignoring fragment pushed after finalize");
            return 0;
        }
        if fragment.is_empty() {
            return 0;
        }

        let lines = self.accumulator.ingest(fragment);
        self.process(&lines, false)
    }

    /// Push raw bytes, decoded as streaming UTF-8.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> usize {
        if self.finalized {
            debug!("ignoring bytes pushed after finalize");
            return 0;
        }

        let lines = self.accumulator.ingest_bytes(bytes);
        self.process(&lines, false)
    }

    /// End of stream: the held-back tail becomes the final line and any
    /// open paragraph is flushed. Calling this twice is a no-op.
    pub fn finalize(&mut self) -> usize {
        if self.finalized {
            return 0;
        }
        self.finalized = true;

        let tail = self.accumulator.finalize();
        self.process(&[tail], true)
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// The incomplete line held back from classification.
    pub fn pending_tail(&self) -> &str {
        self.accumulator.pending_tail()
    }

    pub fn queue(&self) -> &RenderQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut RenderQueue {
        &mut self.queue
    }

    fn process(&mut self, lines: &[String], is_final: bool) -> usize {
        let before = self.queue.len();
        for run in self.classifier.classify(lines, is_final) {
            self.emit(run);
        }
        let added = self.queue.len() - before;
        if added > 0 {
            debug!("enqueued {added} render units from {} lines", lines.len());
        }
        added
    }

    // Every run ends with a break, so the break closing the previous run is
    // also the one separating it from a following heading.
    fn emit(&mut self, run: LineRun) {
        match run {
            LineRun::Heading { level, text } => {
                self.queue.push(RenderUnit::Heading { level, text });
                self.queue.push(RenderUnit::ParagraphBreak);
            }

            LineRun::Paragraph(text) => {
                self.queue
                    .enqueue(parse_inline(&text).into_iter().map(RenderUnit::Text));
                self.queue.push(RenderUnit::ParagraphBreak);
            }
        }
    }
}

impl Default for StreamParser {
    fn default() -> Self {
        Self::new()
    }
}
