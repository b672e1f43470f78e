//! Incremental markdown pipeline for streamed text.
//!
//! Fragments arrive with arbitrary boundaries. Complete lines are classified
//! into headings and paragraph runs, paragraphs are split into emphasis
//! spans, and the result is queued as render units that a host drains one
//! per animation frame to produce a "typing" effect.

mod accumulator;
mod block;
mod document;
mod element;
mod inline;
mod parser;
mod progress;
mod queue;
mod scheduler;

pub use accumulator::{ChunkAccumulator, Utf8Decoder};
pub use block::{heading_marker, BlockClassifier};
pub use document::{Block, DocumentTree};
pub use element::{ContainerKind, LineRun, RenderUnit, Span};
pub use inline::parse_inline;
pub use parser::StreamParser;
pub use progress::{ProgressTracker, ProgressUpdate, INITIAL_STATUS};
pub use queue::RenderQueue;
pub use scheduler::{DocumentSink, RenderScheduler};
