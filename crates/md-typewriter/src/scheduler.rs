//! Materializes queued render units into a document, one per tick.

use crate::element::{ContainerKind, RenderUnit};
use crate::queue::RenderQueue;

/// The mutable display surface render units are written into.
///
/// Terminal renderers, GUI trees or HTML documents all fit behind these
/// three operations.
pub trait DocumentSink {
    /// Handle to a container previously opened on this sink.
    type Container: Copy;

    /// Open a new container at the end of the document.
    fn open_container(&mut self, kind: ContainerKind) -> Self::Container;

    /// Append a run of text to an open container.
    fn append_text(&mut self, container: Self::Container, text: &str, emphasized: bool);

    /// Whether the container holds no non-whitespace text.
    fn is_blank(&self, container: Self::Container) -> bool;
}

/// Cooperative consumer of the render queue.
///
/// The host calls [`RenderScheduler::tick`] once per animation frame until it
/// returns false, then idles until more units are enqueued. Each tick
/// materializes exactly one unit, in queue order.
pub struct RenderScheduler<S: DocumentSink> {
    sink: S,

    /// Most recently opened container and its kind
    current: Option<(S::Container, ContainerKind)>,

    /// Units materialized so far
    rendered: usize,
}

impl<S: DocumentSink> RenderScheduler<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            current: None,
            rendered: 0,
        }
    }

    /// Dequeue and materialize one unit. Returns false if the queue was empty.
    pub fn tick(&mut self, queue: &mut RenderQueue) -> bool {
        let Some(unit) = queue.pop() else {
            return false;
        };

        self.materialize(unit);
        self.rendered += 1;
        true
    }

    fn materialize(&mut self, unit: RenderUnit) {
        match unit {
            RenderUnit::Text(span) => {
                let container = match self.current {
                    Some((container, ContainerKind::Paragraph)) => container,
                    _ => self.open(ContainerKind::Paragraph),
                };
                self.sink.append_text(container, &span.text, span.emphasized);
            }

            RenderUnit::Heading { level, text } => {
                let container = self.open(ContainerKind::Heading(level));
                self.sink.append_text(container, &text, false);
            }

            RenderUnit::ParagraphBreak => {
                // only a paragraph with visible content gets closed, so
                // repeated breaks never stack up empty paragraphs
                if let Some((container, ContainerKind::Paragraph)) = self.current {
                    if !self.sink.is_blank(container) {
                        self.open(ContainerKind::Paragraph);
                    }
                }
            }
        }
    }

    fn open(&mut self, kind: ContainerKind) -> S::Container {
        let container = self.sink.open_container(kind);
        self.current = Some((container, kind));
        container
    }

    /// Number of units materialized so far.
    pub fn rendered(&self) -> usize {
        self.rendered
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
