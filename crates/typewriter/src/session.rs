//! One streaming generation: source events in, typed document out.

use crate::event::StreamEvent;
use crate::source::SourceEvent;
use md_typewriter::{DocumentSink, ProgressTracker, RenderScheduler, StreamParser};
use std::sync::mpsc::{self, TryRecvError};

pub const TRANSPORT_FAILED: &str = "An error occurred while generating the document.";

/// Something the progress surface should show.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Status(String),

    /// Progress reached 100. Fired once.
    Completed,

    /// Terminal failure; the status is frozen from here on.
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Streaming,
    Finished,
    Aborted,
}

pub struct Session<S: DocumentSink> {
    parser: StreamParser,
    progress: ProgressTracker,
    scheduler: RenderScheduler<S>,
    incoming: Option<mpsc::Receiver<SourceEvent>>,
    state: StreamState,
}

impl<S: DocumentSink> Session<S> {
    pub fn new(sink: S, incoming: mpsc::Receiver<SourceEvent>) -> Self {
        Self {
            parser: StreamParser::new(),
            progress: ProgressTracker::new(),
            scheduler: RenderScheduler::new(sink),
            incoming: Some(incoming),
            state: StreamState::Streaming,
        }
    }

    /// Drain whatever the source has delivered, without blocking.
    pub fn process_events(&mut self) -> Vec<SessionEvent> {
        let mut out = Vec::new();

        // Take the receiver out to avoid borrow conflicts
        let Some(recvr) = self.incoming.take() else {
            return out;
        };

        loop {
            match recvr.try_recv() {
                Ok(SourceEvent::Event(event)) => self.handle_event(event, &mut out),

                Ok(SourceEvent::Failed(err)) => {
                    tracing::error!("stream failed: {err}");
                    self.state = StreamState::Aborted;
                    let status = self.progress.fail(TRANSPORT_FAILED).to_string();
                    out.push(SessionEvent::Failed(status));
                    // no finalize: what is queued stays, nothing more is produced
                    return out;
                }

                Err(TryRecvError::Empty) => break,

                Err(TryRecvError::Disconnected) => {
                    let added = self.parser.finalize();
                    tracing::debug!("stream ended, {added} units flushed");
                    self.state = StreamState::Finished;
                    return out;
                }
            }
        }

        // Put the receiver back
        self.incoming = Some(recvr);
        out
    }

    fn handle_event(&mut self, event: StreamEvent, out: &mut Vec<SessionEvent>) {
        if let Some(text) = event.text() {
            self.parser.push(text);
        }

        let Some(percent) = event.progress else {
            return;
        };

        if event.is_terminal_without_chunk() {
            let reason = event.status.as_deref().unwrap_or("no content received");
            tracing::error!("generation ended without content: {reason}");
            if self.progress.is_failed() {
                return;
            }
            // the stream still reached 100, so the completion action is
            // offered for whatever content did arrive
            let update = self.progress.update(percent);
            let status = self
                .progress
                .fail(&format!("Generation failed: {reason}"))
                .to_string();
            out.push(SessionEvent::Failed(status));
            if update.completed {
                out.push(SessionEvent::Completed);
            }
            return;
        }

        if self.progress.is_failed() {
            return;
        }

        let update = self.progress.update(percent);
        out.push(SessionEvent::Status(update.status));
        if update.completed {
            tracing::info!("generation complete");
            out.push(SessionEvent::Completed);
        }
    }

    /// One animation frame: take in new events, then type one unit.
    pub fn frame(&mut self) -> Vec<SessionEvent> {
        let events = self.process_events();
        self.scheduler.tick(self.parser.queue_mut());
        events
    }

    /// The stream is over and every queued unit has been typed.
    pub fn is_done(&self) -> bool {
        self.state != StreamState::Streaming && self.parser.queue().is_empty()
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn status(&self) -> &str {
        self.progress.status()
    }

    /// Ready for the completion action.
    pub fn is_ready(&self) -> bool {
        self.progress.is_ready()
    }

    pub fn is_failed(&self) -> bool {
        self.progress.is_failed()
    }

    pub fn pending_units(&self) -> usize {
        self.parser.queue().len()
    }

    pub fn rendered(&self) -> usize {
        self.scheduler.rendered()
    }

    pub fn sink(&self) -> &S {
        self.scheduler.sink()
    }

    pub fn into_sink(self) -> S {
        self.scheduler.into_sink()
    }
}
