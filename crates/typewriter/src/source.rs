//! Chunk sources: where fragments and progress signals come from.

use crate::event::{SseDecoder, StreamEvent};
use crate::Error;
use md_typewriter::Utf8Decoder;
use std::sync::mpsc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};

/// What a source delivers to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    Event(StreamEvent),

    /// The transport itself broke. Nothing further will arrive.
    Failed(String),
}

/// How the bytes of a reader are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// `data: {json}` server-sent event lines
    #[default]
    Sse,

    /// Raw markdown, wrapped into chunk events as it is read
    Markdown,
}

/// A producer of stream events.
pub trait ChunkSource {
    /// Start streaming in the background.
    ///
    /// The stream ends when the sender side is dropped, which the receiver
    /// observes as a disconnect.
    fn stream(self) -> mpsc::Receiver<SourceEvent>;
}

/// Reads any async byte source in fixed-size fragments.
pub struct ReaderSource<R> {
    reader: R,
    format: InputFormat,
    fragment_size: usize,
    delay: Duration,
    total_len: Option<u64>,
}

impl<R> ReaderSource<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    pub fn new(reader: R, format: InputFormat) -> Self {
        Self {
            reader,
            format,
            fragment_size: 64,
            delay: Duration::ZERO,
            total_len: None,
        }
    }

    pub fn fragment_size(mut self, size: usize) -> Self {
        self.fragment_size = size.max(1);
        self
    }

    /// Pause between fragments, to simulate a slow transport.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Known input length, used to derive progress for markdown input.
    pub fn total_len(mut self, len: u64) -> Self {
        self.total_len = Some(len);
        self
    }

    async fn pump(mut self, tx: &mpsc::Sender<SourceEvent>) -> Result<(), Error> {
        let mut buf = vec![0u8; self.fragment_size];
        let mut sse = SseDecoder::new();
        let mut utf8 = Utf8Decoder::new();
        let mut held: Option<String> = None;
        let mut read_total: u64 = 0;

        loop {
            let n = self.reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            read_total += n as u64;

            match self.format {
                InputFormat::Sse => {
                    for event in sse.push_bytes(&buf[..n]) {
                        if !send(tx, SourceEvent::Event(event)) {
                            return Ok(());
                        }
                    }
                }

                InputFormat::Markdown => {
                    // hold one fragment back so the last one can carry 100%
                    let text = utf8.decode(&buf[..n]);
                    if let Some(prev) = held.replace(text) {
                        let mut event = StreamEvent::chunk(prev);
                        if let Some(total) = self.total_len.filter(|&t| t > 0) {
                            // only bytes up to the end of the released fragment
                            let sent = read_total - n as u64;
                            let percent = (sent as f64 * 100.0 / total as f64).min(99.0);
                            event = event.with_progress(percent);
                        }
                        if !send(tx, SourceEvent::Event(event)) {
                            return Ok(());
                        }
                    }
                }
            }

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        match self.format {
            InputFormat::Sse => {
                for event in sse.finish() {
                    if !send(tx, SourceEvent::Event(event)) {
                        return Ok(());
                    }
                }
            }

            InputFormat::Markdown => {
                let mut last = held.unwrap_or_default();
                last.push_str(&utf8.finish());
                let event = StreamEvent {
                    chunk: Some(last),
                    progress: Some(100.0),
                    status: None,
                };
                send(tx, SourceEvent::Event(event));
            }
        }

        tracing::debug!("chunk source finished after {read_total} bytes");
        Ok(())
    }
}

impl<R> ChunkSource for ReaderSource<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    fn stream(self) -> mpsc::Receiver<SourceEvent> {
        let (tx, rx) = mpsc::channel();

        tokio::spawn(async move {
            if let Err(err) = self.pump(&tx).await {
                tracing::error!("chunk source failed: {err}");
                let _ = tx.send(SourceEvent::Failed(err.to_string()));
            }
        });

        rx
    }
}

/// Replays a fixed list of events, one per `delay`.
pub struct ScriptedSource {
    events: Vec<SourceEvent>,
    delay: Duration,
}

impl ScriptedSource {
    pub fn new(events: Vec<SourceEvent>) -> Self {
        Self {
            events,
            delay: Duration::ZERO,
        }
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl ChunkSource for ScriptedSource {
    fn stream(self) -> mpsc::Receiver<SourceEvent> {
        let (tx, rx) = mpsc::channel();

        tokio::spawn(async move {
            for event in self.events {
                if !self.delay.is_zero() {
                    tokio::time::sleep(self.delay).await;
                }
                let failed = matches!(event, SourceEvent::Failed(_));
                if !send(&tx, event) || failed {
                    return;
                }
            }
        });

        rx
    }
}

/// Returns false once the receiving session is gone.
fn send(tx: &mpsc::Sender<SourceEvent>, event: SourceEvent) -> bool {
    if let Err(err) = tx.send(event) {
        tracing::debug!("session dropped, stopping source: {err}");
        return false;
    }
    true
}
