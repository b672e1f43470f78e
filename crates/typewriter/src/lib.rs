//! Host for the md-typewriter pipeline: reads a stream of chunk and progress
//! events and types the resulting document into a terminal.

mod args;
pub mod config;
mod error;
pub mod event;
mod logging;
pub mod session;
pub mod sink;
pub mod source;

pub use args::{Args, USAGE};
pub use config::Config;
pub use error::Error;
pub use event::{SseDecoder, StreamEvent};
pub use logging::setup_logging;
pub use session::{Session, SessionEvent, StreamState};
pub use sink::{TerminalSink, Tee};
pub use source::{ChunkSource, InputFormat, ReaderSource, ScriptedSource, SourceEvent};

use md_typewriter::{DocumentSink, DocumentTree};
use std::io::IsTerminal;
use std::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Open the configured input and start streaming it.
pub async fn open_source(config: &Config) -> Result<mpsc::Receiver<SourceEvent>, Error> {
    let format = config.input_format();

    let rx = match &config.input {
        Some(path) => {
            let file = tokio::fs::File::open(path).await?;
            let len = file.metadata().await?.len();
            tracing::info!("streaming {} ({len} bytes, {format:?})", path.display());
            ReaderSource::new(file, format)
                .fragment_size(config.fragment_size)
                .delay(config.delay)
                .total_len(len)
                .stream()
        }
        None => {
            tracing::info!("streaming stdin ({format:?})");
            ReaderSource::new(tokio::io::stdin(), format)
                .fragment_size(config.fragment_size)
                .delay(config.delay)
                .stream()
        }
    };

    Ok(rx)
}

/// Drive a session once per frame until it is done, reporting status
/// changes through `on_event`.
pub async fn drive<S: DocumentSink>(
    session: &mut Session<S>,
    frame: std::time::Duration,
    mut on_event: impl FnMut(&SessionEvent),
) {
    let mut frames = tokio::time::interval(frame.max(config::MIN_FRAME));
    // a slow sink must never lead to several units in one frame
    frames.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        frames.tick().await;
        for event in session.frame() {
            on_event(&event);
        }
        if session.is_done() {
            break;
        }
    }
}

/// Stream the configured input into the terminal.
pub async fn run(config: Config) -> Result<(), Error> {
    let rx = open_source(&config).await?;

    let stdout = std::io::stdout();
    let ansi = stdout.is_terminal();
    let sink = Tee::new(TerminalSink::new(stdout).with_ansi(ansi), DocumentTree::new());
    let mut session = Session::new(sink, rx);

    let mut last_status = String::new();
    drive(&mut session, config.frame, |event| match event {
        SessionEvent::Status(status) => {
            if *status != last_status {
                tracing::info!("{status}");
                last_status = status.clone();
            }
        }
        SessionEvent::Completed => tracing::info!("document ready"),
        SessionEvent::Failed(status) => tracing::error!("{status}"),
    })
    .await;

    let failure = match session.state() {
        StreamState::Aborted => Some(Error::Transport(session.status().to_string())),
        _ if session.is_failed() => Some(Error::Generation(session.status().to_string())),
        _ => None,
    };
    let Tee {
        first: mut terminal,
        second: document,
    } = session.into_sink();
    terminal.finish();

    if let Some(path) = &config.html_out {
        tokio::fs::write(path, document.to_html()).await?;
        tracing::info!("wrote {}", path.display());
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
