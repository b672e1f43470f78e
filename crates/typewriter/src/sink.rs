//! Document sinks for the host.

use md_typewriter::{ContainerKind, DocumentSink};
use std::io::Write;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Types the document into a terminal as units arrive.
///
/// The terminal is append-only, so only the most recent container can be
/// written to. Containers are separated by a blank line once they receive
/// text; containers that stay empty leave no trace.
pub struct TerminalSink<W: Write> {
    out: W,
    ansi: bool,

    /// Id and kind of the most recently opened container
    current: Option<(usize, ContainerKind)>,
    opened: usize,

    /// Whether the current container has visible text yet
    current_blank: bool,

    /// Whether anything was written to the current container yet
    current_started: bool,

    wrote_any: bool,
    broken: bool,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            ansi: true,
            current: None,
            opened: 0,
            current_blank: true,
            current_started: false,
            wrote_any: false,
            broken: false,
        }
    }

    /// Enable or disable ANSI styling.
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// Terminate the last line.
    pub fn finish(&mut self) {
        if self.wrote_any {
            self.write("\n");
            self.flush();
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, s: &str) {
        if self.broken {
            return;
        }
        if let Err(err) = self.out.write_all(s.as_bytes()) {
            tracing::warn!("terminal output failed, dropping further output: {err}");
            self.broken = true;
        }
    }

    fn flush(&mut self) {
        if self.broken {
            return;
        }
        if let Err(err) = self.out.flush() {
            tracing::warn!("terminal flush failed: {err}");
            self.broken = true;
        }
    }

    fn start_container(&mut self, kind: ContainerKind) {
        if self.wrote_any {
            self.write("\n\n");
        }
        if let ContainerKind::Heading(level) = kind {
            let marker = "#".repeat(level as usize);
            self.styled(&marker, true);
            self.write(" ");
        }
        self.current_started = true;
        self.wrote_any = true;
    }

    fn styled(&mut self, text: &str, bold: bool) {
        if bold && self.ansi {
            self.write(BOLD);
            self.write(text);
            self.write(RESET);
        } else {
            self.write(text);
        }
    }
}

impl<W: Write> DocumentSink for TerminalSink<W> {
    type Container = usize;

    fn open_container(&mut self, kind: ContainerKind) -> usize {
        self.opened += 1;
        self.current = Some((self.opened, kind));
        self.current_blank = true;
        self.current_started = false;
        self.opened
    }

    fn append_text(&mut self, container: usize, text: &str, emphasized: bool) {
        let Some((_, kind)) = self.current.filter(|(id, _)| *id == container) else {
            tracing::warn!("append to closed container {container} ignored");
            return;
        };

        if text.is_empty() {
            return;
        }
        if !self.current_started {
            self.start_container(kind);
        }

        let heading = !kind.is_paragraph();
        self.styled(text, emphasized || heading);
        if !text.trim().is_empty() {
            self.current_blank = false;
        }
        self.flush();
    }

    fn is_blank(&self, container: usize) -> bool {
        match self.current {
            Some((id, _)) if id == container => self.current_blank,
            // older containers are finished and were only opened on demand
            _ => false,
        }
    }
}

/// Writes every unit to two sinks; blankness is answered by the first.
pub struct Tee<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> Tee<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: DocumentSink, B: DocumentSink> DocumentSink for Tee<A, B> {
    type Container = (A::Container, B::Container);

    fn open_container(&mut self, kind: ContainerKind) -> Self::Container {
        (
            self.first.open_container(kind),
            self.second.open_container(kind),
        )
    }

    fn append_text(&mut self, container: Self::Container, text: &str, emphasized: bool) {
        self.first.append_text(container.0, text, emphasized);
        self.second.append_text(container.1, text, emphasized);
    }

    fn is_blank(&self, container: Self::Container) -> bool {
        self.first.is_blank(container.0)
    }
}
