//! End-to-end streaming: bytes from a reader, through the session, into a
//! document, driven by the frame loop.

use md_typewriter::DocumentTree;
use pretty_assertions::assert_eq;
use std::io::Cursor;
use std::time::Duration;
use typewriter::{
    drive, open_source, ChunkSource, Config, InputFormat, ReaderSource, ScriptedSource, Session,
    SessionEvent, SourceEvent, StreamEvent,
};

fn transcript() -> String {
    let events = [
        StreamEvent::progress(0.0).with_status("Initializing..."),
        StreamEvent::progress(10.0).with_status("Fetching content..."),
        StreamEvent::chunk("# Hi\nFirst ").with_progress(80.0),
        StreamEvent::chunk("line.\nSecond **line**.\n## Part").with_progress(80.0),
        StreamEvent::chunk(" two\nThe end.").with_progress(100.0),
    ];

    let mut sse = String::new();
    for event in &events {
        sse.push_str(&event.to_sse().unwrap());
    }
    // one malformed envelope in the middle of the stream
    let second_chunk = sse.find(r#"data: {"chunk":"line."#).unwrap();
    sse.insert_str(second_chunk, "data: {broken\n\n");
    sse
}

const EXPECTED_HTML: &str = "<h1>Hi</h1>\n\
<p>First line. Second <strong>line</strong>.</p>\n\
<h2>Part two</h2>\n\
<p>The end.</p>\n";

async fn run_session(
    rx: std::sync::mpsc::Receiver<SourceEvent>,
) -> (DocumentTree, Vec<SessionEvent>) {
    let mut session = Session::new(DocumentTree::new(), rx);
    let mut events = Vec::new();
    drive(&mut session, Duration::from_millis(16), |e| events.push(e.clone())).await;
    (session.into_sink(), events)
}

#[tokio::test(start_paused = true)]
async fn test_sse_stream_types_full_document() {
    let bytes = transcript().into_bytes();

    for fragment_size in [1, 7, 64, 4096] {
        let rx = ReaderSource::new(Cursor::new(bytes.clone()), InputFormat::Sse)
            .fragment_size(fragment_size)
            .delay(Duration::from_millis(5))
            .stream();

        let (doc, events) = run_session(rx).await;
        assert_eq!(doc.to_html(), EXPECTED_HTML, "fragment size {fragment_size}");

        let completions = events
            .iter()
            .filter(|e| matches!(e, SessionEvent::Completed))
            .count();
        assert_eq!(completions, 1);
        assert!(!events.iter().any(|e| matches!(e, SessionEvent::Failed(_))));
    }
}

#[tokio::test(start_paused = true)]
async fn test_markdown_file_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("post.md");
    std::fs::write(&path, "# Hi\nFirst line.\nSecond **line**.\n## Part two\nThe end.").unwrap();

    let config = Config {
        input: Some(path),
        fragment_size: 5,
        delay: Duration::from_millis(1),
        ..Config::default()
    };
    let rx = open_source(&config).await.unwrap();
    let (doc, events) = run_session(rx).await;

    assert_eq!(doc.to_html(), EXPECTED_HTML);
    assert_eq!(events.last(), Some(&SessionEvent::Completed));
    assert!(events.contains(&SessionEvent::Status("Generating... 100%".to_string())));
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_keeps_partial_output() {
    let rx = ScriptedSource::new(vec![
        SourceEvent::Event(StreamEvent::chunk("# Partial\nnever flushed").with_progress(40.0)),
        SourceEvent::Failed("connection reset".to_string()),
        SourceEvent::Event(StreamEvent::chunk("\nnever sent\n")),
    ])
    .delay(Duration::from_millis(30))
    .stream();

    let (doc, events) = run_session(rx).await;

    assert_eq!(doc.to_html(), "<h1>Partial</h1>\n");
    assert_eq!(
        events,
        vec![
            SessionEvent::Status("Generating... 40%".to_string()),
            SessionEvent::Failed(typewriter::session::TRANSPORT_FAILED.to_string()),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_run_writes_html() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("events.sse");
    let html = dir.path().join("out.html");
    std::fs::write(&input, transcript()).unwrap();

    let config = Config {
        input: Some(input),
        html_out: Some(html.clone()),
        fragment_size: 32,
        delay: Duration::ZERO,
        frame: Duration::from_millis(1),
        ..Config::default()
    };
    typewriter::run(config).await.unwrap();

    assert_eq!(std::fs::read_to_string(html).unwrap(), EXPECTED_HTML);
}

#[tokio::test(start_paused = true)]
async fn test_run_reports_generation_failure() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("events.sse");
    let mut sse = StreamEvent::chunk("some text\n")
        .with_progress(50.0)
        .to_sse()
        .unwrap();
    sse.push_str(
        r#"data: {"progress": 100, "status": "Error: No valid messages to process.", "chunk": null}"#,
    );
    sse.push_str("\n\n");
    std::fs::write(&input, sse).unwrap();

    let config = Config {
        input: Some(input),
        delay: Duration::ZERO,
        ..Config::default()
    };
    let err = typewriter::run(config).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Generation failed: Error: No valid messages to process."
    );
}

#[tokio::test(start_paused = true)]
async fn test_zero_frame_period_still_drives() {
    let rx = ScriptedSource::new(vec![SourceEvent::Event(
        StreamEvent::chunk("# Fast\nno wait").with_progress(100.0),
    )])
    .stream();

    let mut session = Session::new(DocumentTree::new(), rx);
    drive(&mut session, Duration::ZERO, |_| {}).await;

    assert!(session.is_ready());
    assert_eq!(
        session.into_sink().to_html(),
        "<h1>Fast</h1>\n<p>no wait</p>\n"
    );
}

#[tokio::test(start_paused = true)]
async fn test_run_empty_markdown_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty.md");
    std::fs::write(&input, "").unwrap();

    let config = Config {
        input: Some(input),
        delay: Duration::ZERO,
        ..Config::default()
    };
    let err = typewriter::run(config).await.unwrap_err();
    assert_eq!(err.to_string(), "Generation failed: no content received");
}
