use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "typewriter=info,md_typewriter=info";

/// Install the global subscriber.
///
/// Logs go to stderr, leaving stdout to the typed document. With a log
/// directory, a daily rolling file is added. Keep the returned guard alive
/// for the lifetime of the program or buffered file logs are lost.
pub fn setup_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    let Some(log_dir) = log_dir else {
        tracing_subscriber::registry()
            .with(console_layer)
            .with(env_filter)
            .init();
        return None;
    };

    use tracing_appender::{
        non_blocking,
        rolling::{RollingFileAppender, Rotation},
    };

    let file_appender = RollingFileAppender::new(
        Rotation::DAILY,
        log_dir,
        format!("typewriter-{}.log", env!("CARGO_PKG_VERSION")),
    );

    let (non_blocking_writer, guard) = non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(non_blocking_writer);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(env_filter)
        .init();

    Some(guard)
}
