use crate::source::InputFormat;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Shortest frame period; a zero period would never yield to the runtime.
pub const MIN_FRAME: Duration = Duration::from_millis(1);

/// Runtime settings for the typewriter host.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Input file; stdin when unset
    pub input: Option<PathBuf>,

    /// Input format; inferred from the input's extension when unset
    pub format: Option<InputFormat>,

    /// Bytes read per fragment
    pub fragment_size: usize,

    /// Pause between fragments
    pub delay: Duration,

    /// Animation frame period; one render unit is typed per frame
    pub frame: Duration,

    pub log_dir: Option<PathBuf>,

    /// Write the finished document here as HTML
    pub html_out: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: None,
            format: None,
            fragment_size: 16,
            delay: Duration::from_millis(20),
            frame: Duration::from_millis(16),
            log_dir: None,
            html_out: None,
        }
    }
}

impl Config {
    /// Defaults overlaid with `TYPEWRITER_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Like [`Config::from_env`] with an injectable variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();

        if let Some(n) = parse_var(&var, "TYPEWRITER_FRAGMENT_SIZE") {
            config.fragment_size = n as usize;
        }
        if let Some(ms) = parse_var(&var, "TYPEWRITER_DELAY_MS") {
            config.delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var(&var, "TYPEWRITER_FRAME_MS") {
            config.frame = frame_period(ms);
        }
        config.log_dir = log_dir_var(&var);

        config
    }

    /// The log directory from `TYPEWRITER_LOG_DIR`, readable before logging
    /// is set up.
    pub fn log_dir_from_env() -> Option<PathBuf> {
        log_dir_var(&|key: &str| std::env::var(key).ok())
    }

    /// The input format to use, falling back to the file extension.
    pub fn input_format(&self) -> InputFormat {
        if let Some(format) = self.format {
            return format;
        }
        match self.input.as_deref().and_then(Path::extension) {
            Some(ext) if ext == "md" || ext == "markdown" => InputFormat::Markdown,
            _ => InputFormat::Sse,
        }
    }
}

/// Frame period from milliseconds, never shorter than [`MIN_FRAME`].
pub(crate) fn frame_period(ms: u64) -> Duration {
    let frame = Duration::from_millis(ms);
    if frame < MIN_FRAME {
        tracing::warn!("frame period of {ms}ms is too short, using {MIN_FRAME:?}");
        return MIN_FRAME;
    }
    frame
}

fn log_dir_var(var: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    var("TYPEWRITER_LOG_DIR")
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
}

fn parse_var(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let value = var(key)?;
    match value.trim().parse() {
        Ok(n) => Some(n),
        Err(err) => {
            tracing::warn!("ignoring {key}={value:?}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overrides() {
        let config = Config::from_vars(|key| match key {
            "TYPEWRITER_FRAME_MS" => Some("5".to_string()),
            "TYPEWRITER_FRAGMENT_SIZE" => Some("not a number".to_string()),
            "TYPEWRITER_LOG_DIR" => Some("/tmp/logs".to_string()),
            _ => None,
        });

        assert_eq!(config.frame, Duration::from_millis(5));
        assert_eq!(config.fragment_size, Config::default().fragment_size);
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/logs")));
    }

    #[test]
    fn test_zero_frame_period_is_clamped() {
        let config = Config::from_vars(|key| match key {
            "TYPEWRITER_FRAME_MS" => Some("0".to_string()),
            _ => None,
        });
        assert_eq!(config.frame, MIN_FRAME);
    }

    #[test]
    fn test_format_inference() {
        let mut config = Config::default();
        assert_eq!(config.input_format(), InputFormat::Sse);

        config.input = Some(PathBuf::from("post.md"));
        assert_eq!(config.input_format(), InputFormat::Markdown);

        config.format = Some(InputFormat::Sse);
        assert_eq!(config.input_format(), InputFormat::Sse);
    }
}
