use crate::config::{frame_period, Config};
use crate::source::InputFormat;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;
use tracing::error;

pub const USAGE: &str = "\
usage: typewriter [options]

  --input <path>          read from a file instead of stdin
  --sse                   input is `data: {json}` event lines (default)
  --markdown              input is raw markdown
  --fragment-size <n>     bytes per fragment
  --delay-ms <n>          pause between fragments
  --frame-ms <n>          animation frame period
  --log-dir <path>        also write daily log files here
  --html <path>           write the finished document as HTML
  --help                  show this message
";

/// Command-line overrides. Unset fields leave the config untouched.
#[derive(Debug, Default, PartialEq)]
pub struct Args {
    pub input: Option<PathBuf>,
    pub format: Option<InputFormat>,
    pub fragment_size: Option<usize>,
    pub delay_ms: Option<u64>,
    pub frame_ms: Option<u64>,
    pub log_dir: Option<PathBuf>,
    pub html_out: Option<PathBuf>,
    pub help: bool,
}

impl Args {
    // parse arguments, return set of unrecognized args
    pub fn parse(args: &[String]) -> (Self, BTreeSet<String>) {
        let mut unrecognized_args = BTreeSet::new();
        let mut res = Args::default();

        let mut i = 0;
        let len = args.len();
        while i < len {
            let arg = &args[i];

            if arg == "--help" || arg == "-h" {
                res.help = true;
            } else if arg == "--sse" {
                res.format = Some(InputFormat::Sse);
            } else if arg == "--markdown" {
                res.format = Some(InputFormat::Markdown);
            } else if arg == "--input" {
                i += 1;
                let Some(path) = args.get(i) else {
                    error!("input argument missing?");
                    continue;
                };
                res.input = Some(PathBuf::from(path));
            } else if arg == "--log-dir" {
                i += 1;
                let Some(path) = args.get(i) else {
                    error!("log-dir argument missing?");
                    continue;
                };
                res.log_dir = Some(PathBuf::from(path));
            } else if arg == "--html" {
                i += 1;
                let Some(path) = args.get(i) else {
                    error!("html argument missing?");
                    continue;
                };
                res.html_out = Some(PathBuf::from(path));
            } else if arg == "--fragment-size" {
                i += 1;
                res.fragment_size = parse_number(arg, args.get(i)).map(|n| n as usize);
            } else if arg == "--delay-ms" {
                i += 1;
                res.delay_ms = parse_number(arg, args.get(i));
            } else if arg == "--frame-ms" {
                i += 1;
                res.frame_ms = parse_number(arg, args.get(i));
            } else {
                unrecognized_args.insert(arg.clone());
            }

            i += 1;
        }

        (res, unrecognized_args)
    }

    /// Find `--log-dir` without parsing anything else, so logging can be
    /// set up before the full parse reports its problems.
    pub fn log_dir(args: &[String]) -> Option<PathBuf> {
        let at = args.iter().rposition(|arg| arg == "--log-dir")?;
        args.get(at + 1).map(PathBuf::from)
    }

    /// Overlay these arguments onto `config`.
    pub fn apply(self, config: &mut Config) {
        if let Some(input) = self.input {
            config.input = Some(input);
        }
        if let Some(format) = self.format {
            config.format = Some(format);
        }
        if let Some(size) = self.fragment_size {
            config.fragment_size = size;
        }
        if let Some(ms) = self.delay_ms {
            config.delay = Duration::from_millis(ms);
        }
        if let Some(ms) = self.frame_ms {
            config.frame = frame_period(ms);
        }
        if let Some(dir) = self.log_dir {
            config.log_dir = Some(dir);
        }
        if let Some(path) = self.html_out {
            config.html_out = Some(path);
        }
    }
}

fn parse_number(arg: &str, value: Option<&String>) -> Option<u64> {
    let Some(value) = value else {
        error!("{arg} argument missing?");
        return None;
    };

    match value.parse() {
        Ok(n) => Some(n),
        Err(err) => {
            error!("failed to parse {arg} value '{value}': {err}");
            None
        }
    }
}
