use std::process::ExitCode;
use typewriter::{setup_logging, Args, Config, Error, USAGE};

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // need guard to live for lifetime of program
    let log_dir = Args::log_dir(&args).or_else(Config::log_dir_from_env);
    let _guard = setup_logging(log_dir.as_deref());

    let (args, unrecognized) = Args::parse(&args);

    if args.help {
        print!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    let mut config = Config::from_env();
    args.apply(&mut config);

    if !unrecognized.is_empty() {
        let err = Error::Args(format!("unrecognized arguments: {unrecognized:?}"));
        tracing::error!("{err}");
        eprint!("{USAGE}");
        return ExitCode::FAILURE;
    }

    match typewriter::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
