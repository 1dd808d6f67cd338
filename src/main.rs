use clap::Parser;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

use cnote::{cli::Args, wlnerr, RunConfig, LOG_ENV};

fn main() {
    let args = Args::parse();
    let cfg = RunConfig::from_args(&args);

    // Logs go to stderr so --standard-output stays redirectable.
    let filter = match cfg.verbosity {
        Some(level) => EnvFilter::from_env(LOG_ENV).add_directive(LevelFilter::from(level).into()),
        None => EnvFilter::new("off"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cnote::run(&cfg) {
        wlnerr!("error: {e}");
        std::process::exit(1);
    }
}
