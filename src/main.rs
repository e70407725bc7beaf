mod args;
mod corerank;

use clap::Parser;
use log::{debug, info};

use crate::args::Args;
use crate::corerank::{run_rankings, RunSettings};

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    debug!("args: {:?}", args);

    let settings = RunSettings::from_args(&args);
    match run_rankings(&settings) {
        Ok(report) => {
            info!(
                "Ranked {} courses from {:?}",
                report.outcome.rankings.len(),
                settings.input_path
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
