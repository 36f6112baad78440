mod cli;
mod convert;
mod error;
mod logging;

use clap::Parser;
use tracing::debug;

fn main() {
    if let Err(e) = run_app() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run_app() -> error::Result<()> {
    let cli = cli::Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, &cli.log_file)?;
    debug!("Full CLI arguments parsed: {:?}", &cli);
    convert::run(&cli)
}
