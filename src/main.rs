use std::process::ExitCode;

use clap::Parser as _;
use trivia_chain_backend::{
    cli::{Cli, run},
    logging::setup_logging,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            err.report();
            ExitCode::from(err.exit_code())
        }
    }
}
