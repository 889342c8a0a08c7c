use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

mod cli;
mod config;
#[cfg(test)]
mod test_utils;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // .env may carry RUST_LOG and DATABASE_URL, so it goes first
    config::load_env();
    model::init_tracing();

    let cli = Cli::parse();
    cli.run().await
}
