mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("chaingraph=info".parse()?)
                .add_directive("eth_rpc_client=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Fetch(args) => commands::fetch(args).await?,
        Command::Import(args) => commands::import(args).await?,
        Command::Delete(args) => commands::delete(args).await?,
        Command::Dev(args) => commands::dev(args).await?,
    }

    Ok(())
}
