use clap::Parser as _;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod parser;

use cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    commands::run(cli.command, cli.json)
}
