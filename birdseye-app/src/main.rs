use anyhow::Result;
use birdseye_common::observability::{init_logging, LogConfig};
use birdseye_config::{BirdseyeConfig, BirdseyeConfigLoader};
use clap::Parser;
use commands::Cli;

mod commands;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config first (env wins over the file), then logging.
    let cfg: BirdseyeConfig = BirdseyeConfigLoader::new().with_file(&cli.config).load()?;

    init_logging(LogConfig::default())?;

    commands::run(cli, cfg).await
}
