mod cli;

use badgerwatch::config::Config;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Server(args) => {
            let mut config = Config::load_with(args.config.config)?;
            if let Some(address) = args.address {
                config.server.bind_addr = address;
            }
            badgerwatch::api::run(config).await?;
        }
        Commands::CheckConfig(args) => {
            let config = Config::load_with(args.config)?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
