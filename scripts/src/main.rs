use clap::Parser;
use scripts::cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let Cli { command } = Cli::parse();

    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    command.run().await?;
    Ok(())
}
