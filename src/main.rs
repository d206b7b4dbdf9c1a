mod books;
mod cache;
mod cli;
mod discover;
mod query;
mod youtube;

pub const USER_AGENT: &str = concat!("studyscout/", env!("CARGO_PKG_VERSION"));

use clap::Parser;
use cli::{App, Cli};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("studyscout=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    info!("starting studyscout");

    let app = App::new()?;
    app.run(cli.command)
        .await
        .inspect_err(|e| tracing::error!("command failed: {e}"))?;
    Ok(())
}
