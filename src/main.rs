use anyhow::Result;
use clap::Parser;
use weather_fx::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    weather_fx::run(cli).await
}
