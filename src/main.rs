use anyhow::Result;
use clap::Parser;
use travel_assistant::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    travel_assistant::run(args).await
}
