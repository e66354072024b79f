use clap::Parser;
use townkrier::cli::Cli;
use townkrier::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    let cli = Cli::parse();

    info!("Starting townkrier");

    // Load configuration
    let config = startup::load_config().await?;

    // Wire up the core and run the requested command
    let app = startup::App::build(&config)?;
    app.run(cli).await
}
