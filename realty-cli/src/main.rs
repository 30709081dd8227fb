//! realty CLI - runs the property listings HTTP backend
//!
//! ```text
//! realty serve --port 3030 --database-url postgres://localhost/realty
//! realty --debug serve --config ./realty.toml
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

use realty_server::config::load_dotenv;

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "realty",
    author,
    version,
    about = "Property listings backend: houses, details, prices, images, and reviews over HTTP"
)]
struct Cli {
    /// Verbose logging with module targets (RUST_LOG still takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so DATABASE_URL is visible to clap's env fallback
    load_dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig { debug: cli.debug })?;

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
    }
    Ok(())
}
