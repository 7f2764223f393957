//! Fleet Office - Application entry point
//!
//! CLI-based entry point that dispatches to the operator commands.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleet_office::{
    cli::{Cli, Commands},
    commands,
    config::Config,
};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing (verbose mode sets debug level)
    init_tracing(cli.verbose);

    // Load configuration; CLI flags win over the environment
    let mut config = Config::from_env();
    if let Some(seed) = cli.seed {
        config.seed_path = Some(seed);
    }
    if let Some(url) = cli.redis_url {
        config = config.with_redis_url(url);
    }
    tracing::debug!(?config, "Configuration loaded");

    // Execute command
    let result = match cli.command {
        Commands::Summary => commands::summary::execute(config).await,
        Commands::Mileage(args) => commands::mileage::execute(args, config).await,
        Commands::Overdue => commands::overdue::execute(config).await,
        Commands::CheckLogin(args) => commands::check_login::execute(args, config).await,
    };

    // Handle errors
    if let Err(e) = result {
        tracing::error!(code = e.code(), "Command failed: {}", e.user_message());
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
