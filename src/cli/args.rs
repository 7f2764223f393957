//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Fleet Office - role-based fleet back office over a seeded store
#[derive(Parser, Debug)]
#[command(name = "fleet-office")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON seed file (bundled demo data when omitted)
    #[arg(short, long, global = true, env = "FLEET_SEED_PATH")]
    pub seed: Option<PathBuf>,

    /// Redis URL for per-viewer alert markers
    #[arg(long, global = true, env = "REDIS_URL")]
    pub redis_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dispatch board, open workshop orders and pending requests
    Summary,

    /// Monthly mileage progress
    Mileage(MileageArgs),

    /// Service orders past the overdue threshold
    Overdue,

    /// Try a username/password pair against the store
    CheckLogin(CheckLoginArgs),
}

/// Arguments for the mileage command
#[derive(Args, Debug)]
pub struct MileageArgs {
    /// Driver username; every driver when omitted
    #[arg(short, long)]
    pub driver: Option<String>,
}

/// Arguments for the check-login command
#[derive(Args, Debug)]
pub struct CheckLoginArgs {
    pub username: String,

    #[arg(long, env = "FLEET_PASSWORD", hide_env_values = true)]
    pub password: String,
}
