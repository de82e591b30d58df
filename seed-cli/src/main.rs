//! Seed CLI - bootstrap a repository from a template
//!
//! Reads its full configuration from the environment (optionally via a
//! `.env` file) and runs the bootstrap sequence once.

use clap::{Parser, Subcommand};
use seed_core::{Bootstrap, BootstrapConfig, SealedBoxSealer};
use seed_core::git::GitWorkingCopy;
use seed_github::GitHubClient;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// repo-seed: bootstrap a new repository from a template
#[derive(Parser, Debug)]
#[command(name = "seed")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("seed {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => run_bootstrap().await,
    }
}

async fn run_bootstrap() -> anyhow::Result<()> {
    let config = BootstrapConfig::from_env()?;
    let remote = GitHubClient::new(&config)?;
    let local = GitWorkingCopy;
    let sealer = SealedBoxSealer;

    let outcome = Bootstrap::new(&config, &remote, &local, &sealer)
        .run()
        .await?;

    println!(
        "Bootstrapped {} from {}",
        outcome.repository, config.template_url
    );

    if !outcome.failed_secrets.is_empty() {
        for error in &outcome.failed_secrets {
            eprintln!("warning: {}", error);
        }
        anyhow::bail!(
            "{} secret(s) failed to upload; configure them manually",
            outcome.failed_secrets.len()
        );
    }

    Ok(())
}
