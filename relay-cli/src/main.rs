//! Review Relay CLI - CI entry points for AI code review comments
//!
//! Each subcommand is one CI step: `claude` and `gemini` review changed files
//! and comment on the pull request, `summary` posts the aggregate comment.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use relay_core::{Config, Provider, Secrets, ServiceSettings};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{RelayArgs, SummaryArgs};

/// Review Relay: forward changed files to AI reviewers and comment on the PR
#[derive(Parser, Debug)]
#[command(name = "review-relay")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a config file (defaults to ~/.config/review-relay/config.toml)
    #[arg(long, global = true, env = "REVIEW_RELAY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Review changed files with Claude and post the result
    Claude(RelayArgs),

    /// Review changed files with Gemini and post the result
    Gemini(RelayArgs),

    /// Post a summary of the AI reviews on the pull request
    Summary(SummaryArgs),

    /// Show the resolved configuration
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    // CI steps must not fail because of the relay; errors end here.
    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "review-relay failed");
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load_or_default(cli.config.as_deref());
    let secrets = Secrets::load_or_default();

    match cli.command {
        Commands::Claude(args) => args.execute(Provider::Claude, config, &secrets).await?,
        Commands::Gemini(args) => args.execute(Provider::Gemini, config, &secrets).await?,
        Commands::Summary(args) => args.execute(&config, &secrets).await?,
        Commands::Config => print_config(&config, &secrets, cli.config.as_deref()),
    }

    Ok(())
}

fn print_config(config: &Config, secrets: &Secrets, path: Option<&std::path::Path>) {
    println!("Review Relay Configuration");
    println!("==========================");

    for provider in Provider::ALL {
        let settings = ServiceSettings::resolve(provider, config.service(provider));
        println!();
        println!("{}:", provider);
        println!("  model: {}", settings.model);
        println!("  max_tokens: {}", settings.max_tokens);
        println!("  temperature: {}", settings.temperature);
        println!("  char_budget: {}", settings.char_budget);
        println!("  api_url: {}", settings.api_url);
        println!(
            "  timeout: {}",
            settings
                .timeout
                .map(|t| format!("{:?}", t))
                .unwrap_or_else(|| "(none)".to_string())
        );
        println!(
            "  {}: {}",
            provider.api_key_var(),
            if secrets.api_key(provider).is_some() { "present" } else { "missing" }
        );
    }

    println!();
    println!("GitHub:");
    println!(
        "  api_url: {}",
        config.github.api_url.as_deref().unwrap_or("(github.com)")
    );
    println!(
        "  GITHUB_TOKEN: {}",
        if secrets.github_token().is_some() { "present" } else { "missing" }
    );

    println!();
    let path = path.map(PathBuf::from).or_else(Config::default_config_path);
    if let Some(path) = path {
        println!("Config file: {}", path.display());
        if path.exists() {
            println!("  (exists)");
        } else {
            println!("  (not found - using defaults)");
        }
    }
}
