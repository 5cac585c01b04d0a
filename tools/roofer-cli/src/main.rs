//! Roofer CLI - local tooling for white-label roofing estimate sites.
//!
//! Commands:
//! - `roofer preview` - Run the branding rewrite against a local site
//! - `roofer configs` - Validate client config files
//! - `roofer wizard` - Walk through the estimate wizard in the terminal

mod assets;
mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{ConfigsArgs, PreviewArgs, WizardArgs};

/// Roofer CLI - Preview and check white-label roofing sites
#[derive(Parser)]
#[command(name = "roofer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the page a client host would receive
    Preview(PreviewArgs),

    /// Validate client config files
    Configs(ConfigsArgs),

    /// Run the estimate wizard interactively
    Wizard(WizardArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);
    let ctx = context::Context::load(cli.config.as_deref(), output)?;

    let result = match cli.command {
        Commands::Preview(args) => commands::preview::run(args, &ctx).await,
        Commands::Configs(args) => commands::configs::run(args, &ctx).await,
        Commands::Wizard(args) => commands::wizard::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
