use clap::Parser;
use owo_colors::OwoColorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tether_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        None => show_overview(),
        Some(Commands::Providers) => commands::providers::run(&cli),
        Some(Commands::Connect {
            project,
            provider,
            target,
        }) => commands::connect::run(&cli, *project, provider.as_deref(), (*target).into()).await,
        Some(Commands::Edit {
            project,
            storage,
            target,
        }) => commands::connect::run_edit(&cli, *project, storage, (*target).into()).await,
        Some(Commands::Check {
            provider,
            values,
            edit,
        }) => commands::check::run(&cli, provider, values, *edit),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(1);
    }
}

fn show_overview() -> commands::Result<()> {
    println!();
    println!(
        "{}  {}",
        "Tether".bold().cyan(),
        "- Storage Connection Wizard".dimmed()
    );
    println!();

    let registry = tether_core::ProviderRegistry::with_builtins();
    println!(
        "  {} storage providers available",
        registry.len().to_string().green().bold()
    );
    println!();

    println!("{}", "Quick Start:".bold().cyan());
    println!(
        "  {}{}",
        "tether providers".cyan(),
        "              List supported providers".dimmed()
    );
    println!(
        "  {}{}",
        "tether connect --project 1".cyan(),
        "    Connect a new storage".dimmed()
    );
    println!(
        "  {}{}",
        "tether check s3 values.json".cyan(),
        "   Validate settings offline".dimmed()
    );
    println!();

    println!("{}", "Providers:".bold().green());
    let names: Vec<_> = registry
        .list()
        .map(|p| p.name.cyan().to_string())
        .collect();
    println!("  {}", names.join(", "));
    println!();

    println!(
        "{} Use {} for full help",
        "Tip:".dimmed(),
        "tether --help".cyan()
    );
    println!();

    Ok(())
}
