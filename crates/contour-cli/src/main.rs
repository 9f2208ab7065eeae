//! Contour CLI - render and inspect exponential-segment envelopes.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "contour")]
#[command(author, version, about = "Contour envelope generator CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a scenario to WAV (and optionally CSV)
    Render(commands::render::RenderArgs),

    /// Solve one curve segment and show its recurrence
    Solve(commands::solve::SolveArgs),

    /// List available modules and their parameters
    Modules(commands::modules::ModulesArgs),

    /// List or show factory scenarios
    Scenarios(commands::scenarios::ScenariosArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Solve(args) => commands::solve::run(args),
        Commands::Modules(args) => commands::modules::run(args),
        Commands::Scenarios(args) => commands::scenarios::run(args),
    }
}
