//! Scenario management commands.
//!
//! Lists the factory scenarios, shows one in detail, or exports one as a
//! TOML file to edit.

use super::render::resolve_scenario;
use clap::{Args, Subcommand};
use contour_config::{Scenario, factory_scenarios, get_factory_scenario};
use std::path::PathBuf;

#[derive(Args)]
pub struct ScenariosArgs {
    #[command(subcommand)]
    command: ScenariosCommand,
}

#[derive(Subcommand)]
enum ScenariosCommand {
    /// List factory scenarios
    List,

    /// Show details of a scenario
    Show {
        /// Scenario name or path
        name: String,

        /// Print the scenario as TOML
        #[arg(long)]
        toml: bool,
    },

    /// Write a factory scenario to a file for customization
    Export {
        /// Factory scenario name
        name: String,

        /// Destination file
        #[arg(short, long)]
        output: PathBuf,

        /// Overwrite if the file already exists
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: ScenariosArgs) -> anyhow::Result<()> {
    match args.command {
        ScenariosCommand::List => list_scenarios(),
        ScenariosCommand::Show { name, toml } => show_scenario(&name, toml),
        ScenariosCommand::Export {
            name,
            output,
            force,
        } => export_scenario(&name, output, force),
    }
}

fn list_scenarios() -> anyhow::Result<()> {
    println!("Factory Scenarios:");
    println!("==================");
    for scenario in factory_scenarios() {
        let desc = scenario.description.as_deref().unwrap_or("");
        println!("  {:12} - {}", scenario.name, desc);
    }
    println!();
    println!("Render one with: contour render <name> -o out.wav");
    Ok(())
}

fn show_scenario(name: &str, as_toml: bool) -> anyhow::Result<()> {
    let scenario = resolve_scenario(name)?;

    if as_toml {
        print!("{}", scenario.to_toml()?);
        return Ok(());
    }

    println!("Scenario: {}", scenario.name);
    println!("{}", "=".repeat(10 + scenario.name.len()));
    println!();

    if let Some(desc) = &scenario.description {
        println!("Description: {}", desc);
        println!();
    }

    println!("Module:      {}", scenario.module);
    println!("Sample Rate: {} Hz", scenario.sample_rate);
    println!("Block Size:  {}", scenario.block_size);
    println!(
        "Duration:    {} s ({} samples)",
        scenario.duration,
        scenario.total_samples()
    );
    println!();

    print_settings(&scenario);
    println!();

    println!("Events ({}):", scenario.events.len());
    for event in scenario.schedule() {
        println!("  {:>8}  {}", event.position, event.action);
    }
    Ok(())
}

fn print_settings(scenario: &Scenario) {
    let settings = scenario.settings();
    println!("Envelope:");
    println!("  attack  {:.3} (curve {:+.2})", settings.attack, settings.attack_curve);
    println!("  decay   {:.3} (curve {:+.2})", settings.decay, settings.decay_curve);
    println!("  sustain {:.3}", settings.sustain);
    println!(
        "  release {:.3} (curve {:+.2})",
        settings.release, settings.release_curve
    );
}

fn export_scenario(name: &str, output: PathBuf, force: bool) -> anyhow::Result<()> {
    let scenario = get_factory_scenario(name)
        .ok_or_else(|| anyhow::anyhow!("Factory scenario '{}' not found", name))?;

    if output.exists() && !force {
        anyhow::bail!(
            "'{}' already exists. Use --force to overwrite.",
            output.display()
        );
    }

    scenario.save(&output)?;
    println!("Exported '{}' to {}", scenario.name, output.display());
    Ok(())
}
