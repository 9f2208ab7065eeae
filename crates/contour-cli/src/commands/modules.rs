//! Module listing and parameter information command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use contour_registry::ModuleRegistry;

#[derive(Args)]
pub struct ModulesArgs {
    /// Show parameters for a specific module (id or legacy id)
    #[arg(value_name = "MODULE")]
    module: Option<String>,
}

pub fn run(args: ModulesArgs) -> anyhow::Result<()> {
    let registry = ModuleRegistry::new();

    let Some(id) = &args.module else {
        println!("Available Modules");
        println!("=================");
        println!();
        for module in registry.all_modules() {
            println!(
                "  {:10} {:10} - {}",
                module.id,
                module.category.name(),
                module.description
            );
        }
        println!();
        println!("Use 'contour modules <id>' for detailed parameter info.");
        return Ok(());
    };

    let module = registry
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("Unknown module: {}", id))?;

    println!("{} ({})", module.name, module.id);
    println!("{}", "=".repeat(module.name.len() + module.id.len() + 3));
    println!();
    println!("{}", module.description);
    if let Some(legacy) = module.legacy_id {
        println!("Also accepted as: {}", legacy);
    }
    println!();

    println!("Parameters:");
    println!();
    println!(
        "  {:>3}  {:14}  {:14}  {:>9}  {}",
        "#", "Name", "Key", "Default", "Range"
    );
    println!(
        "  {:>3}  {:14}  {:14}  {:>9}  {}",
        "-", "----", "---", "-------", "-----"
    );
    for (i, param) in module.params.iter().enumerate() {
        let scale = param.unit.display_scale();
        let suffix = param.unit.suffix();
        let default = format!("{}{}", param.default * scale, suffix);
        println!(
            "  {:>3}  {:14}  {:14}  {:>9}  {} .. {}{}",
            i,
            param.name,
            param.string_id,
            default,
            param.min * scale,
            param.max * scale,
            suffix
        );
    }

    println!();
    println!("Set a parameter from a scenario event:");
    println!();
    if let Some(param) = module.params.first() {
        println!("  [[events]]");
        println!("  at = 0.5");
        println!("  kind = \"set\"");
        println!("  param = \"{}\"", param.string_id);
        println!("  value = {}", param.default);
    }
    Ok(())
}
