//! Banks command - list the bank registry.

use clap::Args;
use console::style;

use ratewatch_core::BankRegistry;

use super::config::load_config;

/// Arguments for the banks command.
#[derive(Args)]
pub struct BanksArgs {
    /// Print the registry as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: BanksArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let registry = BankRegistry::load(config.registry_path.as_deref())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(registry.as_ref())?);
        return Ok(());
    }

    for profile in registry.iter() {
        println!(
            "{:<8} {}  {}",
            style(&profile.id).bold(),
            profile.display_name,
            style(&profile.website).dim()
        );
        println!("         aliases: {}", profile.aliases.join(", "));
    }
    println!();
    println!("{} banks", registry.len());

    Ok(())
}
