//! Campaign CLI commands.

use clap::Subcommand;
use console::style;
use contentlayer::campaign::{CampaignLoader, InMemoryProfile};

use super::common::CommandContext;
use crate::error::CliError;

/// Campaigns subcommands.
#[derive(Debug, Subcommand)]
pub enum CampaignsCommands {
    /// List campaigns from the base game and enabled packages
    List,

    /// Load a campaign and show its levels
    Load {
        /// Campaign name (descriptor file name without extension)
        name: String,
    },
}

/// Run a campaigns subcommand.
pub fn run(command: CampaignsCommands, ctx: &CommandContext) -> Result<(), CliError> {
    let registry = ctx.open_registry()?;
    let loader =
        CampaignLoader::new(&registry).with_default_campaign(&ctx.config.campaign.default_campaign);

    match command {
        CampaignsCommands::List => {
            let names = loader.list_campaigns();
            if names.is_empty() {
                println!("No campaigns found.");
            }
            for name in names {
                let marker = if name == loader.default_campaign() {
                    style(" (default)").dim().to_string()
                } else {
                    String::new()
                };
                println!("{}{}", name, marker);
            }
            Ok(())
        }
        CampaignsCommands::Load { name } => {
            let mut profile = InMemoryProfile::new("cli").with_campaign(&name);
            let loaded = loader.load_selected(&mut profile)?;
            let campaign = &loaded.campaign;

            if loaded.fell_back() {
                println!(
                    "{} '{}' could not be loaded, using '{}'",
                    style("warning:").yellow().bold(),
                    name,
                    campaign.name
                );
            }

            println!(
                "{} ({} levels)",
                style(&campaign.name).bold(),
                campaign.levels.len()
            );
            println!("  {} {}", style("source").dim(), campaign.source.display());
            match &campaign.world_image {
                Some(image) => println!("  {} {}", style("world").dim(), image.display()),
                None => println!("  {} (none)", style("world").dim()),
            }
            println!();

            for (index, level) in campaign.levels.iter().enumerate() {
                let next: Vec<String> = level
                    .next_levels
                    .iter()
                    .map(|n| (n + 1).to_string())
                    .collect();
                println!(
                    "{:>3}. {:<20} {}",
                    index + 1,
                    level.map_name,
                    level.description
                );
                if !next.is_empty() {
                    println!("     next: {}", next.join(", "));
                }
            }

            println!();
            println!("{}", campaign.end_text.title);
            for line in &campaign.end_text.body {
                println!("{}", line);
            }
            Ok(())
        }
    }
}
