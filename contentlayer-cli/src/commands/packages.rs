//! Package registry CLI commands.
//!
//! `packages list`, `packages scan`, `packages enable` and
//! `packages disable`. Enabling and disabling run a full edit session:
//! begin, move, apply.

use clap::Subcommand;
use console::style;
use contentlayer::package::{ContentPackage, PackageKind};
use contentlayer::registry::{PendingSet, Registry};
use contentlayer::resolver::ContentResolver;

use super::common::CommandContext;
use crate::error::CliError;

/// Packages subcommands.
#[derive(Debug, Subcommand)]
pub enum PackagesCommands {
    /// List installed packages in priority order
    List {
        /// Show description, author and icon for each package
        #[arg(long)]
        details: bool,
    },

    /// Rescan the content directories and update the registry
    Scan,

    /// Enable a package; it is searched after already enabled packages
    Enable {
        /// Package id (its folder name)
        id: String,
    },

    /// Disable a package
    Disable {
        /// Package id (its folder name)
        id: String,
    },
}

/// Run a packages subcommand.
pub fn run(command: PackagesCommands, ctx: &CommandContext) -> Result<(), CliError> {
    match command {
        PackagesCommands::List { details } => run_list(ctx, details),
        PackagesCommands::Scan => run_scan(ctx),
        PackagesCommands::Enable { id } => run_toggle(ctx, &id, true),
        PackagesCommands::Disable { id } => run_toggle(ctx, &id, false),
    }
}

fn run_list(ctx: &CommandContext, details: bool) -> Result<(), CliError> {
    let registry = ctx.open_registry()?;
    let resolver = ContentResolver::new(&registry);

    if registry.is_empty() {
        println!("No packages installed.");
        println!(
            "Mods go in {}, texture packs in {}",
            ctx.layout.mods_dir.display(),
            ctx.layout.texture_packs_dir.display()
        );
        return Ok(());
    }

    println!(
        "{} of {} packages enabled",
        registry.enabled_count(),
        registry.len()
    );
    println!();

    for (index, package) in registry.enabled_packages().enumerate() {
        print_package(package, Some(index + 1));
        if details {
            print_details(package, &resolver);
        }
    }
    for id in registry.available_ids() {
        if let Some(package) = registry.get(id) {
            print_package(package, None);
            if details {
                print_details(package, &resolver);
            }
        }
    }

    Ok(())
}

fn print_package(package: &ContentPackage, priority: Option<usize>) {
    let status = match priority {
        Some(n) => style(format!("{:>3}", n)).green().bold(),
        None => style("  -".to_string()).dim(),
    };
    let kind = match package.kind {
        PackageKind::TexturePack => style("texture").cyan(),
        _ => style("mod").magenta(),
    };
    println!(
        "{} {:<24} {:<8} v{:<8} {}",
        status,
        package.id,
        kind,
        package.metadata.version,
        package.metadata.name
    );
}

fn print_details(package: &ContentPackage, resolver: &ContentResolver<'_>) {
    println!("      {}", package.metadata.description);
    println!("      by {}", package.metadata.author);
    if let Some(icon) = resolver.pack_icon(&package.id).path() {
        println!("      icon {}", icon.display());
    }
}

fn run_scan(ctx: &CommandContext) -> Result<(), CliError> {
    let mut registry = Registry::load(ctx.layout.clone())?;
    let report = registry.scan_and_reconcile()?;

    for id in &report.discovered {
        println!("{} {}", style("+").green().bold(), id);
    }
    for id in &report.removed {
        println!("{} {}", style("-").red().bold(), id);
    }
    if !report.has_changes() {
        println!("No changes.");
    }
    println!(
        "{} packages known, registry saved to {}",
        report.total,
        registry.store().manifest_path().display()
    );
    Ok(())
}

/// The package `id` names, if the user may enable or disable it.
fn toggle_target<'a>(registry: &'a Registry, id: &str) -> Result<&'a ContentPackage, CliError> {
    let base = registry.base_game();
    let package = if base.id == id {
        base
    } else {
        registry
            .get(id)
            .ok_or_else(|| CliError::UnknownPackage(id.to_string()))?
    };

    if !package.kind.is_toggleable() {
        return Err(CliError::NotToggleable(id.to_string()));
    }
    Ok(package)
}

fn run_toggle(ctx: &CommandContext, id: &str, enable: bool) -> Result<(), CliError> {
    let mut registry = ctx.open_registry()?;
    let package = toggle_target(&registry, id)?;

    if package.is_enabled() == enable {
        println!(
            "{} is already {}",
            id,
            if enable { "enabled" } else { "disabled" }
        );
        return Ok(());
    }

    let (from, to) = if enable {
        (PendingSet::Available, PendingSet::Enabled)
    } else {
        (PendingSet::Enabled, PendingSet::Available)
    };

    registry.begin_edit();
    registry.move_package(id, from, to);
    registry.apply(&|| tracing::info!("Content reload requested"))?;

    println!(
        "{} {}",
        if enable {
            style("Enabled").green().bold()
        } else {
            style("Disabled").yellow().bold()
        },
        id
    );
    Ok(())
}
