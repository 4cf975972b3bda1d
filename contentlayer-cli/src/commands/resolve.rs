//! `resolve` command: show which file a content path maps to.

use console::style;
use contentlayer::resolver::ContentResolver;

use super::common::CommandContext;
use crate::error::CliError;

/// Resolve `path` against the current registry and print the result.
pub fn run(path: &str, ctx: &CommandContext) -> Result<(), CliError> {
    let registry = ctx.open_registry()?;
    let resolver = ContentResolver::new(&registry);

    let resolution = resolver
        .locate(path)
        .ok_or_else(|| CliError::NotFound(path.to_string()))?;

    println!("{}", resolution.path.display());
    println!(
        "  {} {} ({})",
        style("from").dim(),
        style(&resolution.package_id).bold(),
        resolution.layer
    );
    Ok(())
}
