use std::path::Path;

use anyhow::{bail, Result};
use colored::Colorize;
use rhtmx_pattern::RoutesConfig;

pub fn execute(config: &Path, path: &str) -> Result<()> {
    let table = RoutesConfig::load(config)?.table()?;

    tracing::debug!(routes = table.len(), config = ?config, "loaded route table");

    let Some(found) = table.match_path(path) else {
        bail!("No route matches {}", path);
    };

    println!(
        "{} {}",
        "✓".green(),
        found.name().unwrap_or("(unnamed)").cyan().bold()
    );
    println!("  template: {}", found.template());
    println!("  path:     {}", found.path);
    println!("{}", serde_json::to_string_pretty(&found.params)?);

    Ok(())
}
