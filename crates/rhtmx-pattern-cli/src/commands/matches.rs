use anyhow::{bail, Result};
use colored::Colorize;
use rhtmx_pattern::RoutePattern;

pub fn execute(template: &str, path: &str) -> Result<()> {
    let pattern = RoutePattern::new(template)?;

    let Some(params) = pattern.matches(path) else {
        bail!("{} does not match {}", path, template);
    };

    println!("{}", serde_json::to_string_pretty(&params)?);

    let defaulted: Vec<&str> = params
        .iter()
        .filter(|(_, value)| value.is_default())
        .map(|(name, _)| name)
        .collect();
    if !defaulted.is_empty() {
        eprintln!("{} {}", "defaults used:".dimmed(), defaulted.join(", "));
    }

    Ok(())
}
