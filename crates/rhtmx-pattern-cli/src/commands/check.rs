use anyhow::{bail, Result};
use colored::Colorize;
use rhtmx_pattern::{Parameter, RoutePattern};

pub fn execute(templates: &[String]) -> Result<()> {
    let mut failures = 0;

    for template in templates {
        match RoutePattern::new(template) {
            Ok(pattern) => {
                println!("{} {}", "✓".green(), template.cyan());
                println!("  regex: {}", pattern.regex());
                for parameter in pattern.parameters() {
                    println!("  {}", describe(parameter));
                }
            }
            Err(err) => {
                failures += 1;
                println!("{} {}", "✗".red(), template.cyan());
                println!("  {}", err.to_string().red());
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} templates failed to compile", failures, templates.len());
    }

    Ok(())
}

fn describe(parameter: &Parameter) -> String {
    let mut line = format!("{}{}", parameter.name().bold(), parameter.quantifier());

    for constraint in parameter.constraints() {
        line.push(':');
        line.push_str(constraint.name());
        if !constraint.argument().is_empty() {
            line.push_str(&format!("({})", constraint.argument()));
        }
    }

    if let Some(default) = parameter.default_value() {
        line.push_str(&format!(" = {:?}", default));
    }

    line
}
