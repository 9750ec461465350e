use anyhow::{bail, Context, Result};
use rhtmx_pattern::{RoutePattern, RouteValues, Value};

pub fn execute(template: &str, pairs: &[String]) -> Result<()> {
    let pattern = RoutePattern::new(template)?;
    let values = parse_values(pairs)?;

    let Some(path) = pattern.resolve(&values) else {
        bail!("Cannot resolve {}: a required parameter has no value", template);
    };

    println!("{}", path);
    Ok(())
}

/// Parses `NAME=VALUE` pairs; a repeated name collects its values into a list
fn parse_values(pairs: &[String]) -> Result<RouteValues> {
    let mut values = RouteValues::new();

    for pair in pairs {
        let (name, value) = pair
            .split_once('=')
            .with_context(|| format!("Expected NAME=VALUE, got {:?}", pair))?;

        let value = match values.get(name) {
            Some(Value::Array(items)) => {
                let mut items = items.clone();
                items.push(Value::from(value));
                Value::Array(items)
            }
            Some(previous) => Value::Array(vec![previous.clone(), Value::from(value)]),
            None => Value::from(value),
        };
        values.set(name, value);
    }

    Ok(values)
}
