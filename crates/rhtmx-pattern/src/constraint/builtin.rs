// Built-in constraints: regex, bool, int, number, alpha, min, max, range,
// length, minlength, maxlength

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::Constraint;
use crate::value::Value;

type Factory = fn(&str) -> Result<Constraint, String>;

pub const BUILTIN_NAMES: &[&str] = &[
    "regex",
    "bool",
    "int",
    "number",
    "alpha",
    "min",
    "max",
    "range",
    "length",
    "minlength",
    "maxlength",
];

static BUILTIN: Lazy<HashMap<&'static str, Factory>> = Lazy::new(|| {
    let mut map: HashMap<&'static str, Factory> = HashMap::new();
    map.insert("regex", regex_constraint);
    map.insert("bool", bool_constraint);
    map.insert("int", int_constraint);
    map.insert("number", number_constraint);
    map.insert("alpha", alpha_constraint);
    map.insert("min", min_constraint);
    map.insert("max", max_constraint);
    map.insert("range", range_constraint);
    map.insert("length", length_constraint);
    map.insert("minlength", minlength_constraint);
    map.insert("maxlength", maxlength_constraint);
    map
});

static BOOL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?i:true|false)$").unwrap());

static INT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

static NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-+]?[0-9]*\.?[0-9]+(?:[eE][-+]?[0-9]+)?$").unwrap());

static ALPHA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?i:[a-z]+)$").unwrap());

/// Decimal numeral with optional sign, fraction and exponent
///
/// Words such as `inf` or `NaN`, which `f64::from_str` also accepts, are not
/// numerals.
pub(crate) fn is_numeral(text: &str) -> bool {
    NUMBER_REGEX.is_match(text)
}

/// Looks up a built-in and builds it; `None` for unknown names
pub(super) fn create(name: &str, argument: &str) -> Option<Result<Constraint, String>> {
    BUILTIN.get(name).map(|factory| factory(argument))
}

fn regex_constraint(argument: &str) -> Result<Constraint, String> {
    let re = Regex::new(argument).map_err(|e| e.to_string())?;
    Ok(Constraint::new(move |v| re.is_match(&v.to_text())))
}

fn bool_constraint(_: &str) -> Result<Constraint, String> {
    Ok(Constraint::new(|v| BOOL_REGEX.is_match(&v.to_text()))
        .with_transform(|v| Some(Value::Bool(v.to_text().eq_ignore_ascii_case("true")))))
}

fn int_constraint(_: &str) -> Result<Constraint, String> {
    // Too many digits for i64 fails the transform, and so the match
    Ok(Constraint::new(|v| INT_REGEX.is_match(&v.to_text()))
        .with_transform(|v| v.to_text().parse::<i64>().ok().map(Value::Int)))
}

fn number_constraint(_: &str) -> Result<Constraint, String> {
    Ok(Constraint::new(|v| {
        let text = v.to_text();
        is_numeral(&text) && text.parse::<f64>().map_or(false, f64::is_finite)
    })
    .with_transform(|v| v.to_text().parse::<f64>().ok().map(Value::Number)))
}

fn alpha_constraint(_: &str) -> Result<Constraint, String> {
    Ok(Constraint::new(|v| ALPHA_REGEX.is_match(&v.to_text())))
}

fn min_constraint(argument: &str) -> Result<Constraint, String> {
    let min = parse_number(argument)?;
    Ok(Constraint::new(move |v| v.as_f64().map_or(false, |n| n >= min)))
}

fn max_constraint(argument: &str) -> Result<Constraint, String> {
    let max = parse_number(argument)?;
    Ok(Constraint::new(move |v| v.as_f64().map_or(false, |n| n <= max)))
}

fn range_constraint(argument: &str) -> Result<Constraint, String> {
    let mut bounds = argument.split(',');
    let (Some(low), Some(high)) = (bounds.next(), bounds.next()) else {
        return Err("expected two comma-separated numbers".to_string());
    };
    let low = parse_number(low)?;
    let high = parse_number(high)?;
    Ok(Constraint::new(move |v| {
        v.as_f64().map_or(false, |n| n >= low && n <= high)
    }))
}

fn length_constraint(argument: &str) -> Result<Constraint, String> {
    let length = parse_length(argument)?;
    Ok(Constraint::new(move |v| char_count(v) == Some(length)))
}

fn minlength_constraint(argument: &str) -> Result<Constraint, String> {
    let length = parse_length(argument)?;
    Ok(Constraint::new(move |v| {
        char_count(v).map_or(false, |n| n >= length)
    }))
}

fn maxlength_constraint(argument: &str) -> Result<Constraint, String> {
    let length = parse_length(argument)?;
    Ok(Constraint::new(move |v| {
        char_count(v).map_or(false, |n| n <= length)
    }))
}

fn parse_number(text: &str) -> Result<f64, String> {
    let text = text.trim();
    match text.parse::<f64>() {
        Ok(n) if is_numeral(text) => Ok(n),
        _ => Err("expected a number".to_string()),
    }
}

fn parse_length(text: &str) -> Result<usize, String> {
    text.trim()
        .parse::<usize>()
        .map_err(|_| "expected a non-negative integer".to_string())
}

// Length constraints only apply to text
fn char_count(value: &Value) -> Option<usize> {
    value.as_str().map(|s| s.chars().count())
}
