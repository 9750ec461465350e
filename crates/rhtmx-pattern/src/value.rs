//! Typed parameter values
//!
//! `Value` is what a parameter holds once its constraints have run: text by
//! default, or a scalar produced by a transforming constraint (`int`, `number`,
//! `bool`). Catch-all parameters hold an `Array`.

use std::borrow::Cow;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::constraint::builtin::is_numeral;

/// Supported parameter value types
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Number(f64),
    String(String),
    Array(Vec<Value>),
}

impl Value {
    /// Text form used for regex/length constraints and for path generation
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Value::String(s) => Cow::Borrowed(s.as_str()),
            Value::Bool(b) => Cow::Owned(b.to_string()),
            Value::Int(n) => Cow::Owned(n.to_string()),
            Value::Number(n) => {
                // Format number nicely (remove .0 for integers)
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    Cow::Owned(format!("{}", *n as i64))
                } else {
                    Cow::Owned(n.to_string())
                }
            }
            Value::Array(items) => Cow::Owned(
                items
                    .iter()
                    .map(|v| v.to_text().into_owned())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
        }
    }

    /// Numeric view used by `min`, `max` and `range`
    ///
    /// Strings have one only when they spell a decimal numeral, so `inf` or
    /// `NaN` in a path never compare as numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Number(n) => Some(*n),
            Value::String(s) => {
                let s = s.trim();
                if is_numeral(s) {
                    s.parse::<f64>().ok()
                } else {
                    None
                }
            }
            Value::Bool(_) | Value::Array(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// An empty string or an empty array
    pub fn is_empty(&self) -> bool {
        match self {
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Coerces into a list: arrays are flattened one level, scalars wrapped
    pub(crate) fn into_list(self) -> Vec<Value> {
        match self {
            Value::Array(items) => items,
            other => vec![other],
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

// ============================================================================
// Match results
// ============================================================================

/// Outcome for one parameter of a successful match
///
/// Keeps apart "not supplied" from "supplied" and "filled from the declared
/// default", which a plain `Option` cannot.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Optional parameter absent from the path, no default declared
    Missing,
    /// Absent from the path, filled from the declared default
    Default(Value),
    /// Taken from the path
    Present(Value),
}

impl ParamValue {
    /// The value, whether taken from the path or from the default
    pub fn value(&self) -> Option<&Value> {
        match self {
            ParamValue::Missing => None,
            ParamValue::Default(v) | ParamValue::Present(v) => Some(v),
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            ParamValue::Missing => None,
            ParamValue::Default(v) | ParamValue::Present(v) => Some(v),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ParamValue::Missing)
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ParamValue::Default(_))
    }

    pub fn is_present(&self) -> bool {
        matches!(self, ParamValue::Present(_))
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value() {
            Some(v) => v.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }
}

/// Parameters extracted by a successful match, in declaration order
///
/// Every declared parameter has an entry, including `Missing` ones.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: ParamValue) {
        self.entries.push((name.into(), value));
    }

    /// Gets the three-state entry for a parameter
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Gets the value of a parameter, `None` when absent or `Missing`
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(ParamValue::value)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// ============================================================================
// Resolve input
// ============================================================================

/// Ordered values handed to [`RoutePattern::resolve`](crate::RoutePattern::resolve)
///
/// Setting a name twice replaces the earlier value in place. Values not
/// consumed by the pattern become the query string, in insertion order.
///
/// # Examples
///
/// ```
/// use rhtmx_pattern::RouteValues;
///
/// let values = RouteValues::new()
///     .with("id", 10)
///     .with("tags", vec!["a", "b"])
///     .with("id", 12);
///
/// assert_eq!(values.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteValues {
    entries: Vec<(String, Value)>,
}

impl RouteValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value (builder form)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Removes and returns a value
    pub(crate) fn take(&mut self, name: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RouteValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = RouteValues::new();
        for (k, v) in iter {
            values.set(k, v);
        }
        values
    }
}

/// Feeds a match result back into `resolve`; `Missing` entries are skipped
impl From<&Params> for RouteValues {
    fn from(params: &Params) -> Self {
        params
            .iter()
            .filter_map(|(name, value)| value.value().map(|v| (name, v.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_text() {
        assert_eq!(Value::from("abc").to_text(), "abc");
        assert_eq!(Value::from(true).to_text(), "true");
        assert_eq!(Value::from(42).to_text(), "42");
        assert_eq!(Value::from(1000.0).to_text(), "1000");
        assert_eq!(Value::from(0.5).to_text(), "0.5");
        assert_eq!(Value::from(vec!["a", "b"]).to_text(), "a,b");
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(Value::from("12.5").as_f64(), Some(12.5));
        assert_eq!(Value::from(3).as_f64(), Some(3.0));
        assert_eq!(Value::from("abc").as_f64(), None);
        assert_eq!(Value::from(true).as_f64(), None);
        assert_eq!(Value::from(" 7 ").as_f64(), Some(7.0));
        assert_eq!(Value::from("inf").as_f64(), None);
        assert_eq!(Value::from("-Infinity").as_f64(), None);
        assert_eq!(Value::from("NaN").as_f64(), None);
    }

    #[test]
    fn test_is_empty() {
        assert!(Value::from("").is_empty());
        assert!(Value::Array(vec![]).is_empty());
        assert!(!Value::from(0).is_empty());
        assert!(!Value::from("x").is_empty());
    }

    #[test]
    fn test_param_value_states() {
        assert_eq!(ParamValue::Missing.value(), None);
        assert_eq!(
            ParamValue::Default(Value::from("10")).value(),
            Some(&Value::from("10"))
        );
        assert!(ParamValue::Present(Value::from(1)).is_present());
        assert_eq!(ParamValue::Missing.into_value(), None);
        assert_eq!(
            ParamValue::Present(Value::from(vec![1, 2])).into_value(),
            Some(Value::from(vec![1, 2]))
        );
    }

    #[test]
    fn test_params_keep_missing_entries() {
        let mut params = Params::default();
        params.insert("a", ParamValue::Present(Value::from("1")));
        params.insert("b", ParamValue::Missing);

        assert!(params.contains_key("b"));
        assert_eq!(params.value("b"), None);
        assert_eq!(params.value("a"), Some(&Value::from("1")));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_route_values_replace_in_place() {
        let values = RouteValues::new().with("a", 1).with("b", 2).with("a", 3);
        let names: Vec<&str> = values.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(values.get("a"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_route_values_from_params_skips_missing() {
        let mut params = Params::default();
        params.insert("a", ParamValue::Present(Value::from("1")));
        params.insert("b", ParamValue::Missing);
        params.insert("c", ParamValue::Default(Value::from("x")));

        let values = RouteValues::from(&params);
        assert_eq!(values.len(), 2);
        assert_eq!(values.get("c"), Some(&Value::from("x")));
    }
}
