//! # RHTMX Pattern
//!
//! Declarative route templates for client-side routing:
//! - Literal segments (`/about`)
//! - Named parameters (`/users/{id}`)
//! - Optional parameters (`/posts/{id?}`)
//! - Catch-all parameters (`/docs/{path*}`, `/files/{path+}`)
//! - Constraints with arguments (`/{id:int:range(1,100)}`, `/{code:([A-Z]{3})}`)
//! - Default values (`/{page?:=(1)}`)
//!
//! A template compiles once into a [`RoutePattern`]. The pattern matches paths
//! into typed [`Params`] and resolves [`RouteValues`] back into paths.
//!
//! ## Path Normalization
//!
//! Paths are normalized before matching:
//! - Trailing slashes: `/path/` → `/path`
//! - Double slashes: `/path//to` → `/path/to`
//! - Relative paths (`path/to`) never match
//!
//! ## Example
//!
//! ```
//! use rhtmx_pattern::{RoutePattern, RouteValues, Value};
//!
//! let pattern = RoutePattern::new("/{controller}/{action}/{id?:int}").unwrap();
//!
//! let params = pattern.matches("/users/show/42").unwrap();
//! assert_eq!(params.value("controller"), Some(&Value::from("users")));
//! assert_eq!(params.value("id"), Some(&Value::Int(42)));
//! assert!(pattern.matches("/users/show/abc").is_none());
//!
//! let values = RouteValues::new()
//!     .with("controller", "users")
//!     .with("action", "edit")
//!     .with("id", 7)
//!     .with("tab", "profile");
//! assert_eq!(pattern.resolve(&values).unwrap(), "/users/edit/7?tab=profile");
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use regex::Regex;
use tracing::{debug, trace};

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
pub mod constraint;
mod error;
pub mod path;
pub mod route;
mod table;
mod value;

pub use config::{RouteEntry, RoutesConfig};
pub use constraint::{Constraint, ConstraintError, ConstraintProvider, ConstraintSet};
pub use error::{PatternError, PatternErrorKind};
pub use path::normalize_path;
pub use route::{Parameter, Part, Quantifier, Segment};
pub use table::{Route, RouteMatch, RouteTable, TableError};
pub use value::{ParamValue, Params, RouteValues, Value};

// ============================================================================
// Core Types
// ============================================================================

/// A compiled route template
///
/// Immutable once built. Two patterns are equal when their templates are.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    template: String,
    segments: Vec<Segment>,
    regex: Regex,
}

impl RoutePattern {
    /// Compiles a template using the built-in constraints
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_pattern::{PatternErrorKind, RoutePattern};
    ///
    /// assert!(RoutePattern::new("/docs/{path*}").is_ok());
    ///
    /// let err = RoutePattern::new("/{a*}/{b}").unwrap_err();
    /// assert_eq!(err.kind(), &PatternErrorKind::MisplacedCatchAll);
    /// ```
    pub fn new(template: &str) -> Result<Self, PatternError> {
        Self::with_constraints(template, &ConstraintSet::new())
    }

    /// Compiles a template, resolving constraint names through `provider`
    pub fn with_constraints(
        template: &str,
        provider: &dyn ConstraintProvider,
    ) -> Result<Self, PatternError> {
        let nodes = route::parser::parse(template)?;
        let segments = route::parser::bind(template, nodes, provider)?;
        let regex = route::compile::compile(template, &segments)?;

        debug!(template, regex = regex.as_str(), "compiled route pattern");

        Ok(Self {
            template: template.to_string(),
            segments,
            regex,
        })
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// The template this pattern was built from
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Parameters in declaration order
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.segments.iter().flat_map(Segment::parameters)
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters().find(|p| p.name == name)
    }

    /// Source of the compiled matcher expression
    pub fn regex(&self) -> &str {
        self.regex.as_str()
    }

    // ========================================================================
    // Matching
    // ========================================================================

    /// Matches a path and extracts its parameters
    ///
    /// Every declared parameter has an entry in the result. Returns `None` when
    /// the path does not match or a constraint rejects a value.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_pattern::{ParamValue, RoutePattern, Value};
    ///
    /// let pattern = RoutePattern::new("/{a?}/{b?}").unwrap();
    ///
    /// let params = pattern.matches("/1").unwrap();
    /// assert_eq!(params.get("a"), Some(&ParamValue::Present(Value::from("1"))));
    /// assert_eq!(params.get("b"), Some(&ParamValue::Missing));
    ///
    /// assert!(pattern.matches("/1/2/3").is_none());
    /// ```
    pub fn matches(&self, path: &str) -> Option<Params> {
        let path = normalize_path(path)?;
        let captures = self.regex.captures(&path)?;

        let mut params = Params::with_capacity(self.parameters().count());

        for (index, parameter) in self.parameters().enumerate() {
            let captured = captures
                .get(index + 1)
                .map(|m| m.as_str())
                .filter(|s| !s.is_empty());

            let (raw, from_default) = match (captured, parameter.default_value()) {
                (Some(text), _) => (text, false),
                (None, Some(default)) => (default, true),
                (None, None) => {
                    params.insert(parameter.name.as_str(), ParamValue::Missing);
                    continue;
                }
            };

            // Defaults come from the template and are taken as written
            let text = |piece: &str| -> Value {
                if from_default {
                    Value::from(piece)
                } else {
                    Value::from(decode(piece))
                }
            };

            let value = if parameter.is_catch_all() {
                let items = raw
                    .split('/')
                    .filter(|s| !s.is_empty())
                    .map(|piece| constrain(parameter, text(piece)))
                    .collect::<Option<Vec<_>>>()?;
                Value::Array(items)
            } else {
                constrain(parameter, text(raw))?
            };

            let value = if from_default {
                ParamValue::Default(value)
            } else {
                ParamValue::Present(value)
            };
            params.insert(parameter.name.as_str(), value);
        }

        Some(params)
    }

    /// Whether `path` matches, constraints included
    pub fn is_match(&self, path: &str) -> bool {
        self.matches(path).is_some()
    }

    // ========================================================================
    // Path Generation
    // ========================================================================

    /// Builds a path from `values`
    ///
    /// Missing or empty values fall back to the parameter's default. A required
    /// parameter left without a value makes the whole call return `None`; an
    /// optional one is left out. Values the pattern does not use are appended
    /// as a query string, in insertion order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_pattern::{RoutePattern, RouteValues};
    ///
    /// let pattern = RoutePattern::new("/docs/{path*}").unwrap();
    ///
    /// let values = RouteValues::new().with("path", vec!["guide", "getting started"]);
    /// assert_eq!(pattern.resolve(&values).unwrap(), "/docs/guide/getting%20started");
    ///
    /// assert_eq!(pattern.resolve(&RouteValues::new()).unwrap(), "/docs");
    /// ```
    pub fn resolve(&self, values: &RouteValues) -> Option<String> {
        let mut remaining = values.clone();
        let mut segments: Vec<String> = Vec::with_capacity(self.segments.len());

        for segment in &self.segments {
            let mut text = String::new();

            for part in &segment.parts {
                let parameter = match part {
                    Part::Literal { text: literal } => {
                        text.push_str(literal);
                        continue;
                    }
                    Part::Parameter(parameter) => parameter,
                };

                let value = remaining
                    .take(&parameter.name)
                    .filter(|v| !v.is_empty())
                    .or_else(|| default_for_resolve(parameter));

                let Some(value) = value else {
                    if parameter.is_required() {
                        return None;
                    }
                    continue;
                };

                if parameter.is_catch_all() {
                    let pieces: Vec<String> = value
                        .into_list()
                        .iter()
                        .map(|item| encode(&item.to_text()))
                        .collect();
                    text.push_str(&pieces.join("/"));
                } else {
                    text.push_str(&encode(&value.to_text()));
                }
            }

            if !text.is_empty() {
                segments.push(text);
            }
        }

        let mut path = format!("/{}", segments.join("/"));

        if !remaining.is_empty() {
            let query: Vec<String> = remaining
                .iter()
                .map(|(name, value)| format!("{}={}", encode(name), encode(&value.to_text())))
                .collect();
            path.push('?');
            path.push_str(&query.join("&"));
        }

        Some(path)
    }
}

/// Runs the constraint chain; each transform feeds the next constraint
fn constrain(parameter: &Parameter, value: Value) -> Option<Value> {
    parameter
        .constraints
        .iter()
        .try_fold(value, |value, constraint| {
            let result = constraint.apply(value);
            if result.is_none() {
                trace!(
                    parameter = parameter.name.as_str(),
                    constraint = constraint.name(),
                    "constraint rejected value"
                );
            }
            result
        })
}

/// The declared default as a resolve value, or `None` when it is empty
fn default_for_resolve(parameter: &Parameter) -> Option<Value> {
    let default = parameter.default_value()?;
    let value = if parameter.is_catch_all() {
        Value::Array(
            default
                .split('/')
                .filter(|s| !s.is_empty())
                .map(Value::from)
                .collect(),
        )
    } else {
        Value::from(default)
    };
    Some(value).filter(|v| !v.is_empty())
}

/// Percent-decodes a captured piece, keeping it raw when it is not valid UTF-8
fn decode(piece: &str) -> String {
    urlencoding::decode(piece)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| piece.to_string())
}

fn encode(text: &str) -> String {
    urlencoding::encode(text).into_owned()
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl PartialEq for RoutePattern {
    fn eq(&self, other: &Self) -> bool {
        self.template == other.template
    }
}

impl Eq for RoutePattern {}

impl Hash for RoutePattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.template.hash(state);
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

impl FromStr for RoutePattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoutePattern::new(s)
    }
}
