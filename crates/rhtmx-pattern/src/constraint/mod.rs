//! Parameter constraints
//!
//! A constraint is built once, when its pattern is compiled, from a name and
//! an argument string (`{id:range(1,10)}` asks for `range` with `"1,10"`).
//! At match time each constraint tests a value and may transform it before the
//! next constraint of the chain sees it.
//!
//! Constraint names are resolved through a [`ConstraintProvider`]. The default
//! provider is an empty [`ConstraintSet`], which falls back to the built-ins.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::value::Value;

pub(crate) mod builtin;

pub use builtin::BUILTIN_NAMES;

/// Predicate run against a parameter value
pub type ConstraintTest = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Conversion applied after a passing test; `None` rejects the value
pub type ConstraintTransform = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

/// Builds a constraint from its argument text
pub type ConstraintFactory = Arc<dyn Fn(&str) -> Result<Constraint, String> + Send + Sync>;

/// A compiled constraint: a test plus an optional transform
#[derive(Clone)]
pub struct Constraint {
    name: String,
    argument: String,
    test: ConstraintTest,
    transform: Option<ConstraintTransform>,
}

impl Constraint {
    /// Creates a test-only constraint
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_pattern::{Constraint, Value};
    ///
    /// let even = Constraint::new(|v: &Value| v.as_f64().map_or(false, |n| n % 2.0 == 0.0));
    /// assert_eq!(even.apply(Value::from("4")), Some(Value::from("4")));
    /// assert_eq!(even.apply(Value::from("5")), None);
    /// ```
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: String::new(),
            argument: String::new(),
            test: Arc::new(test),
            transform: None,
        }
    }

    /// Adds a transform run on values that pass the test
    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// Stamps the name and argument the constraint was created from
    pub(crate) fn labelled(mut self, name: &str, argument: &str) -> Self {
        self.name = name.to_string();
        self.argument = argument.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn argument(&self) -> &str {
        &self.argument
    }

    /// Tests a value and applies the transform
    ///
    /// Returns `None` when the value is rejected.
    pub fn apply(&self, value: Value) -> Option<Value> {
        if !(self.test)(&value) {
            return None;
        }
        match &self.transform {
            Some(transform) => transform(&value),
            None => Some(value),
        }
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("name", &self.name)
            .field("argument", &self.argument)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

// ============================================================================
// Providers
// ============================================================================

/// Why a provider could not build a constraint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    #[error("unknown constraint")]
    Unknown,
    #[error("{0}")]
    InvalidArgument(String),
}

/// Resolves constraint names while a pattern is compiled
pub trait ConstraintProvider: Send + Sync {
    fn create(&self, name: &str, argument: &str) -> Result<Constraint, ConstraintError>;
}

/// Custom constraints layered over the built-ins
///
/// A name registered here shadows the built-in of the same name. Names the set
/// does not know are looked up among the built-ins.
///
/// # Examples
///
/// ```
/// use rhtmx_pattern::{Constraint, ConstraintSet, RoutePattern, Value};
///
/// let mut constraints = ConstraintSet::new();
/// constraints.register("upper", |_arg: &str| {
///     Ok(Constraint::new(|v: &Value| v.to_text().chars().all(|c| c.is_ascii_uppercase())))
/// });
///
/// let pattern = RoutePattern::with_constraints("/{code:upper}", &constraints).unwrap();
/// assert!(pattern.matches("/ABC").is_some());
/// assert!(pattern.matches("/abc").is_none());
/// ```
#[derive(Clone, Default)]
pub struct ConstraintSet {
    factories: HashMap<String, ConstraintFactory>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a constraint factory
    ///
    /// `default` and `=` declare default values in templates and cannot be
    /// registered; such calls are ignored.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&str) -> Result<Constraint, String> + Send + Sync + 'static,
    {
        let name = name.into();
        if name == "default" || name == "=" {
            tracing::warn!(constraint = %name, "reserved constraint name ignored");
            return self;
        }
        self.factories.insert(name, Arc::new(factory));
        self
    }

    /// Builder form of [`register`](Self::register)
    pub fn with<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&str) -> Result<Constraint, String> + Send + Sync + 'static,
    {
        self.register(name, factory);
        self
    }

    /// Registers a constraint testing values against a fixed regular expression
    pub fn register_regex(
        &mut self,
        name: impl Into<String>,
        pattern: &str,
    ) -> Result<&mut Self, regex::Error> {
        let re = regex::Regex::new(pattern)?;
        Ok(self.register(name, move |_| {
            let re = re.clone();
            Ok(Constraint::new(move |v: &Value| re.is_match(&v.to_text())))
        }))
    }

    /// Whether a custom constraint is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Names of the custom constraints, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl ConstraintProvider for ConstraintSet {
    fn create(&self, name: &str, argument: &str) -> Result<Constraint, ConstraintError> {
        let constraint = match self.factories.get(name) {
            Some(factory) => factory(argument),
            None => builtin::create(name, argument).ok_or(ConstraintError::Unknown)?,
        };

        constraint
            .map(|c| c.labelled(name, argument))
            .map_err(ConstraintError::InvalidArgument)
    }
}

impl fmt::Debug for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintSet")
            .field("custom", &self.names())
            .finish()
    }
}
