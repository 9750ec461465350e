//! Ordered route table
//!
//! Routes are tried in insertion order and the first match wins. Named routes
//! can also be used to generate paths.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::config::RoutesConfig;
use crate::constraint::ConstraintProvider;
use crate::error::PatternError;
use crate::path::normalize_path;
use crate::value::{Params, RouteValues};
use crate::RoutePattern;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("A route named '{0}' is already registered")]
    DuplicateName(String),
    #[error("Invalid constraint '{name}': {source}")]
    InvalidConstraint {
        name: String,
        #[source]
        source: regex::Error,
    },
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// A pattern registered in a [`RouteTable`]
#[derive(Debug, Clone)]
pub struct Route {
    name: Option<String>,
    pattern: RoutePattern,
}

impl Route {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }
}

/// Result of matching a path against a route table
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    /// The matched route
    pub route: &'a Route,
    /// Extracted parameters from the path
    pub params: Params,
    /// The normalized path that matched
    pub path: String,
}

impl RouteMatch<'_> {
    pub fn name(&self) -> Option<&str> {
        self.route.name()
    }

    pub fn template(&self) -> &str {
        self.route.pattern.template()
    }
}

/// Route patterns matched in insertion order
///
/// # Examples
///
/// ```
/// use rhtmx_pattern::{RoutePattern, RouteTable, RouteValues, Value};
///
/// let mut table = RouteTable::new();
/// table.add_named("user", RoutePattern::new("/users/{id:int}").unwrap()).unwrap();
/// table.add(RoutePattern::new("/{path*}").unwrap());
///
/// let m = table.match_path("/users/42").unwrap();
/// assert_eq!(m.name(), Some("user"));
/// assert_eq!(m.params.value("id"), Some(&Value::Int(42)));
///
/// // Falls through to the catch-all
/// let m = table.match_path("/users/bob").unwrap();
/// assert_eq!(m.template(), "/{path*}");
///
/// let path = table.resolve("user", &RouteValues::new().with("id", 7));
/// assert_eq!(path.as_deref(), Some("/users/7"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    named: HashMap<String, usize>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from configuration
    ///
    /// The configured constraints are compiled first and used for every route.
    pub fn from_config(config: &RoutesConfig) -> Result<Self, TableError> {
        let constraints = config.constraint_set()?;
        let mut table = Self::new();

        for entry in &config.routes {
            table.insert(entry.name.clone(), &entry.pattern, &constraints)?;
        }

        debug!(routes = table.len(), "built route table from config");
        Ok(table)
    }

    /// Appends an unnamed route
    pub fn add(&mut self, pattern: RoutePattern) -> &mut Self {
        self.routes.push(Route {
            name: None,
            pattern,
        });
        self
    }

    /// Appends a named route; names are unique within a table
    pub fn add_named(
        &mut self,
        name: impl Into<String>,
        pattern: RoutePattern,
    ) -> Result<&mut Self, TableError> {
        let name = name.into();
        if self.named.contains_key(&name) {
            return Err(TableError::DuplicateName(name));
        }

        self.named.insert(name.clone(), self.routes.len());
        self.routes.push(Route {
            name: Some(name),
            pattern,
        });
        Ok(self)
    }

    /// Appends a route (functional builder)
    pub fn with_route(mut self, pattern: RoutePattern) -> Self {
        self.add(pattern);
        self
    }

    /// Compiles `template` with `provider` and appends it
    pub fn insert(
        &mut self,
        name: Option<String>,
        template: &str,
        provider: &dyn ConstraintProvider,
    ) -> Result<&mut Self, TableError> {
        let pattern = RoutePattern::with_constraints(template, provider)?;
        match name {
            Some(name) => self.add_named(name, pattern),
            None => Ok(self.add(pattern)),
        }
    }

    /// Matches a path against all routes and returns the first match
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_>> {
        let normalized = normalize_path(path)?;

        let found = self.routes.iter().find_map(|route| {
            route.pattern.matches(&normalized).map(|params| RouteMatch {
                route,
                params,
                path: normalized.to_string(),
            })
        });

        match &found {
            Some(m) => debug!(path, template = m.template(), "route matched"),
            None => debug!(path, "no route matched"),
        }

        found
    }

    /// Builds a path through a named route
    ///
    /// `None` when no route has that name or the values cannot fill it.
    pub fn resolve(&self, name: &str, values: &RouteValues) -> Option<String> {
        self.get(name).and_then(|route| route.pattern.resolve(values))
    }

    /// Gets a route by its name
    pub fn get(&self, name: &str) -> Option<&Route> {
        self.named.get(name).map(|&index| &self.routes[index])
    }

    /// Routes in match order
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::ConstraintSet;
    use crate::value::Value;

    fn pattern(template: &str) -> RoutePattern {
        RoutePattern::new(template).unwrap()
    }

    #[test]
    fn test_first_match_wins() {
        let table = RouteTable::new()
            .with_route(pattern("/{id:int}"))
            .with_route(pattern("/{slug}"));

        assert_eq!(table.match_path("/10").unwrap().template(), "/{id:int}");
        assert_eq!(table.match_path("/ten").unwrap().template(), "/{slug}");
        assert!(table.match_path("/a/b").is_none());
    }

    #[test]
    fn test_match_path_normalizes() {
        let table = RouteTable::new().with_route(pattern("/a/{b}"));
        let m = table.match_path("//a//x/").unwrap();
        assert_eq!(m.path, "/a/x");
        assert!(table.match_path("a/x").is_none());
    }

    #[test]
    fn test_duplicate_name() {
        let mut table = RouteTable::new();
        table.add_named("home", pattern("/")).unwrap();
        let err = table.add_named("home", pattern("/home")).unwrap_err();
        assert!(matches!(err, TableError::DuplicateName(name) if name == "home"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_resolve_named() {
        let mut table = RouteTable::new();
        table.add_named("post", pattern("/posts/{year}/{slug}")).unwrap();

        let values = RouteValues::new().with("year", 2024).with("slug", "hello-world");
        assert_eq!(
            table.resolve("post", &values).as_deref(),
            Some("/posts/2024/hello-world")
        );
        assert_eq!(table.resolve("missing", &values), None);
        assert_eq!(table.resolve("post", &RouteValues::new()), None);
    }

    #[test]
    fn test_insert_with_provider() {
        let mut constraints = ConstraintSet::new();
        constraints.register_regex("slug", "^[a-z-]+$").unwrap();

        let mut table = RouteTable::new();
        table
            .insert(Some("page".into()), "/{name:slug}", &constraints)
            .unwrap();

        let m = table.match_path("/about-us").unwrap();
        assert_eq!(m.params.value("name"), Some(&Value::from("about-us")));
        assert!(table.match_path("/About").is_none());

        let err = table.insert(None, "/{x:nope}", &constraints).unwrap_err();
        assert!(matches!(err, TableError::Pattern(_)));
    }

    #[test]
    fn test_get_and_routes() {
        let mut table = RouteTable::new();
        table.add(pattern("/a"));
        table.add_named("b", pattern("/b")).unwrap();

        assert_eq!(table.get("b").unwrap().pattern().template(), "/b");
        assert!(table.get("a").is_none());
        assert_eq!(table.routes().len(), 2);
        assert!(!table.is_empty());
    }
}
