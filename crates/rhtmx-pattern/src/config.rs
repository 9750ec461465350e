// File: src/config.rs
// Purpose: Route table configuration parsing from routes.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::constraint::ConstraintSet;
use crate::table::{RouteTable, TableError};

/// Route table configuration
///
/// ```toml
/// [constraints]
/// slug = "^[a-z0-9-]+$"
///
/// [[route]]
/// name = "product"
/// pattern = "/products/{id:int}"
///
/// [[route]]
/// pattern = "/{page:slug}"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RoutesConfig {
    /// Named regex constraints, usable in every route
    #[serde(default)]
    pub constraints: BTreeMap<String, String>,

    /// Routes in match order
    #[serde(default, rename = "route")]
    pub routes: Vec<RouteEntry>,
}

/// One `[[route]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEntry {
    #[serde(default)]
    pub name: Option<String>,

    pub pattern: String,
}

impl RoutesConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Parse configuration from TOML text; empty text gives an empty config
    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: RoutesConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Compiles the configured constraints
    pub fn constraint_set(&self) -> Result<ConstraintSet, TableError> {
        let mut set = ConstraintSet::new();
        for (name, pattern) in &self.constraints {
            set.register_regex(name.as_str(), pattern)
                .map_err(|source| TableError::InvalidConstraint {
                    name: name.clone(),
                    source,
                })?;
        }
        Ok(set)
    }

    /// Builds the route table described by this configuration
    pub fn table(&self) -> Result<RouteTable, TableError> {
        RouteTable::from_config(self)
    }
}
