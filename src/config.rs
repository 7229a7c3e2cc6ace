//! Routes-file loading.
//!
//! A route table can be described in a YAML or JSON file and built at
//! startup, keeping route setup out of application code:
//!
//! ```yaml
//! case_sensitive: false
//! ignore:
//!   - template: "content/{*file}"
//! routes:
//!   - name: blog
//!     template: "blog/{action}/{id?}"
//!     defaults: { controller: Blog }
//!     constraints: { id: '\d+' }
//!   - name: default
//!     template: "{controller=Home}/{action=index}/{id?}"
//! ```
//!
//! Entry order in the file is registration order, which is match priority.
//! Registration invariants (unique names, unambiguous defaults) are
//! enforced while building the table, so a bad file fails loudly before the
//! application starts serving.

use std::collections::HashMap;

use anyhow::Context;
use serde::Deserialize;

use crate::router::{RouteDef, RouteError, RouteTable};

/// On-disk description of a route table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoutesConfig {
    /// Match paths case-sensitively (routing is case-insensitive by default)
    #[serde(default)]
    pub case_sensitive: bool,
    /// Ignore patterns, checked before ordinary routes
    #[serde(default)]
    pub ignore: Vec<IgnoreEntry>,
    /// Ordered route definitions; file order is match priority
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

/// One route definition in a routes file.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteEntry {
    pub name: String,
    pub template: String,
    #[serde(default)]
    pub defaults: HashMap<String, String>,
    #[serde(default)]
    pub constraints: HashMap<String, String>,
}

/// One ignore pattern in a routes file.
#[derive(Debug, Clone, Deserialize)]
pub struct IgnoreEntry {
    pub template: String,
    #[serde(default)]
    pub constraints: HashMap<String, String>,
}

/// Load a routes file. YAML or JSON is selected by file extension.
///
/// # Errors
///
/// I/O and parse failures, with the offending path attached.
pub fn load_config(file_path: &str) -> anyhow::Result<RoutesConfig> {
    let content = std::fs::read_to_string(file_path)
        .with_context(|| format!("failed to read routes file {}", file_path))?;
    let config = if file_path.ends_with(".yaml") || file_path.ends_with(".yml") {
        serde_yaml::from_str(&content).with_context(|| format!("invalid YAML in {}", file_path))?
    } else {
        serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", file_path))?
    };
    Ok(config)
}

impl RoutesConfig {
    /// Build a route table, enforcing the registration invariants.
    ///
    /// # Errors
    ///
    /// Any [`RouteError`] a programmatic registration of the same entries
    /// would produce.
    pub fn build_table(&self) -> Result<RouteTable, RouteError> {
        let mut table = if self.case_sensitive {
            RouteTable::new_case_sensitive()
        } else {
            RouteTable::new()
        };
        for entry in &self.ignore {
            table.ignore_with(&entry.template, entry.constraints.clone())?;
        }
        for entry in &self.routes {
            table.add(RouteDef {
                name: entry.name.clone(),
                template: entry.template.clone(),
                defaults: entry.defaults.clone(),
                constraints: entry.constraints.clone(),
            })?;
        }
        Ok(table)
    }
}

/// Load a routes file and build its table in one step.
///
/// # Errors
///
/// Everything [`load_config`] and [`RoutesConfig::build_table`] can fail
/// with, wrapped with file context.
pub fn load_table(file_path: &str) -> anyhow::Result<RouteTable> {
    let config = load_config(file_path)?;
    let table = config
        .build_table()
        .with_context(|| format!("invalid route configuration in {}", file_path))?;
    Ok(table)
}
