//! Serializable bag definitions
//!
//! A definition is the plain-data form of a [`ParameterBag`](crate::ParameterBag),
//! typically parsed from TOML:
//!
//! ```toml
//! default_namespace = "app"
//! default_scope = "site_en"
//!
//! [groups]
//! site_en = ["public"]
//!
//! [parameters]
//! "app.default.languages" = ["eng-GB"]
//! "app.site_en.languages" = ["eng-US", "eng-GB"]
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scope::{DEFAULT_SCOPE, ScopeHierarchy};

fn default_scope() -> String {
    DEFAULT_SCOPE.to_string()
}

/// Parameter bag definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BagDefinition {
    /// Namespace used when a lookup names none
    pub default_namespace: String,

    /// Scope used when a lookup names none
    #[serde(default = "default_scope")]
    pub default_scope: String,

    /// Scope to group membership
    #[serde(default)]
    pub groups: ScopeHierarchy,

    /// Values keyed by `namespace.scope.name`
    #[serde(default)]
    pub parameters: BTreeMap<String, Value>,
}

impl BagDefinition {
    pub fn new(default_namespace: impl Into<String>) -> Self {
        Self {
            default_namespace: default_namespace.into(),
            default_scope: default_scope(),
            groups: ScopeHierarchy::default(),
            parameters: BTreeMap::new(),
        }
    }
}
