//! Scope hierarchy and fallback order
//!
//! A scope (for example a site) may belong to any number of groups. When a
//! parameter is looked up for a scope, candidates are tried in this order:
//!
//! 1. [`GLOBAL_SCOPE`] - overrides everything
//! 2. the scope itself
//! 3. each group of the scope, in declared order
//! 4. [`DEFAULT_SCOPE`] - fallback

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Scope whose values win over every other scope
pub const GLOBAL_SCOPE: &str = "global";

/// Scope consulted last
pub const DEFAULT_SCOPE: &str = "default";

/// Maps scopes to the groups they belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeHierarchy {
    groups: HashMap<String, Vec<String>>,
}

impl ScopeHierarchy {
    /// Create a hierarchy where no scope has groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`add_group`](Self::add_group).
    pub fn with_group(mut self, scope: impl Into<String>, group: impl Into<String>) -> Self {
        self.add_group(scope, group);
        self
    }

    /// Append `group` to the groups of `scope`.
    ///
    /// Adding a group twice has no effect.
    pub fn add_group(&mut self, scope: impl Into<String>, group: impl Into<String>) {
        let group = group.into();
        let groups = self.groups.entry(scope.into()).or_default();
        if !groups.contains(&group) {
            groups.push(group);
        }
    }

    /// Groups of `scope` in declared order.
    pub fn groups_of(&self, scope: &str) -> &[String] {
        self.groups.get(scope).map(Vec::as_slice).unwrap_or_default()
    }

    /// Scopes to consult for `scope`, first match wins.
    ///
    /// Each scope appears once, at its earliest position.
    pub fn resolution_order<'a>(&'a self, scope: &'a str) -> Vec<&'a str> {
        let mut order: Vec<&str> = Vec::with_capacity(self.groups_of(scope).len() + 3);
        let candidates = std::iter::once(GLOBAL_SCOPE)
            .chain(std::iter::once(scope))
            .chain(self.groups_of(scope).iter().map(String::as_str))
            .chain(std::iter::once(DEFAULT_SCOPE));
        for candidate in candidates {
            if !order.contains(&candidate) {
                order.push(candidate);
            }
        }
        order
    }
}
