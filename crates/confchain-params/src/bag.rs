//! In-memory parameter resolver with scope fallback
//!
//! A `ParameterBag` stores values under `(namespace, scope, name)` and answers
//! lookups by walking the [`ScopeHierarchy`] resolution order for the
//! requested scope.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock};

use confchain_core::{ConfigResolver, Lookup, Value};

use crate::config::BagDefinition;
use crate::scope::{DEFAULT_SCOPE, ScopeHierarchy};
use crate::{Error, Result};

/// Fully qualified parameter key.
///
/// The textual form is `namespace.scope.name`. The name may contain dots;
/// namespace and scope may not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterKey {
    pub namespace: String,
    pub scope: String,
    pub name: String,
}

impl ParameterKey {
    pub fn new(
        namespace: impl Into<String>,
        scope: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            scope: scope.into(),
            name: name.into(),
        }
    }
}

impl FromStr for ParameterKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, '.');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(namespace), Some(scope), Some(name))
                if !namespace.is_empty() && !scope.is_empty() && !name.is_empty() =>
            {
                Ok(Self::new(namespace, scope, name))
            }
            _ => Err(Error::InvalidParameterKey { key: s.to_string() }),
        }
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.namespace, self.scope, self.name)
    }
}

/// Scope-aware parameter store implementing [`ConfigResolver`].
///
/// Calls that pass no namespace use the bag's default namespace; calls that
/// pass no scope use the bag's current scope, initially [`DEFAULT_SCOPE`].
///
/// # Example
///
/// ```
/// use confchain_core::ConfigResolver;
/// use confchain_params::{ParameterBag, ScopeHierarchy};
///
/// let mut bag = ParameterBag::new("app")
///     .with_scope_hierarchy(ScopeHierarchy::new().with_group("site_en", "public"));
/// bag.set("app", "default", "languages", vec!["eng-GB"]);
/// bag.set("app", "public", "languages", vec!["eng-US"]);
///
/// let value = bag.get_parameter("languages", None, Some("site_en")).unwrap();
/// assert_eq!(value.into_option().unwrap()[0], "eng-US");
/// ```
#[derive(Debug)]
pub struct ParameterBag {
    parameters: HashMap<ParameterKey, Value>,
    scopes: ScopeHierarchy,
    default_namespace: RwLock<String>,
    default_scope: RwLock<String>,
}

impl ParameterBag {
    /// Create an empty bag using `default_namespace` for namespace-less lookups.
    pub fn new(default_namespace: impl Into<String>) -> Self {
        Self {
            parameters: HashMap::new(),
            scopes: ScopeHierarchy::new(),
            default_namespace: RwLock::new(default_namespace.into()),
            default_scope: RwLock::new(DEFAULT_SCOPE.to_string()),
        }
    }

    /// Replace the scope hierarchy used for fallback.
    pub fn with_scope_hierarchy(mut self, scopes: ScopeHierarchy) -> Self {
        self.scopes = scopes;
        self
    }

    /// Build a bag from a parsed definition.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameterKey`] if a key is not `namespace.scope.name`.
    pub fn from_definition(definition: BagDefinition) -> Result<Self> {
        let mut bag = Self::new(definition.default_namespace)
            .with_scope_hierarchy(definition.groups);
        bag.set_default_scope(&definition.default_scope);
        for (key, value) in definition.parameters {
            bag.insert_key(&key, value)?;
        }
        Ok(bag)
    }

    /// Parse a TOML bag definition.
    ///
    /// # Example
    ///
    /// ```
    /// use confchain_params::ParameterBag;
    ///
    /// let bag = ParameterBag::from_toml_str(r#"
    /// default_namespace = "app"
    ///
    /// [parameters]
    /// "app.default.title" = "Home"
    /// "#).unwrap();
    ///
    /// assert_eq!(bag.len(), 1);
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let definition: BagDefinition = toml::from_str(content)?;
        Self::from_definition(definition)
    }

    /// Read and parse a TOML bag definition file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(?path, "Loading parameter bag");
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Store a value, replacing any previous value under the same key.
    pub fn set(
        &mut self,
        namespace: impl Into<String>,
        scope: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) {
        self.parameters
            .insert(ParameterKey::new(namespace, scope, name), value.into());
    }

    /// Store a value under a textual `namespace.scope.name` key.
    pub fn insert_key(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let key: ParameterKey = key.parse()?;
        self.parameters.insert(key, value.into());
        Ok(())
    }

    /// Change the scope used when callers pass no scope.
    pub fn set_default_scope(&self, scope: &str) {
        *self
            .default_scope
            .write()
            .unwrap_or_else(PoisonError::into_inner) = scope.to_string();
    }

    pub fn default_scope(&self) -> String {
        self.default_scope
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn default_namespace(&self) -> String {
        self.default_namespace
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn scopes(&self) -> &ScopeHierarchy {
        &self.scopes
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// First value along the scope resolution order, with the key it was found under.
    fn find(
        &self,
        name: &str,
        namespace: Option<&str>,
        scope: Option<&str>,
    ) -> Option<(ParameterKey, &Value)> {
        let namespace = namespace.map_or_else(|| self.default_namespace(), str::to_string);
        let scope = scope.map_or_else(|| self.default_scope(), str::to_string);

        self.scopes
            .resolution_order(&scope)
            .into_iter()
            .find_map(|candidate| {
                let key = ParameterKey::new(namespace.as_str(), candidate, name);
                let value = self.parameters.get(&key)?;
                Some((key, value))
            })
    }
}

impl ConfigResolver for ParameterBag {
    fn get_parameter(
        &self,
        name: &str,
        namespace: Option<&str>,
        scope: Option<&str>,
    ) -> confchain_core::Result<Lookup> {
        match self.find(name, namespace, scope) {
            Some((key, value)) => {
                tracing::trace!(%key, "Parameter resolved");
                Ok(Lookup::Found(value.clone()))
            }
            None => Ok(Lookup::NotFound),
        }
    }

    fn has_parameter(&self, name: &str, namespace: Option<&str>, scope: Option<&str>) -> bool {
        self.find(name, namespace, scope).is_some()
    }

    fn set_default_namespace(&self, namespace: &str) {
        *self
            .default_namespace
            .write()
            .unwrap_or_else(PoisonError::into_inner) = namespace.to_string();
    }
}
