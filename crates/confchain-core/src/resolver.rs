//! The configuration resolver capability
//!
//! Anything that can answer "what is parameter `name` in `namespace` for
//! `scope`" implements [`ConfigResolver`]. Where the value comes from (files,
//! database rows, environment) is the implementor's business.

use std::sync::Arc;

use crate::{Error, Result};

/// Parameter values are arbitrary structured data.
pub use serde_json::Value;

/// Shared handle to a resolver, as stored by a chain.
pub type ResolverHandle = Arc<dyn ConfigResolver>;

/// Outcome of asking a single resolver for a parameter.
///
/// `NotFound` is an answer, not a failure: a chain moves on to the next
/// resolver. Real failures travel in the `Err` side of [`Result`] and stop
/// the chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(Value),
    NotFound,
}

impl Lookup {
    pub fn found(value: impl Into<Value>) -> Self {
        Self::Found(value.into())
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn into_option(self) -> Option<Value> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }

    /// Turn a miss into [`Error::ParameterNotFound`] for `(name, namespace)`.
    pub fn into_result(self, name: &str, namespace: Option<&str>) -> Result<Value> {
        match self {
            Self::Found(value) => Ok(value),
            Self::NotFound => Err(Error::parameter_not_found(name, namespace)),
        }
    }
}

impl From<Option<Value>> for Lookup {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Self::NotFound, Self::Found)
    }
}

/// Capability consumed by [`ChainConfigResolver`](crate::ChainConfigResolver).
///
/// Resolvers are shared behind [`ResolverHandle`]s, so every method takes
/// `&self`; implementors that remember a default namespace need interior
/// mutability.
pub trait ConfigResolver: Send + Sync {
    /// Look up a parameter.
    ///
    /// `namespace` and `scope` of `None` mean "use the resolver's defaults".
    fn get_parameter(
        &self,
        name: &str,
        namespace: Option<&str>,
        scope: Option<&str>,
    ) -> Result<Lookup>;

    /// Check whether a parameter exists. Must not fail for a missing parameter.
    fn has_parameter(&self, name: &str, namespace: Option<&str>, scope: Option<&str>) -> bool;

    /// Change the namespace used when callers pass no namespace.
    fn set_default_namespace(&self, namespace: &str);
}
