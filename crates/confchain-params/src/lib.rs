//! Scope-aware parameter resolver for confchain
//!
//! Provides [`ParameterBag`], an in-memory [`ConfigResolver`] that stores
//! values per namespace and scope and falls back through a
//! [`ScopeHierarchy`]:
//!
//! ```text
//! global -> <scope> -> <groups of scope> -> default
//! ```
//!
//! Bags can be built in code or parsed from a TOML [`BagDefinition`], then
//! registered in a [`ChainConfigResolver`] like any other resolver.
//!
//! [`ConfigResolver`]: confchain_core::ConfigResolver
//! [`ChainConfigResolver`]: confchain_core::ChainConfigResolver

pub mod bag;
pub mod config;
pub mod error;
pub mod scope;

pub use bag::{ParameterBag, ParameterKey};
pub use config::BagDefinition;
pub use error::{Error, Result};
pub use scope::{DEFAULT_SCOPE, GLOBAL_SCOPE, ScopeHierarchy};
