//! Priority-ordered chain of configuration resolvers
//!
//! This crate answers "what is the value of parameter P in scope S" by asking
//! a set of registered resolvers in priority order:
//!
//! - **Capability**: [`ConfigResolver`] is implemented by anything that can
//!   look parameters up (files, database rows, environment, other chains)
//! - **Outcome**: [`Lookup`] separates "no value here, try the next one" from
//!   real failures, which stop the chain
//! - **Chain**: [`ChainConfigResolver`] keeps registrations, sorts them lazily
//!   by descending priority and reuses that order until the next registration
//!
//! # Example
//!
//! ```ignore
//! use confchain_core::{ChainConfigResolver, Result};
//!
//! fn languages(chain: &ChainConfigResolver) -> Result<()> {
//!     let value = chain.get_parameter("languages", Some("app"), Some("site_en"))?;
//!     println!("{value}");
//!     Ok(())
//! }
//! ```

pub mod chain;
pub mod error;
pub mod resolver;

pub use chain::ChainConfigResolver;
pub use error::{Error, Result};
pub use resolver::{ConfigResolver, Lookup, ResolverHandle, Value};
