//! Shared test utilities for the confchain workspace.
//!
//! This crate provides scripted resolvers so crate test suites can assert on
//! exactly which resolvers a chain consulted. It is a dev-dependency only,
//! never published.
//!
//! # Modules
//!
//! - [`mock`] — [`MockResolver`] with scripted replies and call recording

pub mod mock;

pub use mock::{Call, MockResolver, Reply, identify};
