//! Error types for confchain-params

use std::path::PathBuf;

/// Result type for confchain-params operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a parameter bag
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A parameter key is not of the form `namespace.scope.name`
    #[error("Invalid parameter key '{key}': expected 'namespace.scope.name'")]
    InvalidParameterKey { key: String },

    /// A bag definition file could not be read
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A bag definition is not valid TOML or does not match the schema
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
