//! Error types for confchain-core

/// Result type for confchain-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving configuration parameters
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No resolver in the chain had a value for the parameter
    #[error(
        "Parameter '{name}' with namespace '{}' could not be found.",
        .namespace.as_deref().unwrap_or_default()
    )]
    ParameterNotFound {
        name: String,
        namespace: Option<String>,
    },

    /// A programming contract was broken by the caller
    #[error("Logic violation: {message}")]
    LogicViolation { message: String },

    /// A resolver failed for a reason other than a missing parameter
    #[error("Resolver {resolver} failed: {message}")]
    Resolver { resolver: String, message: String },
}

impl Error {
    pub fn parameter_not_found(name: impl Into<String>, namespace: Option<&str>) -> Self {
        Self::ParameterNotFound {
            name: name.into(),
            namespace: namespace.map(str::to_owned),
        }
    }

    pub fn logic_violation(message: impl Into<String>) -> Self {
        Self::LogicViolation {
            message: message.into(),
        }
    }

    pub fn resolver(resolver: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolver {
            resolver: resolver.into(),
            message: message.into(),
        }
    }

    /// Whether this is the ordinary "no value" outcome rather than a failure.
    pub fn is_parameter_not_found(&self) -> bool {
        matches!(self, Self::ParameterNotFound { .. })
    }
}
