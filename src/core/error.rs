//! Error handling for the automcp code generation library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. It uses `thiserror` for easy
//! error handling and implements conversions from common error types.
//!
//! Every variant here is a generation-time failure and aborts the whole run.
//! Runtime failures of the generated handlers (`EndpointError`) live in the
//! generated TypeScript, not here.
//!
//! # Examples
//!
//! ```
//! use automcp::core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     // Operations that might fail...
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Result type for automcp generation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for automcp generation operations
#[derive(Debug, Error)]
pub enum Error {
    /// The skeleton directory does not exist
    #[error("Template directory not found: {}", path.display())]
    TemplateMissing { path: PathBuf },

    /// A file in the target tree could not be copied, read or rewritten
    #[error("Failed to write {} for service '{service}': {source}", path.display())]
    PartialWrite {
        service: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Service name outside `[A-Za-z0-9_-]+`
    #[error(
        "Invalid service name '{0}': only letters, numbers, hyphens, and underscores are allowed"
    )]
    InvalidServiceName(String),

    /// A descriptor failed boundary validation
    #[error("Invalid endpoint descriptor: {0}")]
    Descriptor(String),

    /// Two descriptors share a name and duplicates were not allowed
    #[error("Duplicate endpoint name '{0}'")]
    DuplicateEndpoint(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new descriptor validation error
    pub fn descriptor<S: Into<String>>(msg: S) -> Self {
        Self::Descriptor(msg.into())
    }

    pub(crate) fn partial_write(
        service: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::PartialWrite {
            service: service.into(),
            path: path.into(),
            source,
        }
    }
}
