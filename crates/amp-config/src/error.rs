//! Error types for patch loading and node construction.

use std::path::PathBuf;

use amp_core::ProviderError;
use thiserror::Error;

/// Errors that can occur while loading a patch or building nodes from it.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Failed to parse or serialize JSON
    #[error("invalid JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Invalid parameter
    #[error("invalid parameter '{param}' for {node}: {reason}")]
    InvalidParameter {
        /// Kind of node being built.
        node: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of why the parameter is invalid.
        reason: String,
    },

    /// A field the node cannot be built without was not given.
    #[error("{node} requires '{field}'")]
    MissingField {
        /// Kind of node being built.
        node: String,
        /// Name of the missing field.
        field: String,
    },

    /// A container that must hold at least one child was empty.
    #[error("{0} must not be empty")]
    EmptyContainer(String),

    /// A sample buffer could not be resolved.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a directory creation error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid parameter error.
    pub fn invalid(node: &str, param: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidParameter {
            node: node.to_string(),
            param: param.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a missing field error.
    pub fn missing(node: &str, field: &str) -> Self {
        ConfigError::MissingField {
            node: node.to_string(),
            field: field.to_string(),
        }
    }
}
