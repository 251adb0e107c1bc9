//! Error types for the projector.
//!
//! Only resource and configuration problems are errors here. A record that is
//! short, malformed or missing fields is never reported: it projects zero-values.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a projection run.
#[derive(Debug, Error)]
pub enum ProjectorError {
    #[error("failed to open input `{}`: {source}", path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create output `{}`: {source}", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error while projecting: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid field schema: {0}")]
    Schema(#[from] SchemaError),
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Errors raised while building or loading a field schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read schema file `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse schema YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("schema must declare at least one field")]
    Empty,
    #[error("field '{0}' is declared more than once")]
    DuplicateKey(String),
    #[error("field key '{0}' must be non-empty and must not contain a double quote")]
    InvalidKey(String),
    #[error("field '{0}' must have a max_len of at least 1")]
    ZeroCapacity(String),
}

/// Errors raised at the scoring boundary. Each one fails a single call only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("no scoring model registered under '{0}'")]
    UnknownModel(String),
}
