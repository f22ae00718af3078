//! Configuration error type.
//!
//! Every variant is fatal to startup: the router never serves traffic with a
//! partially built route table.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::validation::ValidationError;

/// Error raised while loading configuration or assembling the route table.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`RouterConfig`](super::RouterConfig).
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Semantic checks failed. Carries every failure, not just the first.
    #[error("validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),

    /// A policy was declared with an empty virtual-port key.
    #[error("virtual-port key must not be empty")]
    EmptyKey,

    /// Two policies claim the same virtual-port key.
    #[error("virtual-port key {0:?} is configured more than once")]
    DuplicateKey(String),

    /// A policy has no fallback target.
    #[error("virtual-port key {key:?} has no default target")]
    MissingDefault { key: String },

    /// A path rule was declared with an empty prefix.
    #[error("virtual-port key {key:?} has a rule with an empty prefix")]
    EmptyPrefix { key: String },

    /// A target string is not `host:port`.
    #[error("malformed target {target:?}: {reason}")]
    MalformedTarget { target: String, reason: String },
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
