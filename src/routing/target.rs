//! Forwarding destinations.

use std::fmt;
use std::str::FromStr;

use axum::http::uri::Authority;
use serde::{Serialize, Serializer};

use crate::config::ConfigError;

/// A concrete `host:port` forwarding destination.
///
/// Only constructible through validation, so a `Target` always converts to a
/// URI authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    host: String,
    port: u16,
    authority: Authority,
}

impl Target {
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, ConfigError> {
        let host = host.into();
        let malformed = |reason: &str| ConfigError::MalformedTarget {
            target: format!("{}:{}", host, port),
            reason: reason.to_string(),
        };

        if host.is_empty() {
            return Err(malformed("empty host"));
        }
        if port == 0 {
            return Err(malformed("port must be between 1 and 65535"));
        }
        if host.contains(':') || host.contains('@') {
            return Err(malformed("host must not contain ':' or '@'"));
        }
        let authority = Authority::from_str(&format!("{}:{}", host, port))
            .map_err(|_| malformed("not a valid URI authority"))?;

        Ok(Self {
            host,
            port,
            authority,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The `host:port` authority used to rewrite outbound request URIs.
    pub fn authority(&self) -> &Authority {
        &self.authority
    }
}

impl FromStr for Target {
    type Err = ConfigError;

    /// Parse `host:port`. Exactly one `:` is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: &str| ConfigError::MalformedTarget {
            target: s.to_string(),
            reason: reason.to_string(),
        };

        let (host, port) = s
            .split_once(':')
            .ok_or_else(|| malformed("missing ':' port separator"))?;
        if port.contains(':') {
            return Err(malformed("more than one ':' separator"));
        }
        let port: u16 = port
            .parse()
            .map_err(|_| malformed("port must be between 1 and 65535"))?;

        // Report the input as written, keeping the specific reason.
        Target::new(host, port).map_err(|err| match err {
            ConfigError::MalformedTarget { reason, .. } => malformed(&reason),
            other => other,
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl Serialize for Target {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
