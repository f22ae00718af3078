//! Route lookup.
//!
//! # Responsibilities
//! - Look up the policy for a virtual-port key
//! - Scan its rules in stored order, first match wins
//! - Return the matched target, the policy default, or explicit no-route
//!
//! # Design Decisions
//! - Pure and total: no I/O, no logging, no state between calls
//! - O(1) key lookup via HashMap, O(n) prefix scan over a policy's rules
//! - First match in declaration order, never longest match
//! - Explicit NoRoute rather than silent default

use crate::routing::{RouteTable, Target};

/// Outcome of a routing decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Rewrite the request's destination to this target.
    Forward(&'a Target),
    /// No policy applies. Leave the request's destination untouched.
    NoRoute,
}

impl<'a> Resolution<'a> {
    pub fn target(&self) -> Option<&'a Target> {
        match *self {
            Resolution::Forward(target) => Some(target),
            Resolution::NoRoute => None,
        }
    }

    /// Short label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Forward(_) => "forward",
            Resolution::NoRoute => "passthrough",
        }
    }
}

/// Decide where a request for virtual port `key` and `path` goes.
///
/// An absent or empty key, or one with no policy, yields [`Resolution::NoRoute`].
pub fn resolve<'a>(table: &'a RouteTable, key: Option<&str>, path: &str) -> Resolution<'a> {
    let Some(policy) = key.filter(|k| !k.is_empty()).and_then(|k| table.policy(k)) else {
        return Resolution::NoRoute;
    };

    let target = policy
        .rules()
        .iter()
        .find(|rule| rule.matches(path))
        .map(|rule| rule.target())
        .unwrap_or_else(|| policy.default_target());

    Resolution::Forward(target)
}

impl RouteTable {
    /// See [`resolve`].
    pub fn resolve(&self, key: Option<&str>, path: &str) -> Resolution<'_> {
        resolve(self, key, path)
    }
}
