//! Compiled, immutable route table.
//!
//! # Design Decisions
//! - Built once at startup from `PolicyConfig`s, never mutated afterwards
//! - Every target is parsed at build time; a table never holds raw strings
//! - Rules keep configuration order, which is their precedence order
//! - The fallback target is a required field, not a magic rule

use std::collections::HashMap;

use serde::{Serialize, Serializer};

use crate::config::{ConfigError, PolicyConfig};
use crate::routing::Target;

/// "Forward to `target` when the path starts with `prefix`."
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathRule {
    prefix: String,
    target: Target,
}

impl PathRule {
    pub fn new(prefix: impl Into<String>, target: Target) -> Self {
        Self {
            prefix: prefix.into(),
            target,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Literal, case-sensitive prefix test. No segment boundary is required.
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// Routing policy of one virtual port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortPolicy {
    rules: Vec<PathRule>,
    default: Target,
}

impl PortPolicy {
    pub fn new(rules: Vec<PathRule>, default: Target) -> Self {
        Self { rules, default }
    }

    pub fn rules(&self) -> &[PathRule] {
        &self.rules
    }

    pub fn default_target(&self) -> &Target {
        &self.default
    }
}

/// Virtual-port key → policy.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    policies: HashMap<String, PortPolicy>,
    order: Vec<String>,
}

impl RouteTable {
    /// Assemble the table from policy declarations.
    ///
    /// Fails on the first bad declaration; no partial table is returned.
    pub fn build(specs: &[PolicyConfig]) -> Result<Self, ConfigError> {
        let mut policies = HashMap::with_capacity(specs.len());
        let mut order = Vec::with_capacity(specs.len());

        for spec in specs {
            if spec.key.is_empty() {
                return Err(ConfigError::EmptyKey);
            }
            if policies.contains_key(&spec.key) {
                return Err(ConfigError::DuplicateKey(spec.key.clone()));
            }

            let default = spec
                .default
                .as_deref()
                .ok_or_else(|| ConfigError::MissingDefault {
                    key: spec.key.clone(),
                })?
                .parse::<Target>()?;

            let rules = spec
                .rules
                .iter()
                .map(|rule| {
                    if rule.prefix.is_empty() {
                        return Err(ConfigError::EmptyPrefix {
                            key: spec.key.clone(),
                        });
                    }
                    Ok(PathRule::new(rule.prefix.clone(), rule.target.parse()?))
                })
                .collect::<Result<Vec<_>, _>>()?;

            order.push(spec.key.clone());
            policies.insert(spec.key.clone(), PortPolicy::new(rules, default));
        }

        Ok(Self { policies, order })
    }

    /// Policy for `key`, if any.
    pub fn policy(&self, key: &str) -> Option<&PortPolicy> {
        self.policies.get(key)
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl Serialize for RouteTable {
    /// Serializes as a map in declaration order.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.order.iter().map(|k| (k, &self.policies[k])))
    }
}
