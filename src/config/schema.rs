//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::config::services::{HostsConfig, PortsConfig, ServiceRole, WALLET_API_PREFIX};

/// Root configuration for the router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address, in-flight limit).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Virtual-port routing policies.
    pub routing: RoutingConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum requests handled concurrently (backpressure).
    pub max_in_flight: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_in_flight: 10_000,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Routing configuration: where the virtual-port key comes from and which
/// policy each key maps to.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Request header carrying the virtual-port key.
    pub target_port_header: String,

    /// Destination for requests no policy claims. `None` leaves the
    /// request's own destination in place.
    pub passthrough_upstream: Option<String>,

    /// Virtual-port key per service role.
    pub ports: PortsConfig,

    /// Backend host per service role.
    pub hosts: HostsConfig,

    /// Additional policies, appended after the service roles.
    pub policies: Vec<PolicyConfig>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            target_port_header: "x-target-port".to_string(),
            passthrough_upstream: None,
            ports: PortsConfig::default(),
            hosts: HostsConfig::default(),
            policies: Vec::new(),
        }
    }
}

impl RoutingConfig {
    /// `host:port` string a role's traffic is forwarded to.
    pub fn backend_for(&self, role: ServiceRole) -> String {
        format!("{}:{}", self.hosts.get(role), self.ports.get(role))
    }

    /// Every policy this configuration declares, in table order: the service
    /// roles first, then the explicitly listed policies.
    pub fn policy_specs(&self) -> Vec<PolicyConfig> {
        let wallet_backend = self.backend_for(ServiceRole::WalletBackend);

        let mut specs: Vec<PolicyConfig> = ServiceRole::ALL
            .iter()
            .map(|&role| {
                let rules = if role.is_wallet_frontend() {
                    vec![RuleConfig {
                        prefix: WALLET_API_PREFIX.to_string(),
                        target: wallet_backend.clone(),
                    }]
                } else {
                    Vec::new()
                };
                PolicyConfig {
                    key: self.ports.get(role).to_string(),
                    rules,
                    default: Some(self.backend_for(role)),
                }
            })
            .collect();

        specs.extend(self.policies.iter().cloned());
        specs
    }
}

/// Unvalidated policy for one virtual-port key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PolicyConfig {
    /// Virtual-port key, compared as an opaque string.
    pub key: String,

    /// Path-prefix rules, checked in the order given.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,

    /// Fallback `host:port`. Required; absence is rejected when the table is built.
    pub default: Option<String>,
}

/// Unvalidated path-prefix rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleConfig {
    pub prefix: String,
    /// Target `host:port`.
    pub target: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_specs() {
        let specs = RoutingConfig::default().policy_specs();
        assert_eq!(specs.len(), 8);

        let demo = &specs[0];
        assert_eq!(demo.key, "7101");
        assert_eq!(demo.default.as_deref(), Some("waltid-demo-wallet:7101"));
        assert_eq!(
            demo.rules,
            vec![RuleConfig {
                prefix: "/wallet-api".into(),
                target: "wallet-api:7001".into(),
            }]
        );

        let admin = &specs[7];
        assert_eq!(admin.key, "8080");
        assert_eq!(admin.default.as_deref(), Some("phpmyadmin:8080"));
        assert!(admin.rules.is_empty());
    }

    #[test]
    fn test_wallet_rule_follows_wallet_backend_port() {
        let mut routing = RoutingConfig::default();
        routing.ports.set(ServiceRole::WalletBackend, "9001".into());

        let specs = routing.policy_specs();
        assert_eq!(specs[1].rules[0].target, "wallet-api:9001");
        assert_eq!(specs[2].key, "9001");
    }

    #[test]
    fn test_extra_policies_are_appended() {
        let config: RouterConfig = toml::from_str(
            r#"
            [routing]
            target_port_header = "x-virtual-port"

            [[routing.policies]]
            key = "9000"
            default = "extra:9000"
            rules = [{ prefix = "/api", target = "extra-api:9001" }]
            "#,
        )
        .unwrap();

        assert_eq!(config.routing.target_port_header, "x-virtual-port");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");

        let specs = config.routing.policy_specs();
        assert_eq!(specs.len(), 9);
        assert_eq!(specs[8].key, "9000");
        assert_eq!(specs[8].rules[0].prefix, "/api");
    }
}
