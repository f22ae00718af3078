//! The fixed set of named service roles fronted by the router.
//!
//! Each role owns one virtual-port key and one backend host. The wallet
//! frontends additionally send `/wallet-api` traffic to the wallet backend.

use serde::{Deserialize, Serialize};

/// Path prefix that the wallet frontends hand over to the wallet backend.
pub const WALLET_API_PREFIX: &str = "/wallet-api";

/// A named frontend or backend role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceRole {
    DemoWalletFrontend,
    DevWalletFrontend,
    WalletBackend,
    IssuerApi,
    VerifierApi,
    WebPortal,
    VcRepository,
    AdminUi,
}

impl ServiceRole {
    /// All roles, in route table order.
    pub const ALL: [ServiceRole; 8] = [
        ServiceRole::DemoWalletFrontend,
        ServiceRole::DevWalletFrontend,
        ServiceRole::WalletBackend,
        ServiceRole::IssuerApi,
        ServiceRole::VerifierApi,
        ServiceRole::WebPortal,
        ServiceRole::VcRepository,
        ServiceRole::AdminUi,
    ];

    /// Environment variable overriding this role's port.
    pub fn env_var(self) -> &'static str {
        match self {
            ServiceRole::DemoWalletFrontend => "DEMO_WALLET_FRONTEND_PORT",
            ServiceRole::DevWalletFrontend => "DEV_WALLET_FRONTEND_PORT",
            ServiceRole::WalletBackend => "WALLET_BACKEND_PORT",
            ServiceRole::IssuerApi => "ISSUER_API_PORT",
            ServiceRole::VerifierApi => "VERIFIER_API_PORT",
            ServiceRole::WebPortal => "WEB_PORTAL_PORT",
            ServiceRole::VcRepository => "VC_REPO_PORT",
            ServiceRole::AdminUi => "PG_ADMIN_PORT",
        }
    }

    pub fn default_port(self) -> &'static str {
        match self {
            ServiceRole::DemoWalletFrontend => "7101",
            ServiceRole::DevWalletFrontend => "7104",
            ServiceRole::WalletBackend => "7001",
            ServiceRole::IssuerApi => "7002",
            ServiceRole::VerifierApi => "7003",
            ServiceRole::WebPortal => "7102",
            ServiceRole::VcRepository => "7103",
            ServiceRole::AdminUi => "8080",
        }
    }

    pub fn default_host(self) -> &'static str {
        match self {
            ServiceRole::DemoWalletFrontend => "waltid-demo-wallet",
            ServiceRole::DevWalletFrontend => "waltid-dev-wallet",
            ServiceRole::WalletBackend => "wallet-api",
            ServiceRole::IssuerApi => "issuer-api",
            ServiceRole::VerifierApi => "verifier-api",
            ServiceRole::WebPortal => "web-portal",
            ServiceRole::VcRepository => "vc-repo",
            ServiceRole::AdminUi => "phpmyadmin",
        }
    }

    /// Whether this role forwards `/wallet-api` to the wallet backend.
    pub fn is_wallet_frontend(self) -> bool {
        matches!(
            self,
            ServiceRole::DemoWalletFrontend | ServiceRole::DevWalletFrontend
        )
    }
}

macro_rules! role_values {
    ($(#[$meta:meta])* $name:ident, $default:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
        #[serde(default)]
        pub struct $name {
            pub demo_wallet_frontend: String,
            pub dev_wallet_frontend: String,
            pub wallet_backend: String,
            pub issuer_api: String,
            pub verifier_api: String,
            pub web_portal: String,
            pub vc_repository: String,
            pub admin_ui: String,
        }

        impl $name {
            pub fn get(&self, role: ServiceRole) -> &str {
                match role {
                    ServiceRole::DemoWalletFrontend => &self.demo_wallet_frontend,
                    ServiceRole::DevWalletFrontend => &self.dev_wallet_frontend,
                    ServiceRole::WalletBackend => &self.wallet_backend,
                    ServiceRole::IssuerApi => &self.issuer_api,
                    ServiceRole::VerifierApi => &self.verifier_api,
                    ServiceRole::WebPortal => &self.web_portal,
                    ServiceRole::VcRepository => &self.vc_repository,
                    ServiceRole::AdminUi => &self.admin_ui,
                }
            }

            pub fn set(&mut self, role: ServiceRole, value: String) {
                let slot = match role {
                    ServiceRole::DemoWalletFrontend => &mut self.demo_wallet_frontend,
                    ServiceRole::DevWalletFrontend => &mut self.dev_wallet_frontend,
                    ServiceRole::WalletBackend => &mut self.wallet_backend,
                    ServiceRole::IssuerApi => &mut self.issuer_api,
                    ServiceRole::VerifierApi => &mut self.verifier_api,
                    ServiceRole::WebPortal => &mut self.web_portal,
                    ServiceRole::VcRepository => &mut self.vc_repository,
                    ServiceRole::AdminUi => &mut self.admin_ui,
                };
                *slot = value;
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    demo_wallet_frontend: $default(ServiceRole::DemoWalletFrontend).to_string(),
                    dev_wallet_frontend: $default(ServiceRole::DevWalletFrontend).to_string(),
                    wallet_backend: $default(ServiceRole::WalletBackend).to_string(),
                    issuer_api: $default(ServiceRole::IssuerApi).to_string(),
                    verifier_api: $default(ServiceRole::VerifierApi).to_string(),
                    web_portal: $default(ServiceRole::WebPortal).to_string(),
                    vc_repository: $default(ServiceRole::VcRepository).to_string(),
                    admin_ui: $default(ServiceRole::AdminUi).to_string(),
                }
            }
        }
    };
}

role_values!(
    /// Virtual-port key per role.
    PortsConfig,
    ServiceRole::default_port
);

role_values!(
    /// Backend host name per role.
    HostsConfig,
    ServiceRole::default_host
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_wallet_frontends_carry_wallet_api_rule() {
        let frontends: Vec<_> = ServiceRole::ALL
            .iter()
            .copied()
            .filter(|r| r.is_wallet_frontend())
            .collect();
        assert_eq!(
            frontends,
            vec![ServiceRole::DemoWalletFrontend, ServiceRole::DevWalletFrontend]
        );
    }

    #[test]
    fn test_partial_table_keeps_other_defaults() {
        let hosts: HostsConfig = toml::from_str(r#"issuer_api = "issuer.internal""#).unwrap();
        assert_eq!(hosts.get(ServiceRole::IssuerApi), "issuer.internal");
        assert_eq!(hosts.get(ServiceRole::WalletBackend), "wallet-api");
    }

    #[test]
    fn test_role_values_get_set() {
        let mut ports = PortsConfig::default();
        assert_eq!(ports.get(ServiceRole::AdminUi), "8080");

        ports.set(ServiceRole::AdminUi, "9999".into());
        assert_eq!(ports.get(ServiceRole::AdminUi), "9999");
        assert_eq!(ports.get(ServiceRole::WalletBackend), "7001");
    }
}
