//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use crate::config::error::ConfigError;
use crate::config::schema::RouterConfig;
use crate::config::services::ServiceRole;
use crate::config::validation::validate_config;

/// A service port taken from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvOverride {
    pub var: &'static str,
    pub value: String,
}

/// Validated configuration plus the environment overrides that shaped it.
///
/// Loading happens before logging is set up, so the overrides are handed
/// back for the caller to log once it is.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: RouterConfig,
    pub overrides: Vec<EnvOverride>,
}

/// Load and validate configuration.
///
/// Starts from defaults, layers the TOML file on top when one is given, then
/// applies the service port environment variables.
pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str(&content)?
        }
        None => RouterConfig::default(),
    };

    let overrides = apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(LoadedConfig { config, overrides })
}

/// Override service ports from environment-style lookups.
///
/// Empty values are ignored. Values are kept verbatim; they become
/// virtual-port keys and are never normalized. Returns the overrides applied,
/// in role order.
pub fn apply_env_overrides<F>(config: &mut RouterConfig, lookup: F) -> Vec<EnvOverride>
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = Vec::new();
    for role in ServiceRole::ALL {
        if let Some(value) = lookup(role.env_var()).filter(|v| !v.is_empty()) {
            config.routing.ports.set(role, value.clone());
            applied.push(EnvOverride {
                var: role.env_var(),
                value,
            });
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_env_overrides_ports() {
        let mut config = RouterConfig::default();
        let applied = apply_env_overrides(
            &mut config,
            lookup_from(&[("WALLET_BACKEND_PORT", "9001"), ("PG_ADMIN_PORT", "5050")]),
        );

        assert_eq!(config.routing.ports.get(ServiceRole::WalletBackend), "9001");
        assert_eq!(config.routing.ports.get(ServiceRole::AdminUi), "5050");
        assert_eq!(config.routing.ports.get(ServiceRole::IssuerApi), "7002");
        assert_eq!(
            applied,
            vec![
                EnvOverride {
                    var: "WALLET_BACKEND_PORT",
                    value: "9001".into()
                },
                EnvOverride {
                    var: "PG_ADMIN_PORT",
                    value: "5050".into()
                },
            ]
        );
    }

    #[test]
    fn test_empty_env_value_is_ignored() {
        let mut config = RouterConfig::default();
        let applied = apply_env_overrides(&mut config, lookup_from(&[("ISSUER_API_PORT", "")]));
        assert_eq!(config.routing.ports.get(ServiceRole::IssuerApi), "7002");
        assert!(applied.is_empty());
    }

    #[test]
    fn test_env_value_kept_verbatim() {
        let mut config = RouterConfig::default();
        apply_env_overrides(&mut config, lookup_from(&[("VC_REPO_PORT", "07103")]));
        assert_eq!(config.routing.ports.get(ServiceRole::VcRepository), "07103");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Some(Path::new("/nonexistent/router.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir()
            .join(format!("waltid-router-{}.toml", std::process::id()));
        fs::write(
            &path,
            r#"
            [listener]
            bind_address = "127.0.0.1:9999"

            [routing.hosts]
            issuer_api = "issuer.internal"
            "#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap().config;
        fs::remove_file(&path).unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9999");
        assert_eq!(config.routing.hosts.get(ServiceRole::IssuerApi), "issuer.internal");
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let path = std::env::temp_dir()
            .join(format!("waltid-router-bad-{}.toml", std::process::id()));
        fs::write(&path, "[listener\nbind_address = ").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        fs::remove_file(&path).unwrap();

        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
