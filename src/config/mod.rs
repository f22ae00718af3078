//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment port overrides (WALLET_BACKEND_PORT, ...)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → RouteTable::build (policies), HttpServer (listener, timeouts)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - The environment is read once, in the loader, and nowhere else

pub mod error;
pub mod loader;
pub mod schema;
pub mod services;
pub mod validation;

pub use error::ConfigError;
pub use loader::{load_config, EnvOverride, LoadedConfig};
pub use schema::{
    ListenerConfig, LogFormat, ObservabilityConfig, PolicyConfig, RouterConfig, RoutingConfig,
    RuleConfig, TimeoutConfig,
};
pub use services::ServiceRole;
