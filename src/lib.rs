//! Virtual-port request router.
//!
//! Rewrites each request's destination from a virtual-port key header and the
//! request path, using an immutable route table built at startup.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{resolve, Resolution, RouteTable, Target};
