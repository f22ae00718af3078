//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, virtual-port key, path)
//!     → routing::resolve (Forward(target) or NoRoute)
//!     → request.rs (rewrite destination only on Forward)
//!     → hyper-util client → backend
//! ```

pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
