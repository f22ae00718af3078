//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP layer produces, around each routing decision:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through every log line of a request
//! - The routing engine itself emits nothing

pub mod logging;
pub mod metrics;
