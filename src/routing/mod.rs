//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     PolicyConfig[]
//!     → target.rs (parse host:port)
//!     → table.rs (validate, freeze as immutable RouteTable)
//!
//! Incoming Request (virtual-port key, path)
//!     → router.rs (policy lookup, ordered prefix scan)
//!     → Return: Forward(Target) or NoRoute
//! ```
//!
//! # Design Decisions
//! - Table compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always yields the same decision
//! - First match wins (declaration order)

pub mod router;
pub mod table;
pub mod target;

pub use router::{resolve, Resolution};
pub use table::{PathRule, PortPolicy, RouteTable};
pub use target::Target;
