//! service-core: Shared infrastructure for payout services.
pub mod config;
pub mod error;
pub mod observability;

pub use tracing;
