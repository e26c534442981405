//! DevOps info service.
//!
//! A small, stateless HTTP service that reports host and process diagnostics:
//!
//! ```text
//! GET /        service, system, runtime, request and endpoint information
//! GET /health  {"status": "healthy", "timestamp": ..., "uptime_seconds": ...}
//! *            404 {"error": "Not Found", "available_endpoints": [...]}
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`system`]: Host facts with placeholder fallback
//! - [`runtime`]: Process clock and uptime
//! - [`api`]: HTTP router, handlers and response types
//! - [`metrics`]: Prometheus request metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod runtime;
pub mod system;
pub mod utils;

pub use config::Config;
pub use error::{Result, ServiceError};
