//! HTTP API module for service info and health endpoints.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod types;

pub use error::ApiError;
pub use handlers::AppState;
pub use routes::create_router;
