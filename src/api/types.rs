//! Response bodies for the diagnostic API.

use std::net::SocketAddr;

use axum::http::{header::USER_AGENT, HeaderMap, Method, Uri};
use serde::Serialize;

use crate::runtime::RuntimeSnapshot;
use crate::system::{SystemSnapshot, UNKNOWN};

/// Service name reported by every info response.
pub const SERVICE_NAME: &str = "devops-info-service";
/// Framework label reported by every info response.
pub const FRAMEWORK: &str = "Axum";
/// Health status literal.
pub const HEALTHY: &str = "healthy";

/// One route the service answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EndpointDescriptor {
    /// Route path.
    pub path: &'static str,
    /// HTTP method.
    pub method: &'static str,
    /// What the route returns.
    pub description: &'static str,
}

/// All routes, in the order they are advertised.
pub const ENDPOINTS: &[EndpointDescriptor] = &[
    EndpointDescriptor {
        path: "/",
        method: "GET",
        description: "Service information",
    },
    EndpointDescriptor {
        path: "/health",
        method: "GET",
        description: "Health check",
    },
];

/// Paths of [`ENDPOINTS`], in order.
pub fn endpoint_paths() -> Vec<&'static str> {
    ENDPOINTS.iter().map(|e| e.path).collect()
}

/// Static service metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceInfo {
    /// Service name.
    pub name: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Short description.
    pub description: &'static str,
    /// Web framework label.
    pub framework: &'static str,
}

impl ServiceInfo {
    /// Metadata for this build.
    pub const fn current() -> Self {
        Self {
            name: SERVICE_NAME,
            version: env!("CARGO_PKG_VERSION"),
            description: "DevOps course info service",
            framework: FRAMEWORK,
        }
    }
}

/// Metadata about the request being answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestInfo {
    /// HTTP method.
    pub method: String,
    /// Request path, without query.
    pub path: String,
    /// Caller address, or "unknown".
    pub client_ip: String,
    /// User-Agent header, or "unknown".
    pub user_agent: String,
}

impl RequestInfo {
    /// Build from request parts. The first `X-Forwarded-For` hop wins over
    /// the peer address.
    pub fn from_parts(
        method: &Method,
        uri: &Uri,
        headers: &HeaderMap,
        peer: Option<SocketAddr>,
    ) -> Self {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let client_ip = forwarded
            .or_else(|| peer.map(|addr| addr.ip().to_string()))
            .unwrap_or_else(|| UNKNOWN.to_string());

        let user_agent = headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(UNKNOWN)
            .to_string();

        Self {
            method: method.to_string(),
            path: uri.path().to_string(),
            client_ip,
            user_agent,
        }
    }
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize)]
pub struct InfoResponse {
    /// Static service metadata.
    pub service: ServiceInfo,
    /// Host facts.
    pub system: SystemSnapshot,
    /// Uptime and current time.
    pub runtime: RuntimeSnapshot,
    /// The request being answered.
    pub request: RequestInfo,
    /// Routes the service answers.
    pub endpoints: &'static [EndpointDescriptor],
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always "healthy".
    pub status: &'static str,
    /// RFC 3339 UTC.
    pub timestamp: String,
    /// Seconds since process start.
    pub uptime_seconds: u64,
}

/// Body of error responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error label, e.g. "Not Found".
    pub error: &'static str,
    /// Human readable explanation.
    pub message: String,
    /// Known route paths, on 404 only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_endpoints: Option<Vec<&'static str>>,
}
