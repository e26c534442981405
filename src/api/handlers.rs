//! HTTP API handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, State},
    http::{HeaderMap, Method, Uri},
    response::IntoResponse,
    Json,
};
use tracing::debug;

use super::error::ApiError;
use super::types::{HealthResponse, InfoResponse, RequestInfo, ServiceInfo, ENDPOINTS, HEALTHY};
use crate::runtime::{now_rfc3339, ProcessClock, RuntimeSnapshot};
use crate::system::{HostFacts, SystemFacts, SystemSnapshot};

/// Application state shared with handlers.
///
/// Holds only immutable data, so clones handed to concurrent requests never
/// need locking.
#[derive(Clone)]
pub struct AppState {
    /// Process start reference.
    pub clock: ProcessClock,
    /// Host facts source.
    pub facts: Arc<dyn SystemFacts>,
}

impl AppState {
    /// Create state reading facts from the local host.
    pub fn new(clock: ProcessClock) -> Self {
        Self::with_facts(clock, Arc::new(HostFacts))
    }

    /// Create state with a custom facts source.
    pub fn with_facts(clock: ProcessClock, facts: Arc<dyn SystemFacts>) -> Self {
        Self { clock, facts }
    }

    /// Build the `GET /` body for `request`.
    pub fn info(&self, request: RequestInfo) -> InfoResponse {
        InfoResponse {
            service: ServiceInfo::current(),
            system: SystemSnapshot::collect(self.facts.as_ref()),
            runtime: RuntimeSnapshot::capture(&self.clock),
            request,
            endpoints: ENDPOINTS,
        }
    }

    /// Build the `GET /health` body.
    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: HEALTHY,
            timestamp: now_rfc3339(),
            uptime_seconds: self.clock.uptime_seconds(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ProcessClock::start())
    }
}

/// Service info handler.
pub async fn index(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
) -> impl IntoResponse {
    let request = RequestInfo::from_parts(&method, &uri, &headers, peer.map(|ConnectInfo(a)| a));
    debug!(client_ip = %request.client_ip, "Serving service info");
    Json(state.info(request))
}

/// Health check handler - always returns 200.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.health())
}

/// Fallback for unknown paths and unsupported methods.
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    debug!(%method, path = uri.path(), "No route matched");
    ApiError::NotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}
