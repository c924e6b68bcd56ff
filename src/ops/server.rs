//! Operational server implementation
//!
//! Wires the rotation scheduler behind the REST API with the usual
//! middleware layers and graceful shutdown.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::rotation::RotationScheduler;

use super::api::create_router;
use super::config::OpsConfig;

// ============================================================================
// App State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Rotation scheduler
    pub scheduler: Arc<RotationScheduler>,

    /// Server start time
    pub start_time: Instant,

    /// Configuration
    pub config: OpsConfig,
}

// ============================================================================
// Ops Server
// ============================================================================

/// Operational HTTP server for the rotation subsystem
pub struct OpsServer {
    config: OpsConfig,
    state: AppState,
}

impl OpsServer {
    /// Create a new ops server
    pub fn new(config: OpsConfig, scheduler: Arc<RotationScheduler>) -> Self {
        let state = AppState {
            scheduler,
            start_time: Instant::now(),
            config: config.clone(),
        };

        Self { config, state }
    }

    /// Get the application state
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the router with all routes and layers
    pub fn build_router(&self) -> Router {
        let mut router = create_router(self.state.clone());

        if self.config.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        if self.config.enable_request_logging {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Start the server
    pub async fn start(&self) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.config.bind_address;

        tracing::info!("Starting ops server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(e.to_string()))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::ServeError(e.to_string()))?;

        Ok(())
    }

    /// Start with graceful shutdown
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.config.bind_address;

        tracing::info!("Starting ops server on {} (with graceful shutdown)", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(e.to_string()))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::ServeError(e.to_string()))?;

        tracing::info!("Ops server shutdown complete");
        Ok(())
    }
}

// ============================================================================
// Server Errors
// ============================================================================

/// Server errors
#[derive(Debug, Clone)]
pub enum ServerError {
    /// Failed to bind the listen address
    BindError(String),

    /// Failure while serving
    ServeError(String),
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BindError(reason) => write!(f, "Failed to bind address: {reason}"),
            Self::ServeError(reason) => write!(f, "Server error: {reason}"),
        }
    }
}

impl std::error::Error for ServerError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::TemplateContentCreator;
    use crate::storage::MemoryPostStore;

    fn test_server() -> OpsServer {
        let store = Arc::new(MemoryPostStore::new());
        let creator = Arc::new(TemplateContentCreator::new(store.clone()));
        let scheduler = Arc::new(RotationScheduler::new(store, creator));
        OpsServer::new(OpsConfig::default(), scheduler)
    }

    #[tokio::test]
    async fn test_server_builds_router() {
        let server = test_server();
        // Router construction itself must not panic with all layers enabled
        let _router = server.build_router();
        assert_eq!(server.state().config.bind_address.port(), 8080);
    }
}
