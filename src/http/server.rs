//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app whose fallback dispatches to the route tree
//! - Wire up middleware (tracing, timeout, request ID)
//! - Swap in a freshly built router on configuration reload
//! - Serve until the shutdown signal, then drain
//! - Observability (metrics, correlation IDs)

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router as AxumRouter,
};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::handlers::build_router;
use crate::http::request::MakeRequestUuid;
use crate::lifecycle::ShutdownListener;
use crate::observability::metrics;
use crate::routing::{RouteError, Router};

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ArcSwap<Router>>,
}

/// HTTP server embedding the route tree.
pub struct HttpServer {
    app: AxumRouter,
    state: AppState,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails if any configured route cannot be registered.
    pub fn new(config: ServerConfig) -> Result<Self, RouteError> {
        let router = build_router(&config)?;
        let state = AppState {
            router: Arc::new(ArcSwap::from_pointee(router)),
        };
        let app = Self::build_app(&config, state.clone());
        Ok(Self { app, state, config })
    }

    /// Build the Axum app with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &ServerConfig, state: AppState) -> AxumRouter {
        AxumRouter::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The Axum app, for embedding or in-process testing.
    pub fn app(&self) -> AxumRouter {
        self.app.clone()
    }

    /// Replace the live router with one built from `config`.
    ///
    /// On error the current router keeps serving.
    pub fn reload(&self, config: &ServerConfig) -> Result<(), RouteError> {
        swap_router(&self.state, config)
    }

    /// Dump of the current route trees.
    pub fn routes(&self) -> String {
        self.state.router.load().to_string()
    }

    /// Get a reference to the startup config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configurations received on `config_updates` replace the router;
    /// listener and timeout settings only apply on restart.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ServerConfig>,
        mut shutdown: ShutdownListener,
    ) -> Result<(), io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let state = self.state.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                if let Err(e) = swap_router(&state, &config) {
                    tracing::error!(error = %e, "Rejected route table, keeping current routes");
                }
            }
        });

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move { shutdown.recv().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn swap_router(state: &AppState, config: &ServerConfig) -> Result<(), RouteError> {
    let result = build_router(config);
    metrics::record_reload(result.is_ok());
    state.router.store(Arc::new(result?));
    tracing::info!(routes = config.routes.len(), "Route table reloaded");
    Ok(())
}

/// Dispatch every request through the current router.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let router = state.router.load_full();
    let response = router.serve(request);
    metrics::record_request(method.as_str(), response.status().as_u16(), start);
    response
}
