//! Segment Router Library
//!
//! A method-keyed route tree matching request paths segment by segment,
//! with named parameters, regex-annotated parameters and trailing
//! wildcards, plus a small Axum server that serves routes from a TOML file.
//!
//! ```no_run
//! use axum::{body::Body, http::Request, response::IntoResponse};
//! use segment_router::routing::{Params, Router};
//!
//! let mut router = Router::new();
//! router
//!     .get("/users/:id", |req: &mut Request<Body>, params: &Params<'_>| {
//!         format!("user {}", params.get(req, "id")).into_response()
//!     })
//!     .unwrap();
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{parameter, Handler, Params, RouteError, Router};
