//! HTTP embedding of the router.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum app, middleware)
//!     → request.rs (request ID)
//!     → routing::Router::serve (redirect / match / not found)
//!     → handlers.rs (configured responders)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod server;

pub use handlers::{build_router, NotFoundResponder, RouteResponder};
pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
