//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Routing and server code produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a request (tower-http)
//! - The match path logs only at trace level

pub mod logging;
pub mod metrics;
