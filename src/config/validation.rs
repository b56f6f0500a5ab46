//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check route patterns, methods and statuses before any tree is built
//! - Detect duplicate routes
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::{Method, StatusCode};
use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::routing::pattern::PARAM_MARKER;
use crate::routing::segments::{split_path, SEPARATOR};
use crate::routing::validate_pattern;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("route {route:?}: {method:?} is not a valid HTTP method")]
    InvalidMethod { route: String, method: String },

    #[error("route {route:?}: {reason}")]
    InvalidPattern { route: String, reason: String },

    #[error("route {route:?}: {status} is not a valid HTTP status")]
    InvalidStatus { route: String, status: u16 },

    #[error("route {route:?}: {method} {path} is already defined")]
    DuplicateRoute {
        route: String,
        method: String,
        path: String,
    },
}

/// Check `config` and collect every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    let mut seen = HashSet::new();
    for route in &config.routes {
        let method = route.method.to_ascii_uppercase();
        if Method::from_bytes(method.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidMethod {
                route: route.name.clone(),
                method: route.method.clone(),
            });
        }
        if let Err(e) = validate_pattern(&route.path) {
            errors.push(ValidationError::InvalidPattern {
                route: route.name.clone(),
                reason: e.to_string(),
            });
        }
        if StatusCode::from_u16(route.status).is_err() {
            errors.push(ValidationError::InvalidStatus {
                route: route.name.clone(),
                status: route.status,
            });
        }
        if !seen.insert((method.clone(), route_key(&route.path))) {
            errors.push(ValidationError::DuplicateRoute {
                route: route.name.clone(),
                method,
                path: route.path.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Tree position a route registers at: parameter names and expressions
/// are dropped, so `/users/:id` and `/users/:name` collide.
fn route_key(path: &str) -> String {
    split_path(path).fold(String::with_capacity(path.len()), |mut key, segment| {
        key.push(SEPARATOR);
        if segment.starts_with(PARAM_MARKER) {
            key.push(PARAM_MARKER);
        } else {
            key.push_str(segment);
        }
        key
    })
}
