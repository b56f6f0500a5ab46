//! Route registration errors.
//!
//! These only arise from route tables written by the programmer (or loaded
//! from configuration), never from request input. Dispatch has no error
//! path: every miss is a plain "not found".

use thiserror::Error;

/// Error returned when a route cannot be registered.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("path {path:?} must begin with '/'")]
    MissingLeadingSlash { path: String },

    #[error("path {path:?} has an anonymous parameter")]
    AnonymousParameter { path: String },

    #[error("path {path:?} has an empty regular expression")]
    EmptyConstraint { path: String },

    #[error("path {path:?} has an invalid regular expression: {source}")]
    InvalidConstraint {
        path: String,
        #[source]
        source: regex::Error,
    },

    #[error("{method:?} is not a valid HTTP method")]
    InvalidMethod { method: String },
}
