//! Route registration and dispatch.
//!
//! # Responsibilities
//! - Own one route tree per HTTP method
//! - Redirect paths with a trailing slash to their canonical form
//! - Dispatch a request to the handler of the matched node
//! - Fall back to a not-found handler (or a bare 404)
//!
//! # Design Decisions
//! - Registration must finish before serving starts; dispatch takes `&self`
//! - An unknown method and an unknown path are the same "not found"
//! - Parameters are published by reference and resolved lazily

use std::collections::HashMap;
use std::fmt;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::{IntoResponse, Response},
};

use crate::config::RouterConfig;
use crate::routing::error::RouteError;
use crate::routing::params::Params;
use crate::routing::tree::Node;

/// Something invocable with a dispatched request.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: &mut Request<Body>, params: &Params<'_>) -> Response;
}

impl<F> Handler for F
where
    F: Fn(&mut Request<Body>, &Params<'_>) -> Response + Send + Sync + 'static,
{
    fn call(&self, req: &mut Request<Body>, params: &Params<'_>) -> Response {
        self(req, params)
    }
}

pub type BoxHandler = Box<dyn Handler>;

/// Method-keyed collection of route trees.
pub struct Router {
    trees: HashMap<Method, Node<BoxHandler>>,
    not_found: Option<BoxHandler>,
    redirect_trailing_slash: bool,
    enforce_constraints: bool,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// A router with no routes, redirecting trailing slashes and leaving
    /// constraints unenforced.
    pub fn new() -> Self {
        Self::from_config(&RouterConfig::default())
    }

    pub fn from_config(config: &RouterConfig) -> Self {
        Self {
            trees: HashMap::new(),
            not_found: None,
            redirect_trailing_slash: config.redirect_trailing_slash,
            enforce_constraints: config.enforce_constraints,
        }
    }

    /// Add a route with method, path and handler.
    pub fn handle(
        &mut self,
        method: Method,
        path: &str,
        handler: impl Handler,
    ) -> Result<&mut Self, RouteError> {
        let root = self.trees.entry(method.clone()).or_default();
        let replaced = root.insert(path, Box::new(handler))?;
        if replaced.is_some() {
            tracing::warn!(method = %method, path = %path, "Route handler replaced");
        } else {
            tracing::debug!(method = %method, path = %path, "Route registered");
        }
        Ok(self)
    }

    pub fn get(&mut self, path: &str, handler: impl Handler) -> Result<&mut Self, RouteError> {
        self.handle(Method::GET, path, handler)
    }

    pub fn post(&mut self, path: &str, handler: impl Handler) -> Result<&mut Self, RouteError> {
        self.handle(Method::POST, path, handler)
    }

    pub fn put(&mut self, path: &str, handler: impl Handler) -> Result<&mut Self, RouteError> {
        self.handle(Method::PUT, path, handler)
    }

    pub fn patch(&mut self, path: &str, handler: impl Handler) -> Result<&mut Self, RouteError> {
        self.handle(Method::PATCH, path, handler)
    }

    pub fn delete(&mut self, path: &str, handler: impl Handler) -> Result<&mut Self, RouteError> {
        self.handle(Method::DELETE, path, handler)
    }

    /// Handler invoked whenever no route matches.
    pub fn set_not_found(&mut self, handler: impl Handler) -> &mut Self {
        self.not_found = Some(Box::new(handler));
        self
    }

    /// Node serving `method` and `path`, if any.
    pub fn find(&self, method: &Method, path: &str) -> Option<&Node<BoxHandler>> {
        self.trees
            .get(method)?
            .find(path, self.enforce_constraints)
    }

    /// Dispatch a request.
    pub fn serve(&self, mut req: Request<Body>) -> Response {
        let path = req.uri().path();
        if self.redirect_trailing_slash && path.len() > 1 && path.ends_with('/') {
            return redirect_trailing_slash(&req);
        }

        match self.find(req.method(), path) {
            Some(node) => match node.handler() {
                Some(handler) => {
                    let params = Params::new(node.params());
                    handler.call(&mut req, &params)
                }
                None => self.not_found(req),
            },
            None => {
                tracing::trace!(method = %req.method(), path = %req.uri().path(), "No route matched");
                self.not_found(req)
            }
        }
    }

    fn not_found(&self, mut req: Request<Body>) -> Response {
        match &self.not_found {
            Some(handler) => handler.call(&mut req, &Params::empty()),
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

fn redirect_trailing_slash(req: &Request<Body>) -> Response {
    let uri = req.uri();
    let path = uri.path();
    let trimmed = &path[..path.len() - 1];
    let location = match uri.query() {
        Some(query) => format!("{trimmed}?{query}"),
        None => trimmed.to_owned(),
    };

    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(header::LOCATION, location)
        .body(Body::empty())
        .unwrap_or_else(|_| StatusCode::BAD_REQUEST.into_response())
}

impl fmt::Display for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut trees: Vec<_> = self.trees.iter().collect();
        trees.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
        for (method, root) in trees {
            writeln!(f, "{method}")?;
            root.write_tree(f, &" ".repeat(method.as_str().len() + 1))?;
        }
        Ok(())
    }
}
