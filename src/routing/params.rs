//! Request-scoped path parameters.
//!
//! Dispatch only publishes a reference to the matched node's index map.
//! Values are resolved against the request path on the first lookup and
//! cached for the rest of the request, so handlers that never read a
//! parameter pay nothing for them.

use std::cell::OnceCell;
use std::collections::HashMap;

use axum::http::Request;

use crate::routing::pattern::WILDCARD;
use crate::routing::segments;
use crate::routing::tree::ParamIndices;

/// Side table handed to a handler alongside its request.
#[derive(Debug, Default)]
pub struct Params<'t> {
    indices: Option<&'t ParamIndices>,
    values: OnceCell<HashMap<&'t str, String>>,
}

impl<'t> Params<'t> {
    /// Publish the index map of a matched node.
    pub fn new(indices: &'t ParamIndices) -> Self {
        Self {
            indices: (!indices.is_empty()).then_some(indices),
            values: OnceCell::new(),
        }
    }

    /// A side table with nothing published.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if the matched route binds no parameters.
    pub fn is_empty(&self) -> bool {
        self.indices.is_none()
    }

    /// Value of parameter `name`, or `""` if the route binds no such name.
    ///
    /// `req` must be the request this table was published for: values are
    /// resolved from the first request passed in and cached for the table's
    /// lifetime.
    pub fn get<B>(&self, req: &Request<B>, name: &str) -> &str {
        self.values(req)
            .get(name)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// All parameter values of the request.
    pub fn values<B>(&self, req: &Request<B>) -> &HashMap<&'t str, String> {
        self.values
            .get_or_init(|| materialize(self.indices, req.uri().path()))
    }
}

/// Value of path parameter `name` for a dispatched request.
///
/// Returns `""` when the parameter does not exist.
pub fn parameter<'p, B>(req: &Request<B>, params: &'p Params<'_>, name: &str) -> &'p str {
    params.get(req, name)
}

fn materialize<'t>(indices: Option<&'t ParamIndices>, path: &str) -> HashMap<&'t str, String> {
    let Some(indices) = indices else {
        return HashMap::new();
    };
    indices
        .iter()
        .map(|(name, &index)| {
            let value = if name == WILDCARD {
                segments::tail(path, index)
            } else {
                segments::nth(path, index)
            };
            (name.as_str(), value.to_owned())
        })
        .collect()
}
