//! Built-in handlers for configured routes.
//!
//! # Responsibilities
//! - Turn each `[[routes]]` entry into a registered handler
//! - Render static bodies with `{param}` placeholders
//! - Echo the match as JSON when no body is configured
//! - Serve the configured not-found body

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::config::{RouteConfig, ServerConfig};
use crate::routing::{Handler, Params, RouteError, Router};

/// Responds on behalf of one configured route.
#[derive(Debug, Clone)]
pub struct RouteResponder {
    name: String,
    status: StatusCode,
    body: Option<String>,
}

impl RouteResponder {
    pub fn new(route: &RouteConfig) -> Self {
        Self {
            name: route.name.clone(),
            status: StatusCode::from_u16(route.status).unwrap_or(StatusCode::OK),
            body: route.body.clone(),
        }
    }
}

impl Handler for RouteResponder {
    fn call(&self, req: &mut Request<Body>, params: &Params<'_>) -> Response {
        match &self.body {
            Some(template) => (self.status, render(template, req, params)).into_response(),
            None => {
                let echo = json!({
                    "route": self.name,
                    "method": req.method().as_str(),
                    "path": req.uri().path(),
                    "params": params.values(req),
                });
                (self.status, Json(echo)).into_response()
            }
        }
    }
}

/// Replaces `{name}` with the value of parameter `name`.
fn render(template: &str, req: &Request<Body>, params: &Params<'_>) -> String {
    if params.is_empty() {
        return template.to_owned();
    }
    params
        .values(req)
        .iter()
        .fold(template.to_owned(), |body, (name, value)| {
            body.replace(&format!("{{{name}}}"), value)
        })
}

/// Answers unmatched requests with a fixed body.
#[derive(Debug, Clone)]
pub struct NotFoundResponder {
    body: String,
}

impl Handler for NotFoundResponder {
    fn call(&self, _req: &mut Request<Body>, _params: &Params<'_>) -> Response {
        (StatusCode::NOT_FOUND, self.body.clone()).into_response()
    }
}

/// Build a router serving every route of `config`.
pub fn build_router(config: &ServerConfig) -> Result<Router, RouteError> {
    let mut router = Router::from_config(&config.router);
    for route in &config.routes {
        let method = Method::from_bytes(route.method.to_ascii_uppercase().as_bytes()).map_err(
            |_| RouteError::InvalidMethod {
                method: route.method.clone(),
            },
        )?;
        router.handle(method, &route.path, RouteResponder::new(route))?;
    }
    if let Some(body) = &config.router.not_found_body {
        router.set_not_found(NotFoundResponder { body: body.clone() });
    }
    tracing::info!(routes = config.routes.len(), "Router built");
    Ok(router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn route(name: &str, method: &str, path: &str, body: Option<&str>) -> RouteConfig {
        RouteConfig {
            name: name.into(),
            method: method.into(),
            path: path.into(),
            status: 200,
            body: body.map(Into::into),
        }
    }

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_template_body() {
        let mut config = ServerConfig::default();
        config.routes.push(route(
            "post",
            "GET",
            "/users/:id/posts/:postID",
            Some("post {postID} by {id}"),
        ));
        let router = build_router(&config).unwrap();

        let res = router.serve(request(Method::GET, "/users/42/posts/7"));
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_string(res).await, "post 7 by 42");
    }

    #[tokio::test]
    async fn test_json_echo() {
        let mut config = ServerConfig::default();
        config.routes.push(route("files", "get", "/files/", None));
        let router = build_router(&config).unwrap();

        let res = router.serve(request(Method::GET, "/files/a/b/c"));
        let echo: Value = serde_json::from_str(&body_string(res).await).unwrap();
        assert_eq!(echo["route"], "files");
        assert_eq!(echo["method"], "GET");
        assert_eq!(echo["path"], "/files/a/b/c");
        assert_eq!(echo["params"]["*"], "a/b/c");
    }

    #[tokio::test]
    async fn test_configured_status_and_not_found() {
        let mut config = ServerConfig::default();
        let mut created = route("create", "POST", "/items", Some("created"));
        created.status = 201;
        config.routes.push(created);
        config.router.not_found_body = Some("nope".into());
        let router = build_router(&config).unwrap();

        let res = router.serve(request(Method::POST, "/items"));
        assert_eq!(res.status(), StatusCode::CREATED);

        let res = router.serve(request(Method::GET, "/items"));
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(res).await, "nope");
    }

    #[test]
    fn test_invalid_route_fails_build() {
        let mut config = ServerConfig::default();
        config.routes.push(route("anon", "GET", "/a/:", None));
        assert!(matches!(
            build_router(&config),
            Err(RouteError::AnonymousParameter { .. })
        ));

        let mut config = ServerConfig::default();
        config.routes.push(route("bad", "GE T", "/a", None));
        assert!(matches!(
            build_router(&config),
            Err(RouteError::InvalidMethod { .. })
        ));
    }
}
