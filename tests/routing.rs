//! Dispatch behaviour of the router through its public API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::{IntoResponse, Response},
};
use pretty_assertions::assert_eq;
use segment_router::routing::{parameter, Params, RouteError, Router};

mod common;
use common::{body_string, request};

/// Responds with "<name> <param>=<value> ..." for the given parameter names.
fn describe(
    name: &'static str,
    keys: &'static [&'static str],
) -> impl Fn(&mut Request<Body>, &Params<'_>) -> Response + Send + Sync + 'static {
    move |req: &mut Request<Body>, params: &Params<'_>| {
        let mut out = name.to_string();
        for key in keys {
            out.push_str(&format!(" {}={}", key, parameter(req, params, key)));
        }
        out.into_response()
    }
}

fn api() -> Router {
    let mut router = Router::new();
    router
        .get("/", describe("index", &[]))
        .unwrap()
        .get("/users/new", describe("new-user", &[]))
        .unwrap()
        .get("/users/:id", describe("user", &["id"]))
        .unwrap()
        .get("/users/:id/posts/:postID", describe("post", &["id", "postID"]))
        .unwrap()
        .get("/files/", describe("files", &["*"]))
        .unwrap()
        .post("/users", describe("create-user", &[]))
        .unwrap();
    router
}

#[tokio::test]
async fn test_literal_precedence() {
    let router = api();
    let res = router.serve(request(Method::GET, "/users/new"));
    assert_eq!(body_string(res).await, "new-user");

    let res = router.serve(request(Method::GET, "/users/newer"));
    assert_eq!(body_string(res).await, "user id=newer");
}

#[tokio::test]
async fn test_parameter_indexing() {
    let router = api();
    let res = router.serve(request(Method::GET, "/users/42/posts/7"));
    assert_eq!(body_string(res).await, "post id=42 postID=7");
}

#[tokio::test]
async fn test_wildcard_capture() {
    let router = api();
    let res = router.serve(request(Method::GET, "/files/a/b/c"));
    assert_eq!(body_string(res).await, "files *=a/b/c");

    let res = router.serve(request(Method::GET, "/files/readme.md"));
    assert_eq!(body_string(res).await, "files *=readme.md");
}

#[tokio::test]
async fn test_determinism() {
    let router = api();
    for _ in 0..5 {
        let res = router.serve(request(Method::GET, "/users/42/posts/7"));
        assert_eq!(body_string(res).await, "post id=42 postID=7");
    }
}

#[test]
fn test_trailing_slash_redirect_is_idempotent() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let mut router = Router::new();
    router
        .get("/users/:id", move |_req: &mut Request<Body>, _p: &Params<'_>| {
            counter.fetch_add(1, Ordering::SeqCst);
            StatusCode::OK.into_response()
        })
        .unwrap();

    for method in [Method::GET, Method::POST, Method::DELETE] {
        let res = router.serve(request(method, "/users/42/"));
        assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(res.headers()[header::LOCATION], "/users/42");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let res = router.serve(request(Method::GET, "/users/42"));
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unknown_route_and_method() {
    let router = api();

    let res = router.serve(request(Method::GET, "/nothing/here"));
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(res).await, "");

    // Registered path, but no tree for this method.
    let res = router.serve(request(Method::PATCH, "/users/42"));
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Too many and too few segments.
    let res = router.serve(request(Method::GET, "/users/42/posts"));
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = router.serve(request(Method::GET, "/files"));
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_registration_rejection() {
    let mut router = Router::new();
    let handler = |_req: &mut Request<Body>, _p: &Params<'_>| StatusCode::OK.into_response();

    assert!(matches!(
        router.get("users", handler),
        Err(RouteError::MissingLeadingSlash { .. })
    ));
    assert!(matches!(
        router.get("/:", handler),
        Err(RouteError::AnonymousParameter { .. })
    ));
    assert!(matches!(
        router.get("/:name:", handler),
        Err(RouteError::EmptyConstraint { .. })
    ));
    assert!(matches!(
        router.get("/::", handler),
        Err(RouteError::EmptyConstraint { .. })
    ));
    assert!(router.get("/::[0-9]+", handler).is_ok());
}

#[tokio::test]
async fn test_constraint_is_advisory() {
    let mut router = Router::new();
    router
        .get("/items/:id:[0-9]+", describe("item", &["id"]))
        .unwrap();

    let res = router.serve(request(Method::GET, "/items/not-a-number"));
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_string(res).await, "item id=not-a-number");

    let node = router.find(&Method::GET, "/items/7").unwrap();
    let constraint = node.constraint(1).unwrap();
    assert!(constraint.is_match("7"));
    assert!(!constraint.is_match("seven"));
}

#[test]
fn test_invalid_constraint_fails_fast() {
    let mut router = Router::new();
    let handler = |_req: &mut Request<Body>, _p: &Params<'_>| StatusCode::OK.into_response();
    let Err(err) = router.get("/items/:id:[0-9", handler) else {
        panic!("unclosed character class was accepted");
    };
    assert!(matches!(err, RouteError::InvalidConstraint { .. }));
    assert!(err.to_string().contains("/items/:id:[0-9"));
}

#[tokio::test]
async fn test_root_route() {
    let router = api();
    let res = router.serve(request(Method::GET, "/"));
    assert_eq!(body_string(res).await, "index");
}

#[tokio::test]
async fn test_params_without_binding_are_empty() {
    let mut router = Router::new();
    router
        .get("/plain", describe("plain", &["id", "*"]))
        .unwrap();
    let res = router.serve(request(Method::GET, "/plain"));
    assert_eq!(body_string(res).await, "plain id= *=");
}
