//! Integration coverage for the HTTP/JSON surface (spec.md §6), driven
//! in-process via `tower::ServiceExt::oneshot` against the real `axum::Router`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use ninjagraph::service::{http::router, ServiceFacade};
use ninjagraph::store::QuadStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> (tempfile::TempDir, axum::Router) {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(QuadStore::open(dir.path()).unwrap());
    let facade = Arc::new(ServiceFacade::new(store));
    (dir, router(facade))
}

async fn send(app: axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::builder().method("GET").uri(path).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_and_status_are_constant_response() {
    let (_dir, app) = app();
    let (status, body) = send(app.clone(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(app, get("/api/v1/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "ninjagraph");
    assert!(body["uptime"].is_u64());
}

#[tokio::test]
async fn create_rule_then_build_then_query_dependencies() {
    let (_dir, app) = app();

    let (status, _) = send(
        app.clone(),
        post("/api/v1/rules", json!({ "name": "cc", "command": "gcc" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        app.clone(),
        post(
            "/api/v1/builds",
            json!({
                "build_id": "a.o",
                "rule": "cc",
                "inputs": ["a.c"],
                "outputs": ["a.o"],
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(app.clone(), get("/api/v1/targets/a.o")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "clean");

    let (status, body) = send(app.clone(), get("/api/v1/targets/a.o/dependencies")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "path": "a.c", "file_type": "source" }]));

    let (status, _) = send(app, get("/api/v1/rules/missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_status_rejects_empty_and_accepts_nonempty() {
    let (_dir, app) = app();
    send(
        app.clone(),
        post("/api/v1/rules", json!({ "name": "cc", "command": "gcc" })),
    )
    .await;
    send(
        app.clone(),
        post(
            "/api/v1/builds",
            json!({ "build_id": "a.o", "rule": "cc", "outputs": ["a.o"] }),
        ),
    )
    .await;

    let req = Request::builder()
        .method("PUT")
        .uri("/api/v1/targets/a.o/status")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "status": "" }).to_string()))
        .unwrap();
    let (status, _) = send(app.clone(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = Request::builder()
        .method("PUT")
        .uri("/api/v1/targets/a.o/status")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "status": "dirty" }).to_string()))
        .unwrap();
    let (status, _) = send(app, req).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn load_endpoint_reports_stats_and_cycles_endpoint_reports_cycles() {
    let (_dir, app) = app();
    let text = "rule cc\n  command = cc\nbuild a: cc b\nbuild b: cc a\n";

    let (status, body) = send(app.clone(), post("/api/v1/load", json!({ "content": text }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["stats"]["builds_loaded"], 2);

    let (status, body) = send(app, get("/api/v1/analysis/cycles")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cycle_count"], 1);
}

#[tokio::test]
async fn load_without_file_path_or_content_is_invalid_argument() {
    let (_dir, app) = app();
    let (status, body) = send(app, post("/api/v1/load", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "InvalidArgument");
}
