//! HTTP/JSON surface — spec.md §6. Grounded on the teacher's
//! `http/server.rs`/`http/handler.rs`: an `axum::Router` over `Arc<ServiceFacade>`
//! state, permissive CORS, handlers that extract/serialize JSON directly.

use super::facade::{stats_to_map, CreateBuildRequest, CreateRuleRequest, ServiceFacade};
use crate::error::CoreError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn router(facade: Arc<ServiceFacade>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/status", get(status))
        .route("/api/v1/builds", post(create_build))
        .route("/api/v1/builds/stats", get(get_build_stats))
        .route("/api/v1/builds/order", get(get_build_order))
        .route("/api/v1/builds/:id", get(get_build))
        .route("/api/v1/rules", post(create_rule))
        .route("/api/v1/rules/:name", get(get_rule))
        .route("/api/v1/rules/:name/targets", get(get_targets_by_rule))
        .route("/api/v1/targets", get(get_all_targets))
        .route("/api/v1/targets/:path", get(get_target))
        .route("/api/v1/targets/:path/dependencies", get(get_target_dependencies))
        .route(
            "/api/v1/targets/:path/reverse_dependencies",
            get(get_target_reverse_dependencies),
        )
        .route("/api/v1/targets/:path/status", put(update_target_status))
        .route("/api/v1/analysis/cycles", get(find_cycles))
        .route("/api/v1/load", post(load_ninja_file))
        .route("/api/v1/debug/quads", get(debug_quads))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(facade)
}

/// Maps a core error onto `(status, {error, code})`, per spec.md §7.
fn error_response(err: CoreError) -> Response {
    let (status, code) = match &err {
        CoreError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "InvalidArgument"),
        CoreError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
        CoreError::ParseError(_) => (StatusCode::BAD_REQUEST, "ParseError"),
        CoreError::StoreUnavailable(_) => (StatusCode::INTERNAL_SERVER_ERROR, "StoreUnavailable"),
        CoreError::CycleDetected(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CycleDetected"),
        CoreError::SerializationError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "SerializationError"),
    };
    (status, Json(json!({ "error": err.to_string(), "code": code }))).into_response()
}

async fn health(State(facade): State<Arc<ServiceFacade>>) -> impl IntoResponse {
    let info = facade.health();
    Json(json!({ "status": info.status, "timestamp": info.timestamp }))
}

async fn status(State(facade): State<Arc<ServiceFacade>>) -> impl IntoResponse {
    let info = facade.status();
    Json(json!({ "service": info.service, "uptime": info.uptime_secs }))
}

#[derive(Deserialize)]
struct CreateBuildBody {
    build_id: String,
    rule: String,
    #[serde(default)]
    variables: HashMap<String, String>,
    #[serde(default)]
    pool: String,
    #[serde(default)]
    inputs: Vec<String>,
    #[serde(default)]
    outputs: Vec<String>,
    #[serde(default)]
    implicit_deps: Vec<String>,
    #[serde(default)]
    order_deps: Vec<String>,
}

async fn create_build(State(facade): State<Arc<ServiceFacade>>, Json(body): Json<CreateBuildBody>) -> Response {
    let result = facade.create_build(CreateBuildRequest {
        build_id: body.build_id,
        rule: body.rule,
        variables: body.variables,
        pool: body.pool,
        inputs: body.inputs,
        outputs: body.outputs,
        implicit_deps: body.implicit_deps,
        order_deps: body.order_deps,
    });
    match result {
        Ok(build) => (
            StatusCode::CREATED,
            Json(json!({ "status": "created", "build_id": build.build_id })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_build(State(facade): State<Arc<ServiceFacade>>, Path(id): Path<String>) -> Response {
    match facade.get_build(&id) {
        Ok(build) => Json(json!({
            "build_id": build.build_id,
            "rule": build.rule,
            "pool": build.pool,
            "variables": build.variables,
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_build_stats(State(facade): State<Arc<ServiceFacade>>) -> Response {
    match facade.get_build_stats() {
        Ok(stats) => Json(stats_to_map(&stats)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_build_order(State(facade): State<Arc<ServiceFacade>>) -> Response {
    match facade.get_build_order() {
        Ok(order) => Json(json!({ "build_order": order })).into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
struct CreateRuleBody {
    name: String,
    command: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    variables: HashMap<String, String>,
}

async fn create_rule(State(facade): State<Arc<ServiceFacade>>, Json(body): Json<CreateRuleBody>) -> Response {
    let result = facade.create_rule(CreateRuleRequest {
        name: body.name,
        command: body.command,
        description: body.description,
        variables: body.variables,
    });
    match result {
        Ok(rule) => (StatusCode::CREATED, Json(json!({ "status": "created", "name": rule.name }))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_rule(State(facade): State<Arc<ServiceFacade>>, Path(name): Path<String>) -> Response {
    match facade.get_rule(&name) {
        Ok(rule) => Json(json!({
            "name": rule.name,
            "command": rule.command,
            "description": rule.description,
            "variables": rule.variables,
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_targets_by_rule(State(facade): State<Arc<ServiceFacade>>, Path(name): Path<String>) -> Response {
    match facade.get_targets_by_rule(&name) {
        Ok(targets) => Json(targets_json(&targets)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_all_targets(State(facade): State<Arc<ServiceFacade>>) -> Response {
    match facade.get_all_targets() {
        Ok(targets) => Json(targets_json(&targets)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_target(State(facade): State<Arc<ServiceFacade>>, Path(path): Path<String>) -> Response {
    match facade.get_target(&path) {
        Ok(target) => Json(target_json(&target)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_target_dependencies(State(facade): State<Arc<ServiceFacade>>, Path(path): Path<String>) -> Response {
    match facade.get_target_dependencies(&path) {
        Ok(files) => Json(json!(files
            .iter()
            .map(|f| json!({ "path": f.path, "file_type": f.file_type.as_str() }))
            .collect::<Vec<_>>()))
        .into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_target_reverse_dependencies(
    State(facade): State<Arc<ServiceFacade>>,
    Path(path): Path<String>,
) -> Response {
    match facade.get_target_reverse_dependencies(&path) {
        Ok(targets) => Json(targets_json(&targets)).into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
struct UpdateStatusBody {
    status: String,
}

async fn update_target_status(
    State(facade): State<Arc<ServiceFacade>>,
    Path(path): Path<String>,
    Json(body): Json<UpdateStatusBody>,
) -> Response {
    match facade.update_target_status(&path, &body.status) {
        Ok(()) => Json(json!({ "status": "updated" })).into_response(),
        Err(e) => error_response(e),
    }
}

async fn find_cycles(State(facade): State<Arc<ServiceFacade>>) -> Response {
    match facade.find_cycles() {
        Ok(cycles) => {
            let cycle_count = cycles.len();
            Json(json!({ "cycles": cycles, "cycle_count": cycle_count })).into_response()
        }
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize, Default)]
struct LoadBody {
    file_path: Option<String>,
    content: Option<String>,
}

async fn load_ninja_file(State(facade): State<Arc<ServiceFacade>>, Json(body): Json<LoadBody>) -> Response {
    match facade.load_ninja_file(body.file_path, body.content) {
        Ok(result) => Json(json!({
            "status": "success",
            "message": result.message,
            "stats": { "rules_loaded": result.rules_loaded, "builds_loaded": result.builds_loaded },
            "build_time": result.build_time.as_secs_f64(),
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

async fn debug_quads(State(facade): State<Arc<ServiceFacade>>) -> Response {
    match facade.debug_quads() {
        Ok(quads) => Json(
            quads
                .iter()
                .map(|t| json!({ "subject": t.subject, "predicate": t.predicate, "object": t.object }))
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => error_response(e),
    }
}

fn target_json(target: &crate::graph::Target) -> serde_json::Value {
    json!({
        "path": target.path,
        "status": target.status,
        "hash": target.hash,
        "build": target.build,
    })
}

fn targets_json(targets: &[crate::graph::Target]) -> serde_json::Value {
    json!(targets.iter().map(target_json).collect::<Vec<_>>())
}
