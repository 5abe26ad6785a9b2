//! In-process stand-in for the service monitor API.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Default)]
pub struct MockState {
    pub records: Vec<Value>,
    pub calls: Vec<String>,
    /// Reply to the snapshot endpoint with a 500 failure envelope.
    pub fail_snapshot: bool,
    /// Reply to the snapshot endpoint with a body that is not a record list.
    pub malformed_snapshot: bool,
    /// Answer unfollow with a 200 whose body is not the JSON envelope.
    pub malformed_unfollow: bool,
}

pub type Shared = Arc<Mutex<MockState>>;

pub fn record(hostname: &str, name: &str, enabled: bool, active: &str) -> Value {
    json!({
        "hostname": hostname,
        "name": name,
        "description": format!("{} daemon", name),
        "enabled": enabled,
        "active_status": active,
        "last_check": "2024-05-01T10:00:00",
    })
}

/// The web1/db1 fleet used throughout the tests.
pub fn fleet() -> Vec<Value> {
    vec![
        record("web1", "nginx", true, "active"),
        record("web1", "cron", false, "failed"),
        record("db1", "postgres", true, "active"),
    ]
}

/// Bind on an ephemeral port and serve until the runtime shuts down.
pub async fn spawn(records: Vec<Value>) -> (String, Shared) {
    let state: Shared = Arc::new(Mutex::new(MockState { records, ..Default::default() }));
    let app = Router::new()
        .route("/api/svc/get_latest_statuses", get(latest_statuses))
        .route("/api/systemctl/:operation", get(systemctl))
        .route("/api/hosts/remove_service", patch(remove_service))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{}", addr), state)
}

fn fail(code: StatusCode, message: &str) -> Response {
    (code, Json(json!({ "status": "fail", "message": message }))).into_response()
}

async fn latest_statuses(State(state): State<Shared>) -> Response {
    let mut state = state.lock().unwrap();
    state.calls.push("fetch".into());
    if state.fail_snapshot {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable");
    }
    if state.malformed_snapshot {
        return Json(json!({ "status": "success", "data": "not a list" })).into_response();
    }
    Json(json!({ "status": "success", "data": state.records })).into_response()
}

async fn systemctl(
    State(state): State<Shared>,
    Path(operation): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let (Some(host), Some(service)) = (params.get("host"), params.get("service")) else {
        return fail(StatusCode::BAD_REQUEST, "host and service are required");
    };
    let mut state = state.lock().unwrap();
    state.calls.push(format!("{} {}/{}", operation, host, service));

    if service == "broken" {
        return fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("Failed to {} {}.service", operation, service),
        );
    }

    match operation.as_str() {
        "start" | "stop" | "restart" => {
            let active = if operation == "stop" { "inactive" } else { "active" };
            for r in state.records.iter_mut() {
                if r["hostname"] == host.as_str() && r["name"] == service.as_str() {
                    r["active_status"] = json!(active);
                }
            }
            Json(json!({ "status": "success", "data": { "returncode": 0 } })).into_response()
        }
        "status" => Json(json!({
            "status": "success",
            "data": [
                format!("● {}.service - {} daemon", service, service),
                "     Active: active (running)".to_string(),
            ],
        }))
        .into_response(),
        "show" => Json(json!({
            "status": "success",
            "data": { "MainPID": "812", "Id": format!("{}.service", service), "ActiveState": "active" },
        }))
        .into_response(),
        _ => fail(StatusCode::NOT_FOUND, &format!("unknown command {}", operation)),
    }
}

#[derive(Deserialize)]
struct RemoveService {
    hostname: String,
    service: String,
}

async fn remove_service(State(state): State<Shared>, Json(body): Json<RemoveService>) -> Response {
    let mut state = state.lock().unwrap();
    state.calls.push(format!("unfollow {}/{}", body.hostname, body.service));
    if state.malformed_unfollow {
        return (StatusCode::OK, "<html>proxy error page</html>").into_response();
    }
    let before = state.records.len();
    state
        .records
        .retain(|r| !(r["hostname"] == body.hostname.as_str() && r["name"] == body.service.as_str()));
    if state.records.len() == before {
        return fail(StatusCode::NOT_FOUND, "service is not followed");
    }
    Json(json!({ "status": "success", "message": "service removed" })).into_response()
}
