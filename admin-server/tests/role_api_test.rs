//! Role API integration tests
//!
//! Drives the real router via `tower::ServiceExt::oneshot` against an
//! empty in-process store.

use std::sync::Arc;

use admin_server::{Config, RoleStore, ServerState, build_app};
use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    let state = ServerState::new(Config::from_env(), Arc::new(RoleStore::new()));
    build_app().with_state(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("Failed to build request"),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request"),
    };

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response body is not JSON")
    };
    (status, value)
}

async fn create_role(app: &Router, body: Value) -> String {
    let (status, role) = send(app, "POST", "/api/roles", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    role["id"].as_str().expect("Created role has no id").to_string()
}

#[tokio::test]
async fn test_role_crud_and_hierarchy() {
    let app = app();

    let a = create_role(&app, json!({"name": "A"})).await;
    let b = create_role(&app, json!({"name": "B", "reporting_ids": [a]})).await;
    let c = create_role(&app, json!({"name": "C", "reporting_ids": [a]})).await;

    let (status, forest) = send(&app, "GET", "/api/roles/hierarchy", None).await;
    assert_eq!(status, StatusCode::OK);
    let forest = forest.as_array().expect("Forest is not an array");
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0]["role"]["id"], json!(a));
    let children: Vec<&str> = forest[0]["children"]
        .as_array()
        .expect("No children array")
        .iter()
        .map(|n| n["role"]["id"].as_str().unwrap())
        .collect();
    assert_eq!(children, [b.as_str(), c.as_str()]);

    let (status, role) = send(&app, "GET", &format!("/api/roles/{b}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(role["name"], json!("B"));

    let (status, _) = send(&app, "GET", "/api/roles/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_blocked_while_role_has_reports() {
    let app = app();

    let head = create_role(&app, json!({"name": "Head"})).await;
    let agent = create_role(&app, json!({"name": "Agent", "reporting_ids": [head]})).await;

    let (status, body) = send(&app, "DELETE", &format!("/api/roles/{head}"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let message = body["message"].as_str().expect("No message in rejection");
    assert!(message.contains("direct reports"), "message: {message}");

    // Leaf goes first, then the head is unreferenced
    let (status, deleted) = send(&app, "DELETE", &format!("/api/roles/{agent}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!(true));

    let (status, _) = send(&app, "DELETE", &format!("/api/roles/{head}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_secondary_reporting_blocks_deletion() {
    let app = app();

    let head = create_role(&app, json!({"name": "Head"})).await;
    let mentor = create_role(&app, json!({"name": "Mentor"})).await;
    // mentor is a secondary (non-primary) reporting target
    create_role(&app, json!({"name": "Agent", "reporting_ids": [head, mentor]})).await;

    let (status, _) = send(&app, "DELETE", &format!("/api/roles/{mentor}"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // But the mentor has no tree children
    let (status, forest) = send(&app, "GET", "/api/roles/hierarchy", None).await;
    assert_eq!(status, StatusCode::OK);
    let mentor_node = forest
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["role"]["id"] == json!(mentor))
        .expect("Mentor should be a root");
    assert_eq!(mentor_node["children"], json!([]));
}

#[tokio::test]
async fn test_subordinates_excludes_super_admin_by_default() {
    let app = app();

    let head = create_role(&app, json!({"name": "Head"})).await;
    create_role(&app, json!({"name": "Agent", "reporting_ids": [head]})).await;
    create_role(
        &app,
        json!({
            "name": "Root",
            "reporting_ids": [head],
            "permissions": [{"page": "*", "actions": "*"}]
        }),
    )
    .await;

    let (status, subs) = send(&app, "GET", &format!("/api/roles/{head}/subordinates"), None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = subs
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Agent"]);

    let (status, subs) = send(
        &app,
        "GET",
        &format!("/api/roles/{head}/subordinates?include_super_admin=true"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(subs.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_and_permissions_roundtrip() {
    let app = app();

    let id = create_role(&app, json!({"name": "Agent"})).await;

    let (status, role) = send(
        &app,
        "PUT",
        &format!("/api/roles/{id}"),
        Some(json!({"description": "Handles leads"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(role["description"], json!("Handles leads"));

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/roles/{id}/permissions"),
        Some(json!([{"page": "leads", "actions": ["show", "own"]}])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, perms) = send(&app, "GET", &format!("/api/roles/{id}/permissions"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(perms, json!([{"page": "leads", "actions": ["show", "own"]}]));
}

#[tokio::test]
async fn test_duplicate_name_conflicts() {
    let app = app();
    create_role(&app, json!({"name": "Agent"})).await;

    let (status, _) = send(&app, "POST", "/api/roles", Some(json!({"name": "Agent"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "POST", "/api/roles", Some(json!({"name": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_permission_check_endpoint() {
    let app = app();

    let (status, result) = send(
        &app,
        "POST",
        "/api/permissions/check",
        Some(json!({
            "permissions": [{"page": "leads", "actions": ["show", "own"]}],
            "resource": "leads",
            "action": "own"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["allowed"], json!(true));

    let (_, result) = send(
        &app,
        "POST",
        "/api/permissions/check",
        Some(json!({
            "permissions": [{"page": "leads", "actions": ["show", "own"]}],
            "resource": "leads",
            "action": "delete"
        })),
    )
    .await;
    assert_eq!(result["allowed"], json!(false));

    // Top-level wildcard pair allows anything
    let (_, result) = send(
        &app,
        "POST",
        "/api/permissions/check",
        Some(json!({
            "permissions": {"pages": "*", "actions": "*"},
            "resource": "anything",
            "action": "anything"
        })),
    )
    .await;
    assert_eq!(result["allowed"], json!(true));

    // Missing payload fails closed
    let (_, result) = send(
        &app,
        "POST",
        "/api/permissions/check",
        Some(json!({"resource": "leads", "action": "show"})),
    )
    .await;
    assert_eq!(result["allowed"], json!(false));
}
