//! HTTP-level tests for the Rhyzome server.
//!
//! Drive the real router with in-memory state: token issuance, bearer-token
//! gating, single use, and each route's contract.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rhyzome_core::Store;
use rhyzome_server::{build_router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

const ADMIN_PASSWORD: &str = "test-admin-password";

// ── Helpers ─────────────────────────────────────────────────────

fn test_app() -> Router {
    let store = Store::memory().expect("in-memory store");
    build_router(AppState::new(store, ADMIN_PASSWORD))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(
            |_| json!({ "raw": String::from_utf8_lossy(&bytes).to_string() }),
        )
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("DELETE").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn issue_token(app: &Router, permissions: &[&str]) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/tokens",
            None,
            json!({ "password": ADMIN_PASSWORD, "permissions": permissions }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "token issuance failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

async fn create_microblog(app: &Router, text: &str) -> String {
    let token = issue_token(app, &["create_microblog"]).await;
    let (status, body) = send(
        app,
        json_request("POST", "/microblogs", Some(&token), json!({ "text": text })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

// ── Tests ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_health_no_auth() {
    let app = test_app();
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_end_to_end_create_then_reuse_rejected() {
    let app = test_app();
    let token = issue_token(&app, &["create_microblog"]).await;

    let (status, body) = send(
        &app,
        json_request("POST", "/microblogs", Some(&token), json!({ "text": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();

    let (status, all) = send(&app, get("/microblogs/all")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(all.as_array().unwrap().contains(&json!("hello")));

    let (status, index) = send(&app, get("/microblogs")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(index
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["to_id"] == id && r["from_id"] == "microblog" && r["name"] == "microblog"));

    let (status, _) = send(
        &app,
        json_request("POST", "/microblogs", Some(&token), json!({ "text": "again" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, all) = send(&app, get("/microblogs/all")).await;
    assert!(!all.as_array().unwrap().contains(&json!("again")));
}

#[tokio::test]
async fn test_token_issuance_requires_admin_password() {
    let app = test_app();
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/tokens",
            None,
            json!({ "password": "wrong", "permissions": ["create_microblog"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn test_create_requires_bearer_token() {
    let app = test_app();

    let (status, _) = send(
        &app,
        json_request("POST", "/microblogs", None, json!({ "text": "anon" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        json_request("POST", "/microblogs", Some("made-up"), json!({ "text": "anon" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_permission_does_not_spend_token() {
    let app = test_app();
    let token = issue_token(&app, &["create_microblog"]).await;

    let (status, _) = send(&app, delete("/microblogs/anything", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        json_request("POST", "/microblogs", Some(&token), json!({ "text": "still valid" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_get_and_delete_microblog() {
    let app = test_app();
    let id = create_microblog(&app, "short-lived").await;

    let (status, body) = send(&app, get(&format!("/microblogs/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": id, "text": "short-lived" }));

    let token = issue_token(&app, &["delete_microblog"]).await;
    let (status, _) = send(&app, delete(&format!("/microblogs/{id}"), Some(&token))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, get(&format!("/microblogs/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_unknown_microblog_is_404() {
    let app = test_app();
    let (status, body) = send(&app, get("/microblogs/does-not-exist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("does-not-exist"));
}

#[tokio::test]
async fn test_relations_create_list_and_broad_delete() {
    let app = test_app();
    let a = create_microblog(&app, "a").await;
    let b = create_microblog(&app, "b").await;

    for (from, to) in [(&a, &b), (&b, &a)] {
        let token = issue_token(&app, &["create_relation"]).await;
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                &format!("/microblogs/{from}/relations/likes"),
                Some(&token),
                json!({ "related_id": to }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({ "name": "likes", "from_id": from, "to_id": to })
        );
    }

    let (status, rels) = send(&app, get(&format!("/microblogs/{a}/relations"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        rels,
        json!([{ "name": "likes", "from_id": a, "to_id": b }])
    );

    // Deleting through `a` removes `b`'s "likes" edge too.
    let token = issue_token(&app, &["delete_relation"]).await;
    let (status, _) = send(
        &app,
        delete(&format!("/microblogs/{a}/relations/likes"), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    for id in [&a, &b] {
        let (_, rels) = send(&app, get(&format!("/microblogs/{id}/relations"))).await;
        assert_eq!(rels, json!([]));
    }
}

#[tokio::test]
async fn test_walk_follows_relations() {
    let app = test_app();
    let a = create_microblog(&app, "a").await;
    let b = create_microblog(&app, "b").await;

    let token = issue_token(&app, &["create_relation"]).await;
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            &format!("/microblogs/{a}/relations/replies"),
            Some(&token),
            json!({ "related_id": b }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, get(&format!("/microblogs/{a}/walk?order=dfs"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"], "dfs");
    assert_eq!(body["ids"], json!([a, b]));

    let (_, body) = send(&app, get(&format!("/microblogs/{a}/walk"))).await;
    assert_eq!(body["order"], "bfs");
}

#[tokio::test]
async fn test_malformed_body_is_rejected_before_authorization() {
    let app = test_app();
    let token = issue_token(&app, &["create_microblog"]).await;

    let (status, _) = send(
        &app,
        json_request("POST", "/microblogs", Some(&token), json!({ "body": "wrong field" })),
    )
    .await;
    assert!(status.is_client_error());
    assert_ne!(status, StatusCode::UNAUTHORIZED);

    // The token was never presented to the gate.
    let (status, _) = send(
        &app,
        json_request("POST", "/microblogs", Some(&token), json!({ "text": "ok" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_concurrent_requests_spend_token_once() {
    let app = test_app();
    let token = issue_token(&app, &["create_microblog"]).await;

    let mut tasks = Vec::new();
    for i in 0..16 {
        let app = app.clone();
        let token = token.clone();
        tasks.push(tokio::spawn(async move {
            let req = json_request(
                "POST",
                "/microblogs",
                Some(&token),
                json!({ "text": format!("racer {i}") }),
            );
            send(&app, req).await.0
        }));
    }

    let mut created = 0;
    for task in tasks {
        if task.await.unwrap() == StatusCode::CREATED {
            created += 1;
        }
    }
    assert_eq!(created, 1);

    let (_, all) = send(&app, get("/microblogs/all")).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_storage_failure_is_500_with_generic_body() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.db");
    let app = build_router(AppState::new(Store::open(&path).unwrap(), ADMIN_PASSWORD));
    let token = issue_token(&app, &["create_microblog"]).await;

    rusqlite::Connection::open(&path)
        .unwrap()
        .execute_batch("DROP TABLE nodes")
        .unwrap();

    let (status, body) = send(&app, get("/microblogs/all")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "internal storage error" }));

    let (status, body) = send(
        &app,
        json_request("POST", "/microblogs", Some(&token), json!({ "text": "lost" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.to_string().contains("nodes"));

    // The token was spent before the write failed.
    let (status, _) = send(
        &app,
        json_request("POST", "/microblogs", Some(&token), json!({ "text": "retry" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
