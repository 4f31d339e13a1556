mod common;

use linkdash::api::dto::link::LinkResponse;
use linkdash::domain::entities::{LinkStatus, RedirectType};
use serde_json::{Value, json};

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[tokio::test]
async fn test_status_change_requires_token() {
    let app = common::spawn_app();
    let link = common::create_link(
        &app.state,
        "https://example.com",
        RedirectType::Direct,
        None,
        None,
    )
    .await;

    let response = app
        .server
        .put(&format!("/api/admin/links/{}/status", link.id))
        .json(&json!({ "status": "suspended" }))
        .await;

    assert_eq!(response.status_code(), 401);
    assert_eq!(response.header("www-authenticate"), "Bearer");

    let stored = app.state.link_service.get_link(link.id).await.unwrap();
    assert_eq!(stored.status, LinkStatus::Active);
}

#[tokio::test]
async fn test_status_change_rejects_wrong_token() {
    let app = common::spawn_app();
    let link = common::create_link(
        &app.state,
        "https://example.com",
        RedirectType::Direct,
        None,
        None,
    )
    .await;

    let response = app
        .server
        .put(&format!("/api/admin/links/{}/status", link.id))
        .add_header("authorization", bearer("not-the-token"))
        .json(&json!({ "status": "suspended" }))
        .await;

    assert_eq!(response.status_code(), 401);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn test_suspend_and_reactivate() {
    let app = common::spawn_app();
    let link = common::create_link(
        &app.state,
        "https://example.com",
        RedirectType::Direct,
        Some("flagged"),
        None,
    )
    .await;
    let path = format!("/api/admin/links/{}/status", link.id);

    let suspended = app
        .server
        .put(&path)
        .add_header("authorization", bearer(common::ADMIN_TOKEN))
        .json(&json!({ "status": "suspended" }))
        .await;

    assert_eq!(suspended.status_code(), 200);
    let body: LinkResponse = suspended.json();
    assert_eq!(body.status, LinkStatus::Suspended);
    assert_eq!(app.server.get("/flagged").await.status_code(), 410);

    let reactivated = app
        .server
        .put(&path)
        .add_header("authorization", bearer(common::ADMIN_TOKEN))
        .json(&json!({ "status": "active" }))
        .await;

    assert_eq!(reactivated.status_code(), 200);
    assert_eq!(app.server.get("/flagged").await.status_code(), 307);
}

#[tokio::test]
async fn test_deleted_link_cannot_be_restored() {
    let app = common::spawn_app();
    let link = common::create_link(
        &app.state,
        "https://example.com",
        RedirectType::Direct,
        None,
        None,
    )
    .await;
    common::set_status(&app.state, &link, LinkStatus::Deleted).await;

    let response = app
        .server
        .put(&format!("/api/admin/links/{}/status", link.id))
        .add_header("authorization", bearer(common::ADMIN_TOKEN))
        .json(&json!({ "status": "active" }))
        .await;

    assert_eq!(response.status_code(), 409);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "invalid_transition");
    assert_eq!(body["error"]["details"]["from"], "deleted");
}

#[tokio::test]
async fn test_status_change_unknown_link() {
    let app = common::spawn_app();

    let response = app
        .server
        .put(&format!("/api/admin/links/{}/status", uuid::Uuid::new_v4()))
        .add_header("authorization", bearer(common::ADMIN_TOKEN))
        .json(&json!({ "status": "suspended" }))
        .await;

    assert_eq!(response.status_code(), 404);
}
