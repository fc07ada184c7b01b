mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{body_json, test_app};
use gatehouse_core::events::{DomainEvent, topics};

fn seed(app: &common::TestApp) {
    app.stores.add_role(1, "base", &["self:*:*"]);
    app.stores.add_role(2, "user-admin", &["admin:users:*", "self:*:*"]);
    app.stores.add_user(7, "grace");
    app.stores.grant_role(7, 1);
}

#[tokio::test]
async fn test_stale_grant_is_invisible_without_invalidation() {
    let app = test_app();
    seed(&app);
    let token = app.token_for(7, "grace");

    // First request populates the cache with the base role only.
    let response = app.request("GET", "/api/users", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // A grant written behind the cache's back stays invisible.
    app.stores.grant_role(7, 2);
    let response = app.request("GET", "/api/users", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_role_assigned_event_evicts_cached_permissions() {
    let app = test_app();
    seed(&app);
    let token = app.token_for(7, "grace");

    let response = app.request("GET", "/api/users", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    app.stores.grant_role(7, 2);
    app.state.events.publish(&DomainEvent::new(
        topics::USER_ROLE_ASSIGNED,
        Some(7),
        json!({ "role_id": 2 }),
    ));

    let response = app.request("GET", "/api/users", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_permissions_changed_event_evicts_too() {
    let app = test_app();
    seed(&app);
    let token = app.token_for(7, "grace");

    let response = app.request("GET", "/api/users", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    app.stores
        .add_role(1, "base", &["self:*:*", "admin:users:list"]);
    app.state.events.publish(&DomainEvent::new(
        topics::ROLE_PERMISSIONS_CHANGED,
        Some(7),
        json!({ "role_id": 1 }),
    ));

    let response = app.request("GET", "/api/users", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_role_assignment_endpoint_invalidates_end_to_end() {
    let app = test_app();
    seed(&app);
    app.stores.add_role(3, "administrator", &["admin:*:*", "self:*:*"]);
    app.stores.add_user(1, "root");
    app.stores.grant_role(1, 3);

    let root_token = app.token_for(1, "root");
    let grace_token = app.token_for(7, "grace");

    // grace is cached without the grant.
    let response = app
        .request("GET", "/api/users", Some(&grace_token), None)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // root assigns the role through the API, which publishes the event.
    let response = app
        .request("POST", "/api/users/7/roles/2", Some(&root_token), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .request("GET", "/api/users", Some(&grace_token), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body.as_array().unwrap().iter().any(|u| u["username"] == "grace"));
}

#[tokio::test]
async fn test_user_deleted_event_drops_cache_entry() {
    let app = test_app();
    seed(&app);
    let token = app.token_for(7, "grace");

    let response = app.request("GET", "/api/profile", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.state.permissions.cache().len(), 1);

    app.state.events.publish(&DomainEvent::new(
        topics::USER_DELETED,
        Some(7),
        json!({}),
    ));
    assert_eq!(app.state.permissions.cache().len(), 0);
}
