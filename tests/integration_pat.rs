mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};

use common::{body_json, test_app};
use gatehouse_auth::{PatScope, hash_token};
use gatehouse_models::pats::PatRecord;

fn pat_record(id: i64, user_id: i64, username: &str, scopes: Vec<PatScope>) -> PatRecord {
    PatRecord {
        id,
        user_id,
        username: username.to_string(),
        name: "ci-token".to_string(),
        scopes,
        expires_at: None,
        revoked_at: None,
    }
}

fn seed_admin(app: &common::TestApp) {
    app.stores
        .add_role(1, "administrator", &["admin:*:*", "self:*:*"]);
    app.stores.add_user(1, "root");
    app.stores.grant_role(1, 1);
}

#[tokio::test]
async fn test_full_scope_pat_keeps_all_permissions() {
    let app = test_app();
    seed_admin(&app);

    let token = "pat_full_scope_token";
    app.stores.add_pat(
        &hash_token(token),
        pat_record(1, 1, "root", vec![PatScope::Full]),
    );

    let response = app.request("GET", "/api/users", Some(token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_scoped_pat_cannot_reach_other_scopes() {
    let app = test_app();
    seed_admin(&app);

    // The user holds admin:*:*, but the token is limited to org routes.
    let token = "pat_org_only_token";
    app.stores.add_pat(
        &hash_token(token),
        pat_record(1, 1, "root", vec![PatScope::Org]),
    );

    let response = app.request("GET", "/api/users", Some(token), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Insufficient permission");
}

#[tokio::test]
async fn test_pat_principal_reports_pat_auth_type() {
    let app = test_app();
    seed_admin(&app);

    let token = "pat_self_scope_token";
    app.stores.add_pat(
        &hash_token(token),
        pat_record(1, 1, "root", vec![PatScope::SelfScope]),
    );

    let response = app.request("GET", "/api/profile", Some(token), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["auth_type"], "pat");
    assert_eq!(body["username"], "root");
    // admin:*:* was filtered out by the self-only scope
    assert!(
        body["permissions"]
            .as_array()
            .unwrap()
            .iter()
            .all(|p| p.as_str().unwrap().starts_with("self:"))
    );
}

#[tokio::test]
async fn test_expired_pat_is_401() {
    let app = test_app();
    seed_admin(&app);

    let token = "pat_expired_token";
    let mut record = pat_record(1, 1, "root", vec![PatScope::Full]);
    record.expires_at = Some(Utc::now() - Duration::hours(1));
    app.stores.add_pat(&hash_token(token), record);

    let response = app.request("GET", "/api/users", Some(token), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Authentication required");
}

#[tokio::test]
async fn test_revoked_pat_is_401() {
    let app = test_app();
    seed_admin(&app);

    let token = "pat_revoked_token";
    let mut record = pat_record(1, 1, "root", vec![PatScope::Full]);
    record.revoked_at = Some(Utc::now());
    app.stores.add_pat(&hash_token(token), record);

    let response = app.request("GET", "/api/users", Some(token), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_pat_is_401() {
    let app = test_app();
    seed_admin(&app);

    let response = app
        .request("GET", "/api/users", Some("pat_never_issued"), None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
