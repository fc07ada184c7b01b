mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

use common::{body_json, test_app};
use gatehouse_models::audit::AuditRecord;
use gatehouse_models::tenancy::{OrgRole, TeamRole};

fn seed(app: &common::TestApp) {
    let stores = &app.stores;
    stores.add_role(1, "task-writer", &["org:tasks:*", "self:*:*"]);
    stores.add_role(2, "administrator", &["admin:*:*", "self:*:*"]);

    stores.add_team(10, 1, "backend");

    stores.add_user(1, "alice");
    stores.grant_role(1, 1);
    stores.add_org_member(1, 1, OrgRole::Member);
    stores.add_team_member(10, 1, TeamRole::Member);

    stores.add_user(2, "root");
    stores.grant_role(2, 2);
}

/// Persistence is asynchronous; poll until the predicate matches or give up.
async fn wait_for_records<F>(app: &common::TestApp, predicate: F) -> Vec<AuditRecord>
where
    F: Fn(&[AuditRecord]) -> bool,
{
    for _ in 0..50 {
        let records = app.stores.audit_records();
        if predicate(&records) {
            return records;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    app.stores.audit_records()
}

#[tokio::test]
async fn test_audited_write_produces_one_record() {
    let app = test_app();
    seed(&app);
    let token = app.token_for(1, "alice");

    let response = app
        .request(
            "POST",
            "/api/orgs/1/teams/10/tasks",
            Some(&token),
            Some(json!({ "title": "audit me" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let records = wait_for_records(&app, |r| !r.is_empty()).await;
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.user_id, 1);
    assert_eq!(record.username, "alice");
    assert_eq!(record.operation, "org:tasks:create");
    assert_eq!(record.action, "create");
    assert_eq!(record.resource, "tasks");
    assert_eq!(record.resource_id.as_deref(), Some("1"));
    assert!(record.request_id.is_some());

    let details = record.details.as_ref().unwrap();
    assert_eq!(details["method"], "POST");
    assert_eq!(details["body"]["title"], "audit me");
    assert!(details["latency_ms"].is_u64());
}

#[tokio::test]
async fn test_body_captured_with_declared_content_length() {
    let app = test_app();
    seed(&app);
    let token = app.token_for(1, "alice");

    let payload = serde_json::to_string(&json!({ "title": "sized" })).unwrap();
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/orgs/1/teams/10/tasks")
        .header(axum::http::header::AUTHORIZATION, format!("Bearer {token}"))
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .header(axum::http::header::CONTENT_LENGTH, payload.len())
        .body(axum::body::Body::from(payload))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let records = wait_for_records(&app, |r| !r.is_empty()).await;
    let details = records[0].details.as_ref().unwrap();
    assert_eq!(details["body"]["title"], "sized");
}

#[tokio::test]
async fn test_oversized_body_is_omitted_from_record() {
    let app = test_app();
    seed(&app);
    let token = app.token_for(1, "alice");

    // Over the snapshot cap: the record is still written, without a body.
    app.request(
        "POST",
        "/api/orgs/1/teams/10/tasks",
        Some(&token),
        Some(json!({ "title": "big", "notes": "x".repeat(12 * 1024) })),
    )
    .await;

    let records = wait_for_records(&app, |r| !r.is_empty()).await;
    assert_eq!(records.len(), 1);
    let details = records[0].details.as_ref().unwrap();
    assert!(details.get("body").is_none());
}

#[tokio::test]
async fn test_sensitive_fields_are_redacted() {
    let app = test_app();
    seed(&app);
    let token = app.token_for(1, "alice");

    // Unknown fields pass deserialization; the capture still sees them.
    let response = app
        .request(
            "POST",
            "/api/orgs/1/teams/10/tasks",
            Some(&token),
            Some(json!({ "title": "x", "password": "hunter2", "api_token": "abc" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let records = wait_for_records(&app, |r| !r.is_empty()).await;
    let details = records[0].details.as_ref().unwrap();
    assert_eq!(details["body"]["password"], "[REDACTED]");
    assert_eq!(details["body"]["api_token"], "[REDACTED]");
    assert_eq!(details["body"]["title"], "x");
}

#[tokio::test]
async fn test_unaudited_reads_leave_no_record() {
    let app = test_app();
    seed(&app);
    let token = app.token_for(1, "alice");

    let response = app
        .request("GET", "/api/orgs/1/teams/10/tasks", Some(&token), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(app.stores.audit_records().is_empty());
}

#[tokio::test]
async fn test_failed_audited_write_records_failure() {
    let app = test_app();
    seed(&app);
    let token = app.token_for(1, "alice");

    // Validation failure: the handler never runs, the capture still records.
    let response = app
        .request(
            "POST",
            "/api/orgs/1/teams/10/tasks",
            Some(&token),
            Some(json!({ "title": "" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let records = wait_for_records(&app, |r| !r.is_empty()).await;
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].status,
        gatehouse_models::audit::AuditStatus::Failure
    );
}

#[tokio::test]
async fn test_user_deletion_records_http_and_event() {
    let app = test_app();
    seed(&app);
    let token = app.token_for(2, "root");

    let response = app.request("DELETE", "/api/users/1", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The HTTP capture and the wildcard event subscriber each record once.
    let records = wait_for_records(&app, |r| r.len() >= 2).await;
    assert_eq!(records.len(), 2);
    assert!(
        records
            .iter()
            .any(|r| r.operation == "admin:users:delete" && r.resource_id.as_deref() == Some("1"))
    );
    assert!(records.iter().any(|r| r.operation == "user.deleted"));
}

#[tokio::test]
async fn test_audit_listing_endpoint() {
    let app = test_app();
    seed(&app);
    let alice = app.token_for(1, "alice");
    let root = app.token_for(2, "root");

    let response = app
        .request(
            "POST",
            "/api/orgs/1/teams/10/tasks",
            Some(&alice),
            Some(json!({ "title": "listed" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    wait_for_records(&app, |r| !r.is_empty()).await;

    let response = app.request("GET", "/api/audit", Some(&root), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let records = body.as_array().unwrap();
    assert!(records.iter().any(|r| r["operation"] == "org:tasks:create"));

    // alice cannot read the audit trail
    let response = app.request("GET", "/api/audit", Some(&alice), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
