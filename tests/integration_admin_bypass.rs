mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{body_json, test_app};
use gatehouse_models::tenancy::{OrgRole, TeamRole};

/// Org owners and admins may act on teams they are not members of; the
/// bypass covers membership only, never permissions.
fn seed(app: &common::TestApp) {
    let stores = &app.stores;
    stores.add_role(1, "task-writer", &["org:tasks:*"]);
    stores.add_role(2, "base", &["self:*:*"]);

    stores.add_team(10, 1, "backend");

    // owner of org 1, not a member of team 10, can write tasks
    stores.add_user(1, "owner");
    stores.grant_role(1, 1);
    stores.add_org_member(1, 1, OrgRole::Owner);

    // org admin, not a member of team 10, can write tasks
    stores.add_user(2, "admin");
    stores.grant_role(2, 1);
    stores.add_org_member(1, 2, OrgRole::Admin);

    // plain member, not a member of team 10, can write tasks
    stores.add_user(3, "member");
    stores.grant_role(3, 1);
    stores.add_org_member(1, 3, OrgRole::Member);

    // owner without the permission
    stores.add_user(4, "powerless-owner");
    stores.grant_role(4, 2);
    stores.add_org_member(1, 4, OrgRole::Owner);

    // team member sanity check
    stores.add_user(5, "insider");
    stores.grant_role(5, 1);
    stores.add_org_member(1, 5, OrgRole::Member);
    stores.add_team_member(10, 5, TeamRole::Member);
}

async fn create_task(app: &common::TestApp, token: &str) -> axum::response::Response {
    app.request(
        "POST",
        "/api/orgs/1/teams/10/tasks",
        Some(token),
        Some(json!({ "title": "task" })),
    )
    .await
}

#[tokio::test]
async fn test_org_owner_bypasses_team_membership() {
    let app = test_app();
    seed(&app);

    let response = create_task(&app, &app.token_for(1, "owner")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_org_admin_bypasses_team_membership() {
    let app = test_app();
    seed(&app);

    let response = create_task(&app, &app.token_for(2, "admin")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_plain_member_does_not_bypass() {
    let app = test_app();
    seed(&app);

    let response = create_task(&app, &app.token_for(3, "member")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = body_json(response).await;
    assert_eq!(body["error"], "You are not a member of this team");
}

#[tokio::test]
async fn test_bypass_does_not_extend_to_permissions() {
    let app = test_app();
    seed(&app);

    let response = create_task(&app, &app.token_for(4, "powerless-owner")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Insufficient permission");
}

#[tokio::test]
async fn test_team_member_still_passes() {
    let app = test_app();
    seed(&app);

    let response = create_task(&app, &app.token_for(5, "insider")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}
