use axum::Json;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;

use crate::dto::{
    AssignRoleRequest, CreateRoleRequest, RevokeRoleAssignmentRequest, RolePermissionRequest,
};
use crate::handlers::test_support::Fixture;

use super::assignments::assign_role_handler;
use super::audit::{AuditLogQuery, list_audit_log_handler};
use super::permissions::{PermissionCheckQuery, check_permission_handler, my_access_handler};
use super::roles::{RoleListQuery, create_role_handler, list_roles_handler};
use super::revoke_role_assignment_handler;

fn reviewer_role() -> CreateRoleRequest {
    CreateRoleRequest {
        name: "Data Reviewer".to_owned(),
        display_name: None,
        description: Some("Reviews submitted annotations".to_owned()),
        permissions: vec![RolePermissionRequest {
            permission_name: "review_annotations".to_owned(),
            permission_type: "write".to_owned(),
            resource: None,
            is_granted: None,
        }],
    }
}

fn assign(user_id: String) -> AssignRoleRequest {
    AssignRoleRequest {
        user_id,
        role_name: "data_reviewer".to_owned(),
        notes: None,
    }
}

#[tokio::test]
async fn allow_listed_super_admin_creates_roles() {
    let fixture = Fixture::new(&["root@example.com"]).await;
    let root = fixture.add_user("root@example.com", None).await;

    let created = create_role_handler(
        State(fixture.state.clone()),
        Extension(root.clone()),
        Json(reviewer_role()),
    )
    .await;
    assert!(matches!(created, Ok((StatusCode::CREATED, Json(ref role)))
        if role.name == "data_reviewer"
            && role.display_name == "Data Reviewer"
            && role.kind == "custom"
            && !role.is_system));

    let roles = list_roles_handler(
        State(fixture.state.clone()),
        Extension(root),
        Query(RoleListQuery {
            include_inactive: false,
        }),
    )
    .await;
    assert!(matches!(roles, Ok(Json(ref roles)) if roles.len() == 7));
}

#[tokio::test]
async fn regular_users_cannot_create_roles() {
    let fixture = Fixture::new(&[]).await;
    let user = fixture.add_user("someone@example.com", None).await;

    let result = create_role_handler(
        State(fixture.state.clone()),
        Extension(user),
        Json(reviewer_role()),
    )
    .await;

    assert!(matches!(result, Err(ref error) if error.status() == StatusCode::FORBIDDEN));
}

#[tokio::test]
async fn unknown_permission_type_is_a_bad_request() {
    let fixture = Fixture::new(&["root@example.com"]).await;
    let root = fixture.add_user("root@example.com", None).await;
    let mut request = reviewer_role();
    request.permissions[0].permission_type = "execute".to_owned();

    let result =
        create_role_handler(State(fixture.state.clone()), Extension(root), Json(request)).await;

    assert!(matches!(result, Err(ref error) if error.status() == StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn assignment_lifecycle_conflicts_then_reactivates() {
    let fixture = Fixture::new(&["root@example.com"]).await;
    let root = fixture.add_user("root@example.com", None).await;
    let member = fixture.add_user("member@example.com", None).await;
    let member_id = member.user_id().to_string();
    let created = create_role_handler(
        State(fixture.state.clone()),
        Extension(root.clone()),
        Json(reviewer_role()),
    )
    .await;
    assert!(created.is_ok());

    let first = assign_role_handler(
        State(fixture.state.clone()),
        Extension(root.clone()),
        Json(assign(member_id.clone())),
    )
    .await;
    let duplicate = assign_role_handler(
        State(fixture.state.clone()),
        Extension(root.clone()),
        Json(assign(member_id.clone())),
    )
    .await;
    let revoked = revoke_role_assignment_handler(
        State(fixture.state.clone()),
        Extension(root.clone()),
        Json(RevokeRoleAssignmentRequest {
            user_id: member_id.clone(),
            role_name: "Data-Reviewer".to_owned(),
        }),
    )
    .await;
    let again = assign_role_handler(
        State(fixture.state.clone()),
        Extension(root),
        Json(assign(member_id)),
    )
    .await;

    assert!(matches!(first, Ok((StatusCode::CREATED, Json(ref response)))
        if response.outcome == "created"));
    assert!(matches!(duplicate, Err(ref error) if error.status() == StatusCode::CONFLICT));
    assert!(matches!(revoked, Ok(Json(ref assignment)) if !assignment.is_active));
    assert!(matches!(again, Ok((_, Json(ref response)))
        if response.outcome == "reactivated" && response.assignment.is_active));
}

#[tokio::test]
async fn my_permissions_follow_active_assignments() {
    let fixture = Fixture::new(&["root@example.com"]).await;
    let root = fixture.add_user("root@example.com", None).await;
    let member = fixture.add_user("member@example.com", None).await;
    let member_id = member.user_id().to_string();
    let check = |permission: &str| {
        Query(PermissionCheckQuery {
            permission: permission.to_owned(),
            resource: None,
        })
    };
    let created = create_role_handler(
        State(fixture.state.clone()),
        Extension(root.clone()),
        Json(reviewer_role()),
    )
    .await;
    let assigned = assign_role_handler(
        State(fixture.state.clone()),
        Extension(root.clone()),
        Json(assign(member_id.clone())),
    )
    .await;
    assert!(created.is_ok() && assigned.is_ok());

    let access = my_access_handler(State(fixture.state.clone()), Extension(member.clone())).await;
    let granted = check_permission_handler(
        State(fixture.state.clone()),
        Extension(member.clone()),
        check("review_annotations"),
    )
    .await;
    let unknown = check_permission_handler(
        State(fixture.state.clone()),
        Extension(member.clone()),
        check("delete_projects"),
    )
    .await;
    let revoked = revoke_role_assignment_handler(
        State(fixture.state.clone()),
        Extension(root),
        Json(RevokeRoleAssignmentRequest {
            user_id: member_id,
            role_name: "data_reviewer".to_owned(),
        }),
    )
    .await;
    let after_revoke = check_permission_handler(
        State(fixture.state.clone()),
        Extension(member.clone()),
        check("review_annotations"),
    )
    .await;
    let blank = check_permission_handler(
        State(fixture.state.clone()),
        Extension(member),
        check(" "),
    )
    .await;

    assert!(matches!(access, Ok(Json(ref response)) if response.email == "member@example.com"
        && response.roles.len() == 1
        && response.roles[0].name == "data_reviewer"
        && response.roles[0].permissions.len() == 1));
    assert!(matches!(granted, Ok(Json(ref response)) if response.has_permission
        && response.permission == "review_annotations"
        && response.resource.is_empty()));
    assert!(matches!(unknown, Ok(Json(ref response)) if !response.has_permission));
    assert!(revoked.is_ok());
    assert!(matches!(after_revoke, Ok(Json(ref response)) if !response.has_permission));
    assert!(matches!(blank, Err(ref error) if error.status() == StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn audit_log_is_admin_only_and_newest_first() {
    let fixture = Fixture::new(&["root@example.com"]).await;
    let root = fixture.add_user("root@example.com", None).await;
    let member = fixture.add_user("member@example.com", None).await;
    let created = create_role_handler(
        State(fixture.state.clone()),
        Extension(root.clone()),
        Json(reviewer_role()),
    )
    .await;
    assert!(created.is_ok());
    let assigned = assign_role_handler(
        State(fixture.state.clone()),
        Extension(root.clone()),
        Json(assign(member.user_id().to_string())),
    )
    .await;
    assert!(assigned.is_ok());

    let query = || {
        Query(AuditLogQuery {
            limit: None,
            offset: None,
            action: None,
            actor_id: None,
        })
    };
    let as_root =
        list_audit_log_handler(State(fixture.state.clone()), Extension(root), query()).await;
    let as_member =
        list_audit_log_handler(State(fixture.state.clone()), Extension(member), query()).await;

    assert!(matches!(as_root, Ok(Json(ref entries)) if entries.len() == 2
        && entries[0].action == "role.assigned"
        && entries[1].action == "role.created"));
    assert!(matches!(as_member, Err(ref error) if error.status() == StatusCode::FORBIDDEN));
}
