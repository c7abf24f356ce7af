use super::*;

#[derive(Debug, Deserialize)]
pub struct UserAssignmentsQuery {
    pub active_only: Option<bool>,
}

pub async fn assign_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<AssignRoleRequest>,
) -> ApiResult<(StatusCode, Json<AssignRoleResponse>)> {
    let result = state
        .security_admin_service
        .assign_role(
            &user,
            AssignRoleInput {
                user_id: UserId::parse(payload.user_id.as_str())?,
                role_name: payload.role_name,
                notes: payload.notes,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(AssignRoleResponse::from(result))))
}

pub async fn revoke_role_assignment_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<RevokeRoleAssignmentRequest>,
) -> ApiResult<Json<RoleAssignmentResponse>> {
    let assignment = state
        .security_admin_service
        .revoke_assignment(
            &user,
            UserId::parse(payload.user_id.as_str())?,
            payload.role_name.as_str(),
        )
        .await?;

    Ok(Json(RoleAssignmentResponse::from(assignment)))
}

pub async fn list_user_role_assignments_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
    Query(query): Query<UserAssignmentsQuery>,
) -> ApiResult<Json<Vec<RoleAssignmentResponse>>> {
    let assignments = state
        .security_admin_service
        .list_assignments_for_user(
            &user,
            UserId::parse(user_id.as_str())?,
            query.active_only.unwrap_or(true),
        )
        .await?
        .into_iter()
        .map(RoleAssignmentResponse::from)
        .collect();

    Ok(Json(assignments))
}

pub async fn list_role_assignments_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_name): Path<String>,
) -> ApiResult<Json<Vec<RoleAssignmentResponse>>> {
    let assignments = state
        .security_admin_service
        .list_assignments_for_role(&user, role_name.as_str())
        .await?
        .into_iter()
        .map(RoleAssignmentResponse::from)
        .collect();

    Ok(Json(assignments))
}
