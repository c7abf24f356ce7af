use super::*;

#[derive(Debug, Deserialize)]
pub struct RoleListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<RoleListQuery>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .security_admin_service
        .list_roles(&user, query.include_inactive)
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let permissions = parse_permissions(payload.permissions)?;

    let role = state
        .security_admin_service
        .create_role(
            &user,
            CreateRoleInput {
                name: payload.name,
                display_name: payload.display_name,
                description: payload.description.unwrap_or_default(),
                permissions,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn set_role_active_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_name): Path<String>,
    Json(payload): Json<SetRoleActiveRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .security_admin_service
        .set_role_active(&user, role_name.as_str(), payload.is_active)
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn list_role_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_name): Path<String>,
) -> ApiResult<Json<Vec<RolePermissionResponse>>> {
    let permissions = state
        .security_admin_service
        .list_role_permissions(&user, role_name.as_str())
        .await?
        .into_iter()
        .map(RolePermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn set_role_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_name): Path<String>,
    Json(payload): Json<SetRolePermissionsRequest>,
) -> ApiResult<Json<Vec<RolePermissionResponse>>> {
    let permissions = parse_permissions(payload.permissions)?;

    let stored = state
        .security_admin_service
        .set_role_permissions(&user, role_name.as_str(), permissions)
        .await?
        .into_iter()
        .map(RolePermissionResponse::from)
        .collect();

    Ok(Json(stored))
}
