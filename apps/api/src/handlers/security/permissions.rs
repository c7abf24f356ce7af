use super::*;

#[derive(Debug, Deserialize)]
pub struct PermissionCheckQuery {
    pub permission: String,
    pub resource: Option<String>,
}

pub async fn my_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<MyAccessResponse>> {
    let roles = state.security_admin_service.my_access(&user).await?;

    Ok(Json(MyAccessResponse::new(&user, roles)))
}

pub async fn check_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<PermissionCheckQuery>,
) -> ApiResult<Json<PermissionCheckResponse>> {
    let resource = query.resource.unwrap_or_default();
    let has_permission = state
        .security_admin_service
        .check_permission(&user, query.permission.as_str(), resource.as_str())
        .await?;

    Ok(Json(PermissionCheckResponse {
        permission: query.permission.trim().to_owned(),
        resource: resource.trim().to_owned(),
        has_permission,
    }))
}
