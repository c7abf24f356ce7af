use super::*;

pub async fn grant_project_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(project_id): Path<String>,
    Json(payload): Json<GrantProjectAccessRequest>,
) -> ApiResult<(StatusCode, Json<ProjectAccessResponse>)> {
    let input = payload.into_input(ProjectId::parse(project_id.as_str())?)?;

    let grant = state
        .access_grant_service
        .grant_project_access(&user, input)
        .await?;

    Ok((StatusCode::CREATED, Json(ProjectAccessResponse::from(grant))))
}

pub async fn revoke_project_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(project_id): Path<String>,
    Json(payload): Json<RevokeProjectAccessRequest>,
) -> ApiResult<Json<ProjectAccessResponse>> {
    let grant = state
        .access_grant_service
        .revoke_project_access(
            &user,
            UserId::parse(payload.user_id.as_str())?,
            ProjectId::parse(project_id.as_str())?,
        )
        .await?;

    Ok(Json(ProjectAccessResponse::from(grant)))
}

pub async fn list_project_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<Vec<ProjectAccessResponse>>> {
    let grants = state
        .access_grant_service
        .list_project_access_for_project(&user, ProjectId::parse(project_id.as_str())?)
        .await?
        .into_iter()
        .map(ProjectAccessResponse::from)
        .collect();

    Ok(Json(grants))
}

pub async fn list_user_project_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<ProjectAccessResponse>>> {
    let grants = state
        .access_grant_service
        .list_project_access_for_user(&user, UserId::parse(user_id.as_str())?)
        .await?
        .into_iter()
        .map(ProjectAccessResponse::from)
        .collect();

    Ok(Json(grants))
}
