use super::*;

#[derive(Debug, Deserialize)]
pub struct FieldAccessQuery {
    pub field: String,
    pub level: Option<String>,
}

pub async fn grant_settings_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(project_id): Path<String>,
    Json(payload): Json<GrantSettingsAccessRequest>,
) -> ApiResult<(StatusCode, Json<SettingsAccessResponse>)> {
    let input = payload.into_input(ProjectId::parse(project_id.as_str())?)?;

    let grant = state
        .access_grant_service
        .grant_settings_access(&user, input)
        .await?;

    Ok((StatusCode::CREATED, Json(SettingsAccessResponse::from(grant))))
}

pub async fn update_settings_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((project_id, user_id)): Path<(String, String)>,
    Json(payload): Json<UpdateSettingsAccessRequest>,
) -> ApiResult<Json<SettingsAccessResponse>> {
    let grant = state
        .access_grant_service
        .update_settings_access(
            &user,
            UserId::parse(user_id.as_str())?,
            ProjectId::parse(project_id.as_str())?,
            payload.into_changes()?,
        )
        .await?;

    Ok(Json(SettingsAccessResponse::from(grant)))
}

pub async fn revoke_settings_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((project_id, user_id)): Path<(String, String)>,
) -> ApiResult<Json<SettingsAccessResponse>> {
    let grant = state
        .access_grant_service
        .revoke_settings_access(
            &user,
            UserId::parse(user_id.as_str())?,
            ProjectId::parse(project_id.as_str())?,
        )
        .await?;

    Ok(Json(SettingsAccessResponse::from(grant)))
}

pub async fn apply_settings_template_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(project_id): Path<String>,
    Json(payload): Json<ApplySettingsTemplateRequest>,
) -> ApiResult<Json<SettingsAccessResponse>> {
    let (user_id, template) = payload.parse()?;

    let grant = state
        .access_grant_service
        .apply_settings_template(
            &user,
            template,
            user_id,
            ProjectId::parse(project_id.as_str())?,
        )
        .await?;

    Ok(Json(SettingsAccessResponse::from(grant)))
}

pub async fn list_settings_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<Vec<SettingsAccessResponse>>> {
    let grants = state
        .access_grant_service
        .list_settings_access_for_project(&user, ProjectId::parse(project_id.as_str())?)
        .await?
        .into_iter()
        .map(SettingsAccessResponse::from)
        .collect();

    Ok(Json(grants))
}

pub async fn my_settings_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<MySettingsAccessResponse>> {
    let summary = state
        .access_grant_service
        .my_settings_access(&user, ProjectId::parse(project_id.as_str())?)
        .await?;

    Ok(Json(MySettingsAccessResponse::from(summary)))
}

pub async fn check_field_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(project_id): Path<String>,
    Query(query): Query<FieldAccessQuery>,
) -> ApiResult<Json<FieldAccessCheckResponse>> {
    let field = SettingsField::from_str(query.field.as_str())?;
    let required_level = query
        .level
        .as_deref()
        .map(AccessLevel::from_str)
        .transpose()?
        .unwrap_or(AccessLevel::Read);

    let check = state
        .access_grant_service
        .check_field_access(
            &user,
            ProjectId::parse(project_id.as_str())?,
            field,
            required_level,
        )
        .await?;

    Ok(Json(FieldAccessCheckResponse::from(check)))
}

pub async fn list_settings_templates_handler() -> Json<Vec<SettingsTemplateResponse>> {
    Json(
        AccessGrantService::list_settings_templates()
            .iter()
            .copied()
            .map(SettingsTemplateResponse::from)
            .collect(),
    )
}
