use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Query, State};
use serde::Deserialize;

use labelgate_core::{ProjectId, UserId, UserIdentity};
use labelgate_domain::{AccessLevel, Resource, SettingsField};

use crate::dto::{AuthorizeRequest, AuthorizeResponse, ProjectResponse};
use crate::error::ApiResult;
use crate::state::AppState;


pub async fn authorize_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<AuthorizeRequest>,
) -> ApiResult<Json<AuthorizeResponse>> {
    let project_id = ProjectId::parse(payload.project_id.as_str())?;
    let resource = match payload.settings_field.as_deref() {
        Some(field) => Resource::project_settings(project_id, SettingsField::from_str(field)?),
        None => Resource::project(project_id),
    };
    let target = payload
        .user_id
        .as_deref()
        .map(UserId::parse)
        .transpose()?;
    let level = AccessLevel::from_str(payload.level.as_str())?;

    let decision = state
        .authorization_service
        .check_access(&user, target, resource, level)
        .await?;

    Ok(Json(AuthorizeResponse::from(decision)))
}

#[derive(Debug, Deserialize)]
pub struct ProjectListQuery {
    pub level: Option<String>,
}

pub async fn list_projects_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<ProjectListQuery>,
) -> ApiResult<Json<Vec<ProjectResponse>>> {
    let level = query
        .level
        .as_deref()
        .map(AccessLevel::from_str)
        .transpose()?
        .unwrap_or(AccessLevel::Read);

    let projects = state
        .authorization_service
        .list_accessible_projects(&user, level)
        .await?
        .into_iter()
        .map(ProjectResponse::from)
        .collect();

    Ok(Json(projects))
}
