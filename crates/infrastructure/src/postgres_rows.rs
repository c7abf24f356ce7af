use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use labelgate_application::{ProjectAccessGrant, SettingsAccessGrant};
use labelgate_core::{AppError, AppResult, ProjectId, UserId};
use labelgate_domain::{AccessLevel, RoleName, SettingsAccessLevels};

/// Column list shared by every `project_access` select.
pub(crate) const PROJECT_ACCESS_COLUMNS: &str = r#"
    id AS grant_id,
    user_id,
    project_id,
    access_level,
    granted_by,
    granted_at,
    expires_at,
    is_active
"#;

/// Column list shared by every `project_settings_access` select.
pub(crate) const SETTINGS_ACCESS_COLUMNS: &str = r#"
    id AS grant_id,
    user_id,
    project_id,
    general_access,
    labeling_interface_access,
    annotation_access,
    model_access,
    predictions_access,
    cloud_storage_access,
    webhooks_access,
    danger_zone_access,
    granted_by,
    granted_at,
    expires_at,
    is_active,
    notes
"#;

#[derive(Debug, FromRow)]
pub(crate) struct ProjectAccessRow {
    grant_id: Uuid,
    user_id: Uuid,
    project_id: Uuid,
    access_level: String,
    granted_by: Option<Uuid>,
    granted_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    is_active: bool,
}

impl TryFrom<ProjectAccessRow> for ProjectAccessGrant {
    type Error = AppError;

    fn try_from(row: ProjectAccessRow) -> AppResult<Self> {
        Ok(Self {
            grant_id: row.grant_id,
            user_id: UserId::from_uuid(row.user_id),
            project_id: ProjectId::from_uuid(row.project_id),
            access_level: stored_level(row.access_level.as_str())?,
            granted_by: row.granted_by.map(UserId::from_uuid),
            granted_at: row.granted_at,
            expires_at: row.expires_at,
            is_active: row.is_active,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct SettingsAccessRow {
    grant_id: Uuid,
    user_id: Uuid,
    project_id: Uuid,
    general_access: String,
    labeling_interface_access: String,
    annotation_access: String,
    model_access: String,
    predictions_access: String,
    cloud_storage_access: String,
    webhooks_access: String,
    danger_zone_access: String,
    granted_by: Option<Uuid>,
    granted_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    is_active: bool,
    notes: String,
}

impl TryFrom<SettingsAccessRow> for SettingsAccessGrant {
    type Error = AppError;

    fn try_from(row: SettingsAccessRow) -> AppResult<Self> {
        Ok(Self {
            grant_id: row.grant_id,
            user_id: UserId::from_uuid(row.user_id),
            project_id: ProjectId::from_uuid(row.project_id),
            levels: SettingsAccessLevels {
                general: stored_level(row.general_access.as_str())?,
                labeling_interface: stored_level(row.labeling_interface_access.as_str())?,
                annotation: stored_level(row.annotation_access.as_str())?,
                model: stored_level(row.model_access.as_str())?,
                predictions: stored_level(row.predictions_access.as_str())?,
                cloud_storage: stored_level(row.cloud_storage_access.as_str())?,
                webhooks: stored_level(row.webhooks_access.as_str())?,
                danger_zone: stored_level(row.danger_zone_access.as_str())?,
            },
            granted_by: row.granted_by.map(UserId::from_uuid),
            granted_at: row.granted_at,
            expires_at: row.expires_at,
            is_active: row.is_active,
            notes: row.notes,
        })
    }
}

fn stored_level(value: &str) -> AppResult<AccessLevel> {
    AccessLevel::from_str(value).map_err(|error| {
        AppError::Internal(format!("invalid access level persisted in storage: {error}"))
    })
}

pub(crate) fn stored_role_name(value: String) -> AppResult<RoleName> {
    RoleName::new(value).map_err(|error| {
        AppError::Internal(format!("invalid role name persisted in storage: {error}"))
    })
}

/// Maps unique violations to `Conflict` and every other failure to `Internal`.
pub(crate) fn map_write_error(error: sqlx::Error, conflict: impl FnOnce() -> String) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(conflict());
    }

    AppError::Internal(format!("database write failed: {error}"))
}

pub(crate) fn map_query_error(context: &str) -> impl FnOnce(sqlx::Error) -> AppError + '_ {
    move |error| AppError::Internal(format!("failed to {context}: {error}"))
}
