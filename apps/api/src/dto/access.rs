use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use labelgate_application::{
    FieldAccessCheck, GrantProjectAccessInput, GrantSettingsAccessInput, ProjectAccessGrant,
    SettingsAccessGrant, SettingsAccessSummary,
};
use labelgate_core::{AppError, AppResult, ProjectId, UserId};
use labelgate_domain::{AccessLevel, SettingsAccessLevels, SettingsAccessTemplate, SettingsField};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for a project access grant.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/grant-project-access-request.ts"
)]
pub struct GrantProjectAccessRequest {
    pub user_id: String,
    pub access_level: String,
    pub expires_at: Option<String>,
}

/// Incoming payload for project access revocation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/revoke-project-access-request.ts"
)]
pub struct RevokeProjectAccessRequest {
    pub user_id: String,
}

/// Incoming payload for a settings access grant.
///
/// Omitted fields keep their default level.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/grant-settings-access-request.ts"
)]
pub struct GrantSettingsAccessRequest {
    pub user_id: String,
    #[serde(default)]
    pub levels: HashMap<String, String>,
    pub expires_at: Option<String>,
    pub notes: Option<String>,
}

/// Incoming payload for a partial settings access update.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-settings-access-request.ts"
)]
pub struct UpdateSettingsAccessRequest {
    pub levels: HashMap<String, String>,
}

/// Incoming payload for applying a settings template.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/apply-settings-template-request.ts"
)]
pub struct ApplySettingsTemplateRequest {
    pub user_id: String,
    pub template: String,
}

/// API representation of a project access grant.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/project-access-response.ts"
)]
pub struct ProjectAccessResponse {
    pub grant_id: String,
    pub user_id: String,
    pub project_id: String,
    pub access_level: String,
    pub granted_by: Option<String>,
    pub granted_at: String,
    pub expires_at: Option<String>,
    pub is_active: bool,
}

/// Per-field settings levels.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/settings-access-levels-response.ts"
)]
pub struct SettingsAccessLevelsResponse {
    pub general: String,
    pub labeling_interface: String,
    pub annotation: String,
    pub model: String,
    pub predictions: String,
    pub cloud_storage: String,
    pub webhooks: String,
    pub danger_zone: String,
}

/// API representation of a settings access grant.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/settings-access-response.ts"
)]
pub struct SettingsAccessResponse {
    pub grant_id: String,
    pub user_id: String,
    pub project_id: String,
    pub levels: SettingsAccessLevelsResponse,
    pub granted_by: Option<String>,
    pub granted_at: String,
    pub expires_at: Option<String>,
    pub is_active: bool,
    pub notes: String,
}

/// The caller's own settings grant and effective levels.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/my-settings-access-response.ts"
)]
pub struct MySettingsAccessResponse {
    pub grant: Option<SettingsAccessResponse>,
    pub effective_levels: SettingsAccessLevelsResponse,
}

/// API representation of a single settings field check.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/field-access-check-response.ts"
)]
pub struct FieldAccessCheckResponse {
    pub field: String,
    pub required_level: String,
    pub current_level: String,
    pub has_access: bool,
}

/// API representation of a built-in settings template.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/settings-template-response.ts"
)]
pub struct SettingsTemplateResponse {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub levels: SettingsAccessLevelsResponse,
}

impl GrantProjectAccessRequest {
    pub fn into_input(self, project_id: ProjectId) -> AppResult<GrantProjectAccessInput> {
        Ok(GrantProjectAccessInput {
            user_id: UserId::parse(self.user_id.as_str())?,
            project_id,
            access_level: AccessLevel::from_str(self.access_level.as_str())?,
            expires_at: parse_timestamp(self.expires_at)?,
        })
    }
}

impl GrantSettingsAccessRequest {
    pub fn into_input(self, project_id: ProjectId) -> AppResult<GrantSettingsAccessInput> {
        let mut levels = SettingsAccessLevels::default();
        for (field, level) in parse_level_map(self.levels)? {
            levels.set(field, level);
        }

        Ok(GrantSettingsAccessInput {
            user_id: UserId::parse(self.user_id.as_str())?,
            project_id,
            levels,
            expires_at: parse_timestamp(self.expires_at)?,
            notes: self.notes.unwrap_or_default(),
        })
    }
}

impl UpdateSettingsAccessRequest {
    pub fn into_changes(self) -> AppResult<Vec<(SettingsField, AccessLevel)>> {
        parse_level_map(self.levels)
    }
}

impl ApplySettingsTemplateRequest {
    pub fn parse(&self) -> AppResult<(UserId, SettingsAccessTemplate)> {
        Ok((
            UserId::parse(self.user_id.as_str())?,
            SettingsAccessTemplate::from_str(self.template.as_str())?,
        ))
    }
}

fn parse_timestamp(value: Option<String>) -> AppResult<Option<DateTime<Utc>>> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| {
            DateTime::parse_from_rfc3339(raw.trim())
                .map(|timestamp| timestamp.with_timezone(&Utc))
                .map_err(|error| {
                    AppError::Validation(format!("invalid timestamp '{raw}': {error}"))
                })
        })
        .transpose()
}

fn parse_level_map(levels: HashMap<String, String>) -> AppResult<Vec<(SettingsField, AccessLevel)>> {
    let mut parsed = levels
        .iter()
        .map(|(field, level)| -> AppResult<(SettingsField, AccessLevel)> {
            Ok((
                SettingsField::from_str(field.as_str())?,
                AccessLevel::from_str(level.as_str())?,
            ))
        })
        .collect::<AppResult<Vec<_>>>()?;
    parsed.sort_by_key(|(field, _)| *field);
    Ok(parsed)
}

impl From<ProjectAccessGrant> for ProjectAccessResponse {
    fn from(value: ProjectAccessGrant) -> Self {
        Self {
            grant_id: value.grant_id.to_string(),
            user_id: value.user_id.to_string(),
            project_id: value.project_id.to_string(),
            access_level: value.access_level.as_str().to_owned(),
            granted_by: value.granted_by.map(|user_id| user_id.to_string()),
            granted_at: value.granted_at.to_rfc3339(),
            expires_at: value.expires_at.map(|expires_at| expires_at.to_rfc3339()),
            is_active: value.is_active,
        }
    }
}

impl From<SettingsAccessLevels> for SettingsAccessLevelsResponse {
    fn from(value: SettingsAccessLevels) -> Self {
        Self {
            general: value.general.as_str().to_owned(),
            labeling_interface: value.labeling_interface.as_str().to_owned(),
            annotation: value.annotation.as_str().to_owned(),
            model: value.model.as_str().to_owned(),
            predictions: value.predictions.as_str().to_owned(),
            cloud_storage: value.cloud_storage.as_str().to_owned(),
            webhooks: value.webhooks.as_str().to_owned(),
            danger_zone: value.danger_zone.as_str().to_owned(),
        }
    }
}

impl From<SettingsAccessGrant> for SettingsAccessResponse {
    fn from(value: SettingsAccessGrant) -> Self {
        Self {
            grant_id: value.grant_id.to_string(),
            user_id: value.user_id.to_string(),
            project_id: value.project_id.to_string(),
            levels: SettingsAccessLevelsResponse::from(value.levels),
            granted_by: value.granted_by.map(|user_id| user_id.to_string()),
            granted_at: value.granted_at.to_rfc3339(),
            expires_at: value.expires_at.map(|expires_at| expires_at.to_rfc3339()),
            is_active: value.is_active,
            notes: value.notes,
        }
    }
}

impl From<SettingsAccessSummary> for MySettingsAccessResponse {
    fn from(value: SettingsAccessSummary) -> Self {
        Self {
            grant: value.grant.map(SettingsAccessResponse::from),
            effective_levels: SettingsAccessLevelsResponse::from(value.effective_levels),
        }
    }
}

impl From<FieldAccessCheck> for FieldAccessCheckResponse {
    fn from(value: FieldAccessCheck) -> Self {
        Self {
            field: value.field.as_str().to_owned(),
            required_level: value.required_level.as_str().to_owned(),
            current_level: value.current_level.as_str().to_owned(),
            has_access: value.has_access,
        }
    }
}

impl From<SettingsAccessTemplate> for SettingsTemplateResponse {
    fn from(value: SettingsAccessTemplate) -> Self {
        Self {
            name: value.as_str().to_owned(),
            display_name: value.display_name().to_owned(),
            description: value.description().to_owned(),
            levels: SettingsAccessLevelsResponse::from(value.levels()),
        }
    }
}
