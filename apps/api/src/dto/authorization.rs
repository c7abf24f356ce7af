use labelgate_application::{AccessDecision, ProjectRecord};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for an authorization check.
///
/// `user_id` defaults to the caller; checking another user requires admin status.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/authorize-request.ts"
)]
pub struct AuthorizeRequest {
    pub user_id: Option<String>,
    pub project_id: String,
    pub settings_field: Option<String>,
    pub level: String,
}

/// API representation of an authorization decision.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/authorize-response.ts"
)]
pub struct AuthorizeResponse {
    pub allowed: bool,
    pub reason: String,
    pub granted_level: Option<String>,
    pub decision: String,
}

/// API representation of a project visible to the caller.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/project-response.ts"
)]
pub struct ProjectResponse {
    pub project_id: String,
    pub organization_id: String,
    pub title: String,
    pub created_by: Option<String>,
}

impl From<AccessDecision> for AuthorizeResponse {
    fn from(value: AccessDecision) -> Self {
        Self {
            allowed: value.is_allowed(),
            reason: value.reason().to_owned(),
            granted_level: value.granted_level().map(|level| level.as_str().to_owned()),
            decision: value.to_string(),
        }
    }
}

impl From<ProjectRecord> for ProjectResponse {
    fn from(value: ProjectRecord) -> Self {
        Self {
            project_id: value.project_id.to_string(),
            organization_id: value.organization_id.to_string(),
            title: value.title,
            created_by: value.created_by.map(|user_id| user_id.to_string()),
        }
    }
}
