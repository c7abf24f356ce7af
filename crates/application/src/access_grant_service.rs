use std::sync::Arc;

use chrono::{DateTime, Utc};

use labelgate_core::{AppError, AppResult, ProjectId, UserId, UserIdentity};
use labelgate_domain::{AccessLevel, AuditAction, Resource};

use crate::{
    AccessGrantRepository, AuditEvent, AuditRepository, AuthorizationService,
    DirectoryRepository, ProjectRecord, UserRecord,
};

mod project_access;
mod settings_access;

#[cfg(test)]
mod tests;

pub use settings_access::{FieldAccessCheck, SettingsAccessSummary};

/// Application service for project and project settings access grants.
#[derive(Clone)]
pub struct AccessGrantService {
    authorization_service: AuthorizationService,
    directory: Arc<dyn DirectoryRepository>,
    repository: Arc<dyn AccessGrantRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl AccessGrantService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        directory: Arc<dyn DirectoryRepository>,
        repository: Arc<dyn AccessGrantRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            directory,
            repository,
            audit_repository,
        }
    }

    async fn require_project(&self, project_id: ProjectId) -> AppResult<ProjectRecord> {
        self.directory
            .find_project(project_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("project '{project_id}' does not exist")))
    }

    async fn require_user(&self, user_id: UserId) -> AppResult<UserRecord> {
        self.directory
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))
    }

    /// Ensures the project exists and the actor holds `required` on it.
    async fn require_project_level(
        &self,
        actor: &UserIdentity,
        project_id: ProjectId,
        required: AccessLevel,
    ) -> AppResult<ProjectRecord> {
        let project = self.require_project(project_id).await?;
        self.authorization_service
            .require_access(actor, Resource::project(project_id), required)
            .await?;
        Ok(project)
    }

    async fn append_audit(
        &self,
        actor: &UserIdentity,
        project: &ProjectRecord,
        action: AuditAction,
        resource_type: &str,
        user_id: UserId,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                organization_id: project.organization_id,
                actor_id: actor.user_id(),
                action,
                resource_type: resource_type.to_owned(),
                resource_id: format!("{}:{user_id}", project.project_id),
                detail: Some(detail),
            })
            .await
    }
}

fn validate_expiry(expires_at: Option<DateTime<Utc>>) -> AppResult<()> {
    match expires_at {
        Some(expires_at) if expires_at <= Utc::now() => Err(AppError::Validation(
            "expires_at must be in the future".to_owned(),
        )),
        _ => Ok(()),
    }
}
