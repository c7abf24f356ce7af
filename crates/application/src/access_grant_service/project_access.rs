use super::*;

use crate::access_grant_ports::{
    GrantProjectAccessInput, ProjectAccessGrant, UpsertProjectAccessInput,
};

impl AccessGrantService {
    /// Grants or re-grants project access and emits an audit event.
    pub async fn grant_project_access(
        &self,
        actor: &UserIdentity,
        input: GrantProjectAccessInput,
    ) -> AppResult<ProjectAccessGrant> {
        if input.access_level == AccessLevel::None {
            return Err(AppError::Validation(
                "access_level must be read, write or admin; revoke to remove access".to_owned(),
            ));
        }
        validate_expiry(input.expires_at)?;

        let project = self
            .require_project_level(actor, input.project_id, AccessLevel::Admin)
            .await?;
        let target = self.require_user(input.user_id).await?;

        let grant = self
            .repository
            .upsert_project_access(UpsertProjectAccessInput {
                user_id: target.user_id,
                project_id: project.project_id,
                access_level: input.access_level,
                expires_at: input.expires_at,
                granted_by: actor.user_id(),
            })
            .await?;

        let expiry = grant
            .expires_at
            .map(|expires_at| format!(" until {}", expires_at.to_rfc3339()))
            .unwrap_or_default();
        self.append_audit(
            actor,
            &project,
            AuditAction::ProjectAccessGranted,
            "project_access",
            target.user_id,
            format!(
                "granted '{}' access on '{}' to '{}'{expiry}",
                grant.access_level.as_str(),
                project.title,
                target.email
            ),
        )
        .await?;

        Ok(grant)
    }

    /// Revokes active project access and emits an audit event.
    pub async fn revoke_project_access(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<ProjectAccessGrant> {
        let project = self
            .require_project_level(actor, project_id, AccessLevel::Admin)
            .await?;

        let grant = self
            .repository
            .revoke_project_access(user_id, project_id)
            .await?;

        self.append_audit(
            actor,
            &project,
            AuditAction::ProjectAccessRevoked,
            "project_access",
            user_id,
            format!(
                "revoked '{}' access on '{}'",
                grant.access_level.as_str(),
                project.title
            ),
        )
        .await?;

        Ok(grant)
    }

    /// Lists effective project grants held by one user, for the user or an administrator of
    /// the user's organization.
    pub async fn list_project_access_for_user(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
    ) -> AppResult<Vec<ProjectAccessGrant>> {
        if user_id != actor.user_id() {
            self.authorization_service
                .require_admin_of(actor, user_id)
                .await?;
        }

        let now = Utc::now();
        Ok(self
            .repository
            .list_project_access_for_user(user_id)
            .await?
            .into_iter()
            .filter(|grant| grant.is_effective_at(now))
            .collect())
    }

    /// Lists effective project grants on one project.
    pub async fn list_project_access_for_project(
        &self,
        actor: &UserIdentity,
        project_id: ProjectId,
    ) -> AppResult<Vec<ProjectAccessGrant>> {
        self.require_project_level(actor, project_id, AccessLevel::Read)
            .await?;

        let now = Utc::now();
        Ok(self
            .repository
            .list_project_access_for_project(project_id)
            .await?
            .into_iter()
            .filter(|grant| grant.is_effective_at(now))
            .collect())
    }
}
