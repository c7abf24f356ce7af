use std::sync::Arc;

use labelgate_core::{AppError, AppResult, UserId, UserIdentity};
use labelgate_domain::{AdminStatus, AuditAction, RoleKind, RoleName};

use crate::{
    AuditEvent, AuditLogRepository, AuditRepository, AuthorizationService, DirectoryRepository,
    RoleDefinition, SecurityAdminRepository, UserRecord,
};

mod assignments;
mod audit;
mod permissions;
mod roles;


/// Application service for roles, role assignments and the audit log.
#[derive(Clone)]
pub struct SecurityAdminService {
    authorization_service: AuthorizationService,
    directory: Arc<dyn DirectoryRepository>,
    repository: Arc<dyn SecurityAdminRepository>,
    audit_log_repository: Arc<dyn AuditLogRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl SecurityAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        directory: Arc<dyn DirectoryRepository>,
        repository: Arc<dyn SecurityAdminRepository>,
        audit_log_repository: Arc<dyn AuditLogRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            directory,
            repository,
            audit_log_repository,
            audit_repository,
        }
    }

    async fn require_role(&self, name: &RoleName) -> AppResult<RoleDefinition> {
        self.repository
            .find_role(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{name}' does not exist")))
    }

    async fn require_user(&self, user_id: UserId) -> AppResult<UserRecord> {
        self.directory
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))
    }

    /// Ensures the actor may change definitions of roles of the given kind.
    async fn require_role_manage(&self, actor: &UserIdentity, kind: RoleKind) -> AppResult<()> {
        if kind == RoleKind::SuperAdmin {
            return self.authorization_service.require_super_admin(actor).await;
        }

        self.authorization_service.require_admin(actor).await?;
        Ok(())
    }

    /// Ensures the actor may assign or revoke a role of `kind` for `target`.
    ///
    /// Super-admin roles need a super-admin actor. Admins act within their organization.
    /// Regular users may manage custom roles only for users they created.
    async fn require_assignment_manage(
        &self,
        actor: &UserIdentity,
        target: &UserRecord,
        kind: RoleKind,
    ) -> AppResult<()> {
        let status = self.authorization_service.admin_status(actor).await;
        let allowed = match (status, kind) {
            (AdminStatus::SuperAdmin, _) => true,
            (_, RoleKind::SuperAdmin) => false,
            (AdminStatus::Admin, _) => target.organization_id == actor.organization_id(),
            (AdminStatus::None, RoleKind::Admin) => false,
            (AdminStatus::None, RoleKind::Custom) => target.created_by == Some(actor.user_id()),
        };

        if !allowed {
            return Err(AppError::Forbidden(format!(
                "user '{}' may not manage '{}' roles for user '{}'",
                actor.user_id(),
                kind.as_str(),
                target.user_id
            )));
        }

        Ok(())
    }

    async fn append_audit(
        &self,
        actor: &UserIdentity,
        action: AuditAction,
        resource_type: &str,
        resource_id: String,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                organization_id: actor.organization_id(),
                actor_id: actor.user_id(),
                action,
                resource_type: resource_type.to_owned(),
                resource_id,
                detail: Some(detail),
            })
            .await
    }
}
