use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use labelgate_core::{AppError, AppResult, ProjectId, UserId, UserIdentity};
use labelgate_domain::{AccessLevel, AdminStatus, Resource, RoleKind, SettingsAccessLevels};

use crate::{
    DirectoryRepository, ProjectAccessGrant, ProjectRecord, SettingsAccessGrant, UserRecord,
};

mod allow_list;
mod decision;


pub use allow_list::AdminAllowList;
pub use decision::{AccessDecision, AllowReason, DenyReason};

/// Repository port for the lookups an access decision depends on.
#[async_trait]
pub trait AuthorizationRepository: Send + Sync {
    /// Lists kinds of roles the user holds through active assignments of active roles.
    async fn list_active_role_kinds(&self, user_id: UserId) -> AppResult<Vec<RoleKind>>;

    /// Finds the project access record for a user, active or not.
    async fn find_project_access(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<Option<ProjectAccessGrant>>;

    /// Finds the settings access record for a user, active or not.
    async fn find_settings_access(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<Option<SettingsAccessGrant>>;
}

/// Access decision engine.
///
/// Rules are evaluated in priority order: super-admin override, organization admin
/// override, the most specific valid grant, ownership of the project, and finally deny.
/// Lookup failures never allow.
#[derive(Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn AuthorizationRepository>,
    directory: Arc<dyn DirectoryRepository>,
    allow_list: Arc<AdminAllowList>,
}

impl AuthorizationService {
    /// Creates a new authorization service from its ports.
    #[must_use]
    pub fn new(
        repository: Arc<dyn AuthorizationRepository>,
        directory: Arc<dyn DirectoryRepository>,
        allow_list: AdminAllowList,
    ) -> Self {
        Self {
            repository,
            directory,
            allow_list: Arc::new(allow_list),
        }
    }

    /// Decides whether the principal may access the resource at the required level.
    pub async fn authorize(
        &self,
        principal: &UserIdentity,
        resource: Resource,
        required: AccessLevel,
    ) -> AccessDecision {
        let decision = match self.evaluate(principal, resource, required).await {
            Ok(decision) => decision,
            Err(error) => {
                warn!(
                    user_id = %principal.user_id(),
                    resource = %resource.describe(),
                    error = %error,
                    "authorization lookup failed, denying"
                );
                AccessDecision::Deny(DenyReason::LookupFailed)
            }
        };

        debug!(
            user_id = %principal.user_id(),
            resource = %resource.describe(),
            required = required.as_str(),
            decision = %decision,
            "access decision"
        );
        decision
    }

    /// Ensures the principal may access the resource at the required level.
    pub async fn require_access(
        &self,
        principal: &UserIdentity,
        resource: Resource,
        required: AccessLevel,
    ) -> AppResult<()> {
        match self.authorize(principal, resource, required).await {
            AccessDecision::Allow(_) => Ok(()),
            AccessDecision::Deny(reason) => Err(AppError::Forbidden(format!(
                "user '{}' lacks '{}' access to {} ({})",
                principal.user_id(),
                required.as_str(),
                resource.describe(),
                reason.as_str()
            ))),
        }
    }

    /// Evaluates an access decision on behalf of another user.
    ///
    /// Principals may always check themselves; checking anyone else requires admin status.
    pub async fn check_access(
        &self,
        actor: &UserIdentity,
        user_id: Option<UserId>,
        resource: Resource,
        required: AccessLevel,
    ) -> AppResult<AccessDecision> {
        let Some(user_id) = user_id.filter(|user_id| *user_id != actor.user_id()) else {
            return Ok(self.authorize(actor, resource, required).await);
        };

        let user = self.require_admin_of(actor, user_id).await?;

        Ok(self.authorize(&user.identity(), resource, required).await)
    }

    /// Returns the override tier of the principal, `none` when lookups fail.
    pub async fn admin_status(&self, principal: &UserIdentity) -> AdminStatus {
        match self.resolve_admin_status(principal).await {
            Ok(status) => status,
            Err(error) => {
                warn!(
                    user_id = %principal.user_id(),
                    error = %error,
                    "admin status lookup failed, treating principal as regular user"
                );
                AdminStatus::None
            }
        }
    }

    /// Ensures the principal holds admin or super-admin status.
    pub async fn require_admin(&self, principal: &UserIdentity) -> AppResult<AdminStatus> {
        let status = self.admin_status(principal).await;
        if !status.is_admin() {
            return Err(AppError::Forbidden(format!(
                "user '{}' is not an administrator",
                principal.user_id()
            )));
        }

        Ok(status)
    }

    /// Ensures the principal may administer another user and returns that user.
    ///
    /// Super-admins act across organizations, admins only within their own.
    pub async fn require_admin_of(
        &self,
        principal: &UserIdentity,
        user_id: UserId,
    ) -> AppResult<UserRecord> {
        let status = self.require_admin(principal).await?;
        let user = self
            .directory
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?;

        if status == AdminStatus::Admin && user.organization_id != principal.organization_id() {
            return Err(AppError::Forbidden(format!(
                "user '{}' may not administer user '{user_id}' of another organization",
                principal.user_id()
            )));
        }

        Ok(user)
    }

    /// Ensures the principal holds super-admin status.
    pub async fn require_super_admin(&self, principal: &UserIdentity) -> AppResult<()> {
        if self.admin_status(principal).await != AdminStatus::SuperAdmin {
            return Err(AppError::Forbidden(format!(
                "user '{}' is not a super administrator",
                principal.user_id()
            )));
        }

        Ok(())
    }

    /// Keeps the projects the principal may access at the required level.
    pub async fn filter_accessible_projects(
        &self,
        principal: &UserIdentity,
        projects: Vec<ProjectRecord>,
        required: AccessLevel,
    ) -> Vec<ProjectRecord> {
        let status = match self.resolve_admin_status(principal).await {
            Ok(status) => status,
            Err(error) => {
                warn!(
                    user_id = %principal.user_id(),
                    error = %error,
                    "admin status lookup failed, hiding every project"
                );
                return Vec::new();
            }
        };

        let mut accessible = Vec::with_capacity(projects.len());
        for project in projects {
            let resource = Resource::project(project.project_id);
            match self
                .decide(principal, status, &project, resource, required)
                .await
            {
                Ok(decision) if decision.is_allowed() => accessible.push(project),
                Ok(_) => {}
                Err(error) => warn!(
                    user_id = %principal.user_id(),
                    resource = %resource.describe(),
                    error = %error,
                    "authorization lookup failed, hiding project"
                ),
            }
        }

        accessible
    }

    /// Lists projects of the principal's organization the principal may access.
    pub async fn list_accessible_projects(
        &self,
        principal: &UserIdentity,
        required: AccessLevel,
    ) -> AppResult<Vec<ProjectRecord>> {
        let projects = self
            .directory
            .list_projects(principal.organization_id())
            .await?;

        Ok(self
            .filter_accessible_projects(principal, projects, required)
            .await)
    }

    /// Returns per-field effective settings levels for the principal on one project.
    pub async fn effective_settings_access(
        &self,
        principal: &UserIdentity,
        project_id: ProjectId,
    ) -> SettingsAccessLevels {
        match self.resolve_settings_levels(principal, project_id).await {
            Ok(levels) => levels,
            Err(error) => {
                warn!(
                    user_id = %principal.user_id(),
                    project_id = %project_id,
                    error = %error,
                    "settings access lookup failed, reporting no access"
                );
                SettingsAccessLevels::uniform(AccessLevel::None)
            }
        }
    }

    /// Returns the user's active, unexpired settings grant on one project.
    pub async fn effective_settings_grant(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<Option<SettingsAccessGrant>> {
        let now = Utc::now();
        Ok(self
            .repository
            .find_settings_access(user_id, project_id)
            .await?
            .filter(|grant| grant.is_effective_at(now)))
    }

    async fn evaluate(
        &self,
        principal: &UserIdentity,
        resource: Resource,
        required: AccessLevel,
    ) -> AppResult<AccessDecision> {
        let status = self.resolve_admin_status(principal).await?;
        if status == AdminStatus::SuperAdmin {
            return Ok(AccessDecision::Allow(AllowReason::SuperAdmin));
        }

        let Some(project) = self.directory.find_project(resource.project_id()).await? else {
            return Ok(AccessDecision::Deny(DenyReason::ResourceNotFound));
        };

        self.decide(principal, status, &project, resource, required)
            .await
    }

    async fn decide(
        &self,
        principal: &UserIdentity,
        status: AdminStatus,
        project: &ProjectRecord,
        resource: Resource,
        required: AccessLevel,
    ) -> AppResult<AccessDecision> {
        match status {
            AdminStatus::SuperAdmin => return Ok(AccessDecision::Allow(AllowReason::SuperAdmin)),
            AdminStatus::Admin if project.organization_id == principal.organization_id() => {
                return Ok(AccessDecision::Allow(AllowReason::OrganizationAdmin));
            }
            _ => {}
        }

        let granted = self.granted_level(principal.user_id(), resource).await?;
        if let Some(level) = granted
            && level.satisfies(required)
        {
            return Ok(AccessDecision::Allow(AllowReason::Grant(level)));
        }

        if project.created_by == Some(principal.user_id()) {
            return Ok(AccessDecision::Allow(AllowReason::Owner));
        }

        Ok(AccessDecision::Deny(match granted {
            Some(level) => DenyReason::InsufficientGrant(level),
            None => DenyReason::NoGrant,
        }))
    }

    async fn granted_level(
        &self,
        user_id: UserId,
        resource: Resource,
    ) -> AppResult<Option<AccessLevel>> {
        let now = Utc::now();
        let project_id = resource.project_id();

        if let Some(field) = resource.settings_field() {
            let settings_grant = self
                .repository
                .find_settings_access(user_id, project_id)
                .await?
                .filter(|grant| grant.is_effective_at(now));
            if let Some(grant) = settings_grant {
                return Ok(Some(grant.levels.get(field)));
            }
        }

        Ok(self
            .repository
            .find_project_access(user_id, project_id)
            .await?
            .filter(|grant| grant.is_effective_at(now))
            .map(|grant| grant.access_level))
    }

    async fn resolve_settings_levels(
        &self,
        principal: &UserIdentity,
        project_id: ProjectId,
    ) -> AppResult<SettingsAccessLevels> {
        let status = self.resolve_admin_status(principal).await?;
        if status == AdminStatus::SuperAdmin {
            return Ok(SettingsAccessLevels::uniform(AccessLevel::Admin));
        }

        let Some(project) = self.directory.find_project(project_id).await? else {
            return Ok(SettingsAccessLevels::uniform(AccessLevel::None));
        };

        let is_org_admin =
            status == AdminStatus::Admin && project.organization_id == principal.organization_id();
        if is_org_admin || project.created_by == Some(principal.user_id()) {
            return Ok(SettingsAccessLevels::uniform(AccessLevel::Admin));
        }

        let user_id = principal.user_id();
        if let Some(grant) = self.effective_settings_grant(user_id, project_id).await? {
            return Ok(grant.levels);
        }

        let now = Utc::now();

        let project_level = self
            .repository
            .find_project_access(user_id, project_id)
            .await?
            .filter(|grant| grant.is_effective_at(now))
            .map(|grant| grant.access_level)
            .unwrap_or_default();

        Ok(SettingsAccessLevels::uniform(project_level))
    }

    async fn resolve_admin_status(&self, principal: &UserIdentity) -> AppResult<AdminStatus> {
        let listed = self.allow_list.status_for(principal.email());
        if listed == AdminStatus::SuperAdmin {
            return Ok(AdminStatus::SuperAdmin);
        }

        let role_kinds = self
            .repository
            .list_active_role_kinds(principal.user_id())
            .await?;
        if role_kinds.contains(&RoleKind::SuperAdmin) {
            return Ok(AdminStatus::SuperAdmin);
        }

        let is_admin = listed == AdminStatus::Admin
            || principal.is_staff()
            || principal.is_superuser()
            || role_kinds.contains(&RoleKind::Admin);

        Ok(if is_admin {
            AdminStatus::Admin
        } else {
            AdminStatus::None
        })
    }
}
