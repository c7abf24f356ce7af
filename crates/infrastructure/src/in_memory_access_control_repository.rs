use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use labelgate_application::{
    AccessGrantRepository, AssignmentResult, AuditEvent, AuditLogEntry, AuditLogQuery,
    AuditLogRepository, AuditRepository, AuthorizationRepository, HeldRole, NewRole,
    NewRoleAssignment, ProjectAccessGrant, RoleAssignment, RoleDefinition, SecurityAdminRepository,
    SettingsAccessGrant, SettingsAccessUpdate, UpsertProjectAccessInput,
    UpsertSettingsAccessInput,
};
use labelgate_core::{AppError, AppResult, OrganizationId, ProjectId, UserId};
use labelgate_domain::{AccessLevel, RoleKind, RoleName, RolePermission, SettingsField};

mod grants;
mod roles;


#[derive(Debug, Clone)]
struct StoredRole {
    definition: RoleDefinition,
    permissions: Vec<RolePermission>,
}

#[derive(Debug, Clone)]
struct StoredAuditEntry {
    organization_id: OrganizationId,
    entry: AuditLogEntry,
}

/// In-memory repository backing every access-control port.
///
/// Each check-and-write operation runs under a single write lock, which makes
/// activate-or-create and grant upserts atomic.
#[derive(Debug, Default)]
pub struct InMemoryAccessControlRepository {
    roles: RwLock<HashMap<RoleName, StoredRole>>,
    assignments: RwLock<HashMap<(UserId, Uuid), RoleAssignment>>,
    project_access: RwLock<HashMap<(UserId, ProjectId), ProjectAccessGrant>>,
    settings_access: RwLock<HashMap<(UserId, ProjectId), SettingsAccessGrant>>,
    audit_entries: RwLock<Vec<StoredAuditEntry>>,
}

impl InMemoryAccessControlRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthorizationRepository for InMemoryAccessControlRepository {
    async fn list_active_role_kinds(&self, user_id: UserId) -> AppResult<Vec<RoleKind>> {
        self.list_active_role_kinds_impl(user_id).await
    }

    async fn find_project_access(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<Option<ProjectAccessGrant>> {
        Ok(self
            .project_access
            .read()
            .await
            .get(&(user_id, project_id))
            .cloned())
    }

    async fn find_settings_access(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<Option<SettingsAccessGrant>> {
        Ok(self
            .settings_access
            .read()
            .await
            .get(&(user_id, project_id))
            .cloned())
    }
}

#[async_trait]
impl SecurityAdminRepository for InMemoryAccessControlRepository {
    async fn create_role(&self, role: NewRole) -> AppResult<RoleDefinition> {
        self.create_role_impl(role).await
    }

    async fn find_role(&self, name: &RoleName) -> AppResult<Option<RoleDefinition>> {
        Ok(self
            .roles
            .read()
            .await
            .get(name)
            .map(|stored| stored.definition.clone()))
    }

    async fn list_roles(&self, include_inactive: bool) -> AppResult<Vec<RoleDefinition>> {
        self.list_roles_impl(include_inactive).await
    }

    async fn set_role_active(
        &self,
        name: &RoleName,
        is_active: bool,
    ) -> AppResult<RoleDefinition> {
        self.set_role_active_impl(name, is_active).await
    }

    async fn replace_role_permissions(
        &self,
        name: &RoleName,
        permissions: Vec<RolePermission>,
    ) -> AppResult<Vec<RolePermission>> {
        self.replace_role_permissions_impl(name, permissions).await
    }

    async fn list_role_permissions(&self, name: &RoleName) -> AppResult<Vec<RolePermission>> {
        self.roles
            .read()
            .await
            .get(name)
            .map(|stored| stored.permissions.clone())
            .ok_or_else(|| AppError::NotFound(format!("role '{name}' does not exist")))
    }

    async fn activate_or_create_assignment(
        &self,
        assignment: NewRoleAssignment,
    ) -> AppResult<AssignmentResult> {
        self.activate_or_create_assignment_impl(assignment).await
    }

    async fn revoke_assignment(
        &self,
        user_id: UserId,
        role_name: &RoleName,
        revoked_by: UserId,
    ) -> AppResult<RoleAssignment> {
        self.revoke_assignment_impl(user_id, role_name, revoked_by)
            .await
    }

    async fn list_assignments_for_user(
        &self,
        user_id: UserId,
        active_only: bool,
    ) -> AppResult<Vec<RoleAssignment>> {
        self.list_assignments_impl(|assignment| {
            assignment.user_id == user_id && (!active_only || assignment.is_active)
        })
        .await
    }

    async fn list_assignments_for_role(&self, name: &RoleName) -> AppResult<Vec<RoleAssignment>> {
        self.list_assignments_impl(|assignment| {
            &assignment.role_name == name && assignment.is_active
        })
        .await
    }

    async fn list_held_roles(&self, user_id: UserId) -> AppResult<Vec<HeldRole>> {
        self.list_held_roles_impl(user_id).await
    }
}

#[async_trait]
impl AccessGrantRepository for InMemoryAccessControlRepository {
    async fn upsert_project_access(
        &self,
        input: UpsertProjectAccessInput,
    ) -> AppResult<ProjectAccessGrant> {
        self.upsert_project_access_impl(input).await
    }

    async fn revoke_project_access(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<ProjectAccessGrant> {
        self.revoke_project_access_impl(user_id, project_id).await
    }

    async fn list_project_access_for_user(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<ProjectAccessGrant>> {
        self.list_project_access_impl(|grant| grant.user_id == user_id)
            .await
    }

    async fn list_project_access_for_project(
        &self,
        project_id: ProjectId,
    ) -> AppResult<Vec<ProjectAccessGrant>> {
        self.list_project_access_impl(|grant| grant.project_id == project_id)
            .await
    }

    async fn upsert_settings_access(
        &self,
        input: UpsertSettingsAccessInput,
    ) -> AppResult<SettingsAccessGrant> {
        self.upsert_settings_access_impl(input).await
    }

    async fn update_settings_levels(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        changes: &[(SettingsField, AccessLevel)],
    ) -> AppResult<SettingsAccessUpdate> {
        self.update_settings_levels_impl(user_id, project_id, changes)
            .await
    }

    async fn revoke_settings_access(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<SettingsAccessGrant> {
        self.revoke_settings_access_impl(user_id, project_id).await
    }

    async fn list_settings_access_for_project(
        &self,
        project_id: ProjectId,
    ) -> AppResult<Vec<SettingsAccessGrant>> {
        let grants = self.settings_access.read().await;
        let mut listed: Vec<SettingsAccessGrant> = grants
            .values()
            .filter(|grant| grant.project_id == project_id && grant.is_active)
            .cloned()
            .collect();
        listed.sort_by_key(|grant| grant.granted_at);
        Ok(listed)
    }
}

#[async_trait]
impl AuditRepository for InMemoryAccessControlRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.audit_entries.write().await.push(StoredAuditEntry {
            organization_id: event.organization_id,
            entry: AuditLogEntry {
                event_id: Uuid::new_v4(),
                actor_id: event.actor_id,
                action: event.action.as_str().to_owned(),
                resource_type: event.resource_type,
                resource_id: event.resource_id,
                detail: event.detail,
                created_at: Utc::now(),
            },
        });
        Ok(())
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryAccessControlRepository {
    async fn list_recent_entries(
        &self,
        organization_id: OrganizationId,
        query: AuditLogQuery,
    ) -> AppResult<Vec<AuditLogEntry>> {
        let entries = self.audit_entries.read().await;
        Ok(entries
            .iter()
            .rev()
            .filter(|stored| stored.organization_id == organization_id)
            .map(|stored| &stored.entry)
            .filter(|entry| {
                query
                    .action
                    .as_deref()
                    .is_none_or(|action| entry.action == action)
            })
            .filter(|entry| {
                query
                    .actor_id
                    .is_none_or(|actor_id| entry.actor_id == actor_id)
            })
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect())
    }
}
