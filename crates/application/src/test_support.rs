use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use labelgate_core::{
    AppError, AppResult, OrganizationId, ProjectId, UserId, UserIdentity,
};
use labelgate_domain::{AccessLevel, RoleKind, RoleName, RolePermission, SettingsField};

use crate::{
    AccessGrantRepository, AdminAllowList, AssignmentOutcome, AssignmentResult, AuditEvent,
    AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository, AuthorizationRepository,
    AuthorizationService, DirectoryRepository, HeldRole, NewRole, NewRoleAssignment,
    ProjectAccessGrant,
    ProjectRecord, RoleAssignment, RoleDefinition, SecurityAdminRepository, SettingsAccessGrant,
    SettingsAccessUpdate, UpsertProjectAccessInput, UpsertSettingsAccessInput, UserRecord,
};

#[derive(Default)]
pub(crate) struct FakeDirectory {
    users: Mutex<HashMap<UserId, UserRecord>>,
    projects: Mutex<HashMap<ProjectId, ProjectRecord>>,
}

impl FakeDirectory {
    pub(crate) async fn add_user(
        &self,
        email: &str,
        organization_id: OrganizationId,
        created_by: Option<UserId>,
    ) -> UserIdentity {
        let user = UserRecord {
            user_id: UserId::new(),
            email: email.to_owned(),
            organization_id,
            is_superuser: false,
            is_staff: false,
            created_by,
        };
        let identity = user.identity();
        self.users.lock().await.insert(user.user_id, user);
        identity
    }

    pub(crate) async fn add_project(
        &self,
        organization_id: OrganizationId,
        created_by: Option<UserId>,
    ) -> ProjectId {
        let project = ProjectRecord {
            project_id: ProjectId::new(),
            organization_id,
            title: "Street signs".to_owned(),
            created_by,
        };
        let project_id = project.project_id;
        self.projects.lock().await.insert(project_id, project);
        project_id
    }
}

#[async_trait]
impl DirectoryRepository for FakeDirectory {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self.users.lock().await.get(&user_id).cloned())
    }

    async fn find_project(&self, project_id: ProjectId) -> AppResult<Option<ProjectRecord>> {
        Ok(self.projects.lock().await.get(&project_id).cloned())
    }

    async fn list_projects(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Vec<ProjectRecord>> {
        let mut projects: Vec<ProjectRecord> = self
            .projects
            .lock()
            .await
            .values()
            .filter(|project| project.organization_id == organization_id)
            .cloned()
            .collect();
        projects.sort_by_key(|project| project.project_id);
        Ok(projects)
    }
}

/// One fake backing every access-control port so that writes are visible to decisions.
#[derive(Default)]
pub(crate) struct FakeAccessStore {
    roles: Mutex<Vec<RoleDefinition>>,
    permissions: Mutex<HashMap<RoleName, Vec<RolePermission>>>,
    assignments: Mutex<Vec<RoleAssignment>>,
    project_access: Mutex<HashMap<(UserId, ProjectId), ProjectAccessGrant>>,
    settings_access: Mutex<HashMap<(UserId, ProjectId), SettingsAccessGrant>>,
    events: Mutex<Vec<AuditEvent>>,
    fail_lookups: AtomicBool,
}

impl FakeAccessStore {
    pub(crate) fn fail_lookups(&self) {
        self.fail_lookups.store(true, Ordering::SeqCst);
    }

    pub(crate) async fn seed_role(&self, name: &str, is_system: bool) -> RoleDefinition {
        let name = RoleName::new(name).unwrap_or_else(|error| panic!("{error}"));
        let role = RoleDefinition {
            role_id: Uuid::new_v4(),
            display_name: name.default_display_name(),
            name,
            description: String::new(),
            is_system,
            is_active: true,
            created_by: None,
            created_at: Utc::now(),
        };
        self.roles.lock().await.push(role.clone());
        role
    }

    pub(crate) async fn seed_assignment(&self, user_id: UserId, role: &RoleDefinition) {
        self.assignments.lock().await.push(RoleAssignment {
            assignment_id: Uuid::new_v4(),
            user_id,
            role_id: role.role_id,
            role_name: role.name.clone(),
            is_active: true,
            assigned_by: None,
            assigned_at: Utc::now(),
            revoked_at: None,
            revoked_by: None,
            notes: String::new(),
        });
    }

    pub(crate) async fn put_project_access(&self, grant: ProjectAccessGrant) {
        self.project_access
            .lock()
            .await
            .insert((grant.user_id, grant.project_id), grant);
    }

    pub(crate) async fn put_settings_access(&self, grant: SettingsAccessGrant) {
        self.settings_access
            .lock()
            .await
            .insert((grant.user_id, grant.project_id), grant);
    }

    pub(crate) async fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().await.clone()
    }

    fn check_lookups(&self) -> AppResult<()> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(AppError::Internal("storage unavailable".to_owned()));
        }
        Ok(())
    }
}

pub(crate) fn project_grant(
    user_id: UserId,
    project_id: ProjectId,
    access_level: AccessLevel,
) -> ProjectAccessGrant {
    ProjectAccessGrant {
        grant_id: Uuid::new_v4(),
        user_id,
        project_id,
        access_level,
        granted_by: None,
        granted_at: Utc::now(),
        expires_at: None,
        is_active: true,
    }
}

pub(crate) struct Fixture {
    pub(crate) directory: Arc<FakeDirectory>,
    pub(crate) store: Arc<FakeAccessStore>,
    pub(crate) authorization: AuthorizationService,
}

pub(crate) fn fixture(allow_list: AdminAllowList) -> Fixture {
    let directory = Arc::new(FakeDirectory::default());
    let store = Arc::new(FakeAccessStore::default());
    let authorization = AuthorizationService::new(store.clone(), directory.clone(), allow_list);

    Fixture {
        directory,
        store,
        authorization,
    }
}

#[async_trait]
impl AuthorizationRepository for FakeAccessStore {
    async fn list_active_role_kinds(&self, user_id: UserId) -> AppResult<Vec<RoleKind>> {
        self.check_lookups()?;
        let roles = self.roles.lock().await;
        Ok(self
            .assignments
            .lock()
            .await
            .iter()
            .filter(|assignment| assignment.user_id == user_id && assignment.is_active)
            .filter_map(|assignment| {
                roles
                    .iter()
                    .find(|role| role.role_id == assignment.role_id && role.is_active)
                    .map(RoleDefinition::kind)
            })
            .collect())
    }

    async fn find_project_access(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<Option<ProjectAccessGrant>> {
        self.check_lookups()?;
        Ok(self
            .project_access
            .lock()
            .await
            .get(&(user_id, project_id))
            .cloned())
    }

    async fn find_settings_access(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<Option<SettingsAccessGrant>> {
        self.check_lookups()?;
        Ok(self
            .settings_access
            .lock()
            .await
            .get(&(user_id, project_id))
            .cloned())
    }
}

#[async_trait]
impl SecurityAdminRepository for FakeAccessStore {
    async fn create_role(&self, role: NewRole) -> AppResult<RoleDefinition> {
        let mut roles = self.roles.lock().await;
        if roles.iter().any(|stored| stored.name == role.name) {
            return Err(AppError::Conflict(format!("role '{}' already exists", role.name)));
        }
        let created = RoleDefinition {
            role_id: Uuid::new_v4(),
            name: role.name,
            display_name: role.display_name,
            description: role.description,
            is_system: role.is_system,
            is_active: true,
            created_by: role.created_by,
            created_at: Utc::now(),
        };
        roles.push(created.clone());
        Ok(created)
    }

    async fn find_role(&self, name: &RoleName) -> AppResult<Option<RoleDefinition>> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .find(|role| &role.name == name)
            .cloned())
    }

    async fn list_roles(&self, include_inactive: bool) -> AppResult<Vec<RoleDefinition>> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .filter(|role| include_inactive || role.is_active)
            .cloned()
            .collect())
    }

    async fn set_role_active(
        &self,
        name: &RoleName,
        is_active: bool,
    ) -> AppResult<RoleDefinition> {
        let mut roles = self.roles.lock().await;
        let role = roles
            .iter_mut()
            .find(|role| &role.name == name)
            .ok_or_else(|| AppError::NotFound(format!("role '{name}' does not exist")))?;
        role.is_active = is_active;
        Ok(role.clone())
    }

    async fn replace_role_permissions(
        &self,
        name: &RoleName,
        permissions: Vec<RolePermission>,
    ) -> AppResult<Vec<RolePermission>> {
        self.permissions
            .lock()
            .await
            .insert(name.clone(), permissions.clone());
        Ok(permissions)
    }

    async fn list_role_permissions(&self, name: &RoleName) -> AppResult<Vec<RolePermission>> {
        Ok(self
            .permissions
            .lock()
            .await
            .get(name)
            .cloned()
            .unwrap_or_default())
    }

    async fn activate_or_create_assignment(
        &self,
        assignment: NewRoleAssignment,
    ) -> AppResult<AssignmentResult> {
        let role = self
            .find_role(&assignment.role_name)
            .await?
            .ok_or_else(|| AppError::NotFound("role does not exist".to_owned()))?;
        let mut assignments = self.assignments.lock().await;
        if let Some(existing) = assignments
            .iter_mut()
            .find(|stored| stored.user_id == assignment.user_id && stored.role_id == role.role_id)
        {
            if existing.is_active {
                return Err(AppError::Conflict("assignment already active".to_owned()));
            }
            existing.is_active = true;
            existing.revoked_at = None;
            existing.revoked_by = None;
            existing.assigned_by = Some(assignment.assigned_by);
            return Ok(AssignmentResult {
                assignment: existing.clone(),
                outcome: AssignmentOutcome::Reactivated,
            });
        }

        let created = RoleAssignment {
            assignment_id: Uuid::new_v4(),
            user_id: assignment.user_id,
            role_id: role.role_id,
            role_name: role.name,
            is_active: true,
            assigned_by: Some(assignment.assigned_by),
            assigned_at: Utc::now(),
            revoked_at: None,
            revoked_by: None,
            notes: assignment.notes,
        };
        assignments.push(created.clone());
        Ok(AssignmentResult {
            assignment: created,
            outcome: AssignmentOutcome::Created,
        })
    }

    async fn revoke_assignment(
        &self,
        user_id: UserId,
        role_name: &RoleName,
        revoked_by: UserId,
    ) -> AppResult<RoleAssignment> {
        let mut assignments = self.assignments.lock().await;
        let assignment = assignments
            .iter_mut()
            .find(|stored| {
                stored.user_id == user_id && &stored.role_name == role_name && stored.is_active
            })
            .ok_or_else(|| AppError::NotFound("no active assignment".to_owned()))?;
        assignment.is_active = false;
        assignment.revoked_at = Some(Utc::now());
        assignment.revoked_by = Some(revoked_by);
        Ok(assignment.clone())
    }

    async fn list_assignments_for_user(
        &self,
        user_id: UserId,
        active_only: bool,
    ) -> AppResult<Vec<RoleAssignment>> {
        Ok(self
            .assignments
            .lock()
            .await
            .iter()
            .filter(|stored| stored.user_id == user_id && (!active_only || stored.is_active))
            .cloned()
            .collect())
    }

    async fn list_assignments_for_role(&self, name: &RoleName) -> AppResult<Vec<RoleAssignment>> {
        Ok(self
            .assignments
            .lock()
            .await
            .iter()
            .filter(|stored| &stored.role_name == name && stored.is_active)
            .cloned()
            .collect())
    }

    async fn list_held_roles(&self, user_id: UserId) -> AppResult<Vec<HeldRole>> {
        let roles = self.roles.lock().await;
        let permissions = self.permissions.lock().await;
        let mut held: Vec<HeldRole> = self
            .assignments
            .lock()
            .await
            .iter()
            .filter(|assignment| assignment.user_id == user_id && assignment.is_active)
            .filter_map(|assignment| {
                let role = roles
                    .iter()
                    .find(|role| role.role_id == assignment.role_id && role.is_active)?;
                Some(HeldRole {
                    role: role.clone(),
                    assigned_at: assignment.assigned_at,
                    permissions: permissions
                        .get(&role.name)
                        .into_iter()
                        .flatten()
                        .filter(|permission| permission.is_granted())
                        .cloned()
                        .collect(),
                })
            })
            .collect();
        held.sort_by(|left, right| left.role.name.cmp(&right.role.name));
        Ok(held)
    }
}

#[async_trait]
impl AccessGrantRepository for FakeAccessStore {
    async fn upsert_project_access(
        &self,
        input: UpsertProjectAccessInput,
    ) -> AppResult<ProjectAccessGrant> {
        let mut grants = self.project_access.lock().await;
        let grant = grants
            .entry((input.user_id, input.project_id))
            .or_insert_with(|| project_grant(input.user_id, input.project_id, input.access_level));
        grant.access_level = input.access_level;
        grant.expires_at = input.expires_at;
        grant.granted_by = Some(input.granted_by);
        grant.is_active = true;
        Ok(grant.clone())
    }

    async fn revoke_project_access(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<ProjectAccessGrant> {
        let mut grants = self.project_access.lock().await;
        let grant = grants
            .get_mut(&(user_id, project_id))
            .filter(|grant| grant.is_active)
            .ok_or_else(|| AppError::NotFound("no active project access".to_owned()))?;
        grant.is_active = false;
        Ok(grant.clone())
    }

    async fn list_project_access_for_user(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<ProjectAccessGrant>> {
        Ok(self
            .project_access
            .lock()
            .await
            .values()
            .filter(|grant| grant.user_id == user_id && grant.is_active)
            .cloned()
            .collect())
    }

    async fn list_project_access_for_project(
        &self,
        project_id: ProjectId,
    ) -> AppResult<Vec<ProjectAccessGrant>> {
        Ok(self
            .project_access
            .lock()
            .await
            .values()
            .filter(|grant| grant.project_id == project_id && grant.is_active)
            .cloned()
            .collect())
    }

    async fn upsert_settings_access(
        &self,
        input: UpsertSettingsAccessInput,
    ) -> AppResult<SettingsAccessGrant> {
        let grant = SettingsAccessGrant {
            grant_id: Uuid::new_v4(),
            user_id: input.user_id,
            project_id: input.project_id,
            levels: input.levels,
            granted_by: Some(input.granted_by),
            granted_at: Utc::now(),
            expires_at: input.expires_at,
            is_active: true,
            notes: input.notes,
        };
        self.put_settings_access(grant.clone()).await;
        Ok(grant)
    }

    async fn update_settings_levels(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        changes: &[(SettingsField, AccessLevel)],
    ) -> AppResult<SettingsAccessUpdate> {
        let mut grants = self.settings_access.lock().await;
        let grant = grants
            .get_mut(&(user_id, project_id))
            .filter(|grant| grant.is_effective_at(Utc::now()))
            .ok_or_else(|| AppError::NotFound("no active settings access".to_owned()))?;
        let previous = grant.levels;
        for (field, level) in changes {
            grant.levels.set(*field, *level);
        }
        Ok(SettingsAccessUpdate {
            previous,
            grant: grant.clone(),
        })
    }

    async fn revoke_settings_access(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<SettingsAccessGrant> {
        let mut grants = self.settings_access.lock().await;
        let grant = grants
            .get_mut(&(user_id, project_id))
            .filter(|grant| grant.is_active)
            .ok_or_else(|| AppError::NotFound("no active settings access".to_owned()))?;
        grant.is_active = false;
        Ok(grant.clone())
    }

    async fn list_settings_access_for_project(
        &self,
        project_id: ProjectId,
    ) -> AppResult<Vec<SettingsAccessGrant>> {
        Ok(self
            .settings_access
            .lock()
            .await
            .values()
            .filter(|grant| grant.project_id == project_id && grant.is_active)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AuditRepository for FakeAccessStore {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

#[async_trait]
impl AuditLogRepository for FakeAccessStore {
    async fn list_recent_entries(
        &self,
        organization_id: OrganizationId,
        query: AuditLogQuery,
    ) -> AppResult<Vec<AuditLogEntry>> {
        Ok(self
            .events
            .lock()
            .await
            .iter()
            .rev()
            .filter(|event| event.organization_id == organization_id)
            .filter(|event| {
                query
                    .action
                    .as_deref()
                    .is_none_or(|action| event.action.as_str() == action)
            })
            .filter(|event| query.actor_id.is_none_or(|actor_id| event.actor_id == actor_id))
            .skip(query.offset)
            .take(query.limit)
            .map(|event| AuditLogEntry {
                event_id: Uuid::new_v4(),
                actor_id: event.actor_id,
                action: event.action.as_str().to_owned(),
                resource_type: event.resource_type.clone(),
                resource_id: event.resource_id.clone(),
                detail: event.detail.clone(),
                created_at: Utc::now(),
            })
            .collect())
    }
}
