use super::*;

use labelgate_application::AssignmentOutcome;

impl InMemoryAccessControlRepository {
    pub(super) async fn list_active_role_kinds_impl(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<RoleKind>> {
        let roles = self.roles.read().await;
        let assignments = self.assignments.read().await;

        Ok(assignments
            .values()
            .filter(|assignment| assignment.user_id == user_id && assignment.is_active)
            .filter_map(|assignment| roles.get(&assignment.role_name))
            .filter(|stored| stored.definition.is_active)
            .map(|stored| stored.definition.kind())
            .collect())
    }

    pub(super) async fn create_role_impl(&self, role: NewRole) -> AppResult<RoleDefinition> {
        let mut roles = self.roles.write().await;
        if roles.contains_key(&role.name) {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                role.name
            )));
        }

        let definition = RoleDefinition {
            role_id: Uuid::new_v4(),
            name: role.name.clone(),
            display_name: role.display_name,
            description: role.description,
            is_system: role.is_system,
            is_active: true,
            created_by: role.created_by,
            created_at: Utc::now(),
        };
        roles.insert(
            role.name,
            StoredRole {
                definition: definition.clone(),
                permissions: Vec::new(),
            },
        );
        Ok(definition)
    }

    pub(super) async fn list_roles_impl(
        &self,
        include_inactive: bool,
    ) -> AppResult<Vec<RoleDefinition>> {
        let roles = self.roles.read().await;
        let mut listed: Vec<RoleDefinition> = roles
            .values()
            .filter(|stored| include_inactive || stored.definition.is_active)
            .map(|stored| stored.definition.clone())
            .collect();
        listed.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(listed)
    }

    pub(super) async fn set_role_active_impl(
        &self,
        name: &RoleName,
        is_active: bool,
    ) -> AppResult<RoleDefinition> {
        let mut roles = self.roles.write().await;
        let stored = roles
            .get_mut(name)
            .ok_or_else(|| AppError::NotFound(format!("role '{name}' does not exist")))?;
        stored.definition.is_active = is_active;
        Ok(stored.definition.clone())
    }

    pub(super) async fn replace_role_permissions_impl(
        &self,
        name: &RoleName,
        permissions: Vec<RolePermission>,
    ) -> AppResult<Vec<RolePermission>> {
        let mut roles = self.roles.write().await;
        let stored = roles
            .get_mut(name)
            .ok_or_else(|| AppError::NotFound(format!("role '{name}' does not exist")))?;

        // (permission_name, resource) is unique per role; later entries win.
        let mut deduplicated: Vec<RolePermission> = Vec::with_capacity(permissions.len());
        for permission in permissions {
            deduplicated.retain(|existing| {
                existing.permission_name() != permission.permission_name()
                    || existing.resource() != permission.resource()
            });
            deduplicated.push(permission);
        }

        stored.permissions = deduplicated.clone();
        Ok(deduplicated)
    }

    pub(super) async fn activate_or_create_assignment_impl(
        &self,
        assignment: NewRoleAssignment,
    ) -> AppResult<AssignmentResult> {
        let roles = self.roles.read().await;
        let role = roles.get(&assignment.role_name).ok_or_else(|| {
            AppError::NotFound(format!("role '{}' does not exist", assignment.role_name))
        })?;
        let key = (assignment.user_id, role.definition.role_id);

        let mut assignments = self.assignments.write().await;
        if let Some(existing) = assignments.get_mut(&key) {
            if existing.is_active {
                return Err(AppError::Conflict(format!(
                    "user '{}' already holds role '{}'",
                    assignment.user_id, assignment.role_name
                )));
            }

            existing.is_active = true;
            existing.assigned_by = Some(assignment.assigned_by);
            existing.assigned_at = Utc::now();
            existing.revoked_at = None;
            existing.revoked_by = None;
            if !assignment.notes.is_empty() {
                existing.notes = assignment.notes;
            }

            return Ok(AssignmentResult {
                assignment: existing.clone(),
                outcome: AssignmentOutcome::Reactivated,
            });
        }

        let created = RoleAssignment {
            assignment_id: Uuid::new_v4(),
            user_id: assignment.user_id,
            role_id: role.definition.role_id,
            role_name: role.definition.name.clone(),
            is_active: true,
            assigned_by: Some(assignment.assigned_by),
            assigned_at: Utc::now(),
            revoked_at: None,
            revoked_by: None,
            notes: assignment.notes,
        };
        assignments.insert(key, created.clone());

        Ok(AssignmentResult {
            assignment: created,
            outcome: AssignmentOutcome::Created,
        })
    }

    pub(super) async fn revoke_assignment_impl(
        &self,
        user_id: UserId,
        role_name: &RoleName,
        revoked_by: UserId,
    ) -> AppResult<RoleAssignment> {
        let roles = self.roles.read().await;
        let not_found = || {
            AppError::NotFound(format!(
                "user '{user_id}' has no active assignment of role '{role_name}'"
            ))
        };
        let role_id = roles
            .get(role_name)
            .map(|stored| stored.definition.role_id)
            .ok_or_else(not_found)?;

        let mut assignments = self.assignments.write().await;
        let assignment = assignments
            .get_mut(&(user_id, role_id))
            .filter(|assignment| assignment.is_active)
            .ok_or_else(not_found)?;

        assignment.is_active = false;
        assignment.revoked_at = Some(Utc::now());
        assignment.revoked_by = Some(revoked_by);
        Ok(assignment.clone())
    }

    pub(super) async fn list_assignments_impl<F>(
        &self,
        predicate: F,
    ) -> AppResult<Vec<RoleAssignment>>
    where
        F: Fn(&RoleAssignment) -> bool + Send,
    {
        let assignments = self.assignments.read().await;
        let mut listed: Vec<RoleAssignment> = assignments
            .values()
            .filter(|assignment| predicate(assignment))
            .cloned()
            .collect();
        listed.sort_by_key(|assignment| assignment.assigned_at);
        Ok(listed)
    }

    pub(super) async fn list_held_roles_impl(&self, user_id: UserId) -> AppResult<Vec<HeldRole>> {
        let roles = self.roles.read().await;
        let assignments = self.assignments.read().await;

        let mut held: Vec<HeldRole> = assignments
            .values()
            .filter(|assignment| assignment.user_id == user_id && assignment.is_active)
            .filter_map(|assignment| {
                let stored = roles.get(&assignment.role_name)?;
                stored.definition.is_active.then(|| HeldRole {
                    role: stored.definition.clone(),
                    assigned_at: assignment.assigned_at,
                    permissions: stored
                        .permissions
                        .iter()
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
