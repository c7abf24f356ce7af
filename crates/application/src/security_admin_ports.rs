use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use labelgate_core::{AppResult, UserId};
use labelgate_domain::{RoleKind, RoleName, RolePermission};

/// Role definition returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDefinition {
    /// Stable role identifier.
    pub role_id: Uuid,
    /// Canonical role name.
    pub name: RoleName,
    /// Human-readable name.
    pub display_name: String,
    /// Free-form description.
    pub description: String,
    /// Indicates a system-managed role.
    pub is_system: bool,
    /// Inactive roles confer nothing.
    pub is_active: bool,
    /// Creator, absent for seeded roles.
    pub created_by: Option<UserId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl RoleDefinition {
    /// Returns the built-in classification of this role.
    #[must_use]
    pub fn kind(&self) -> RoleKind {
        self.name.kind()
    }
}

/// Assignment projection mapping a user to a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    /// Stable assignment identifier.
    pub assignment_id: Uuid,
    /// Assigned user.
    pub user_id: UserId,
    /// Role identifier.
    pub role_id: Uuid,
    /// Canonical role name.
    pub role_name: RoleName,
    /// Cleared on revocation.
    pub is_active: bool,
    /// Assigning user.
    pub assigned_by: Option<UserId>,
    /// Assignment timestamp, refreshed on reactivation.
    pub assigned_at: DateTime<Utc>,
    /// Set while revoked.
    pub revoked_at: Option<DateTime<Utc>>,
    /// Set while revoked.
    pub revoked_by: Option<UserId>,
    /// Free-form notes.
    pub notes: String,
}

/// Active role held through an active assignment, with the entries it grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeldRole {
    /// Role definition, always active.
    pub role: RoleDefinition,
    /// Timestamp of the assignment that confers the role.
    pub assigned_at: DateTime<Utc>,
    /// Permission entries with `is_granted` set.
    pub permissions: Vec<RolePermission>,
}

impl HeldRole {
    /// Returns whether this role grants `permission_name` on exactly `resource`.
    #[must_use]
    pub fn grants(&self, permission_name: &str, resource: &str) -> bool {
        self.permissions.iter().any(|permission| {
            permission.is_granted()
                && permission.permission_name() == permission_name
                && permission.resource() == resource
        })
    }
}

/// How an assignment request was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOutcome {
    /// A new record was inserted.
    Created,
    /// A revoked record was reactivated.
    Reactivated,
}

/// Assignment returned by the activate-or-create operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentResult {
    /// Stored assignment.
    pub assignment: RoleAssignment,
    /// Whether the record was created or reactivated.
    pub outcome: AssignmentOutcome,
}

/// Input payload for creating roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Raw role name, canonicalized by the service.
    pub name: String,
    /// Optional display name, derived from the name when absent.
    pub display_name: Option<String>,
    /// Free-form description.
    pub description: String,
    /// Permission entries to attach.
    pub permissions: Vec<RolePermission>,
}

/// Input payload for assigning roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignRoleInput {
    /// Target user.
    pub user_id: UserId,
    /// Raw role name.
    pub role_name: String,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Repository payload for inserting a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    /// Canonical role name.
    pub name: RoleName,
    /// Human-readable name.
    pub display_name: String,
    /// Free-form description.
    pub description: String,
    /// Indicates a system-managed role.
    pub is_system: bool,
    /// Creator, absent for seeded roles.
    pub created_by: Option<UserId>,
}

/// Repository payload for the activate-or-create assignment operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoleAssignment {
    /// Target user.
    pub user_id: UserId,
    /// Canonical role name.
    pub role_name: RoleName,
    /// Assigning user.
    pub assigned_by: UserId,
    /// Free-form notes.
    pub notes: String,
}

/// Repository port for role and assignment administration.
#[async_trait]
pub trait SecurityAdminRepository: Send + Sync {
    /// Inserts a role, `Conflict` when the canonical name exists.
    async fn create_role(&self, role: NewRole) -> AppResult<RoleDefinition>;

    /// Finds a role by canonical name.
    async fn find_role(&self, name: &RoleName) -> AppResult<Option<RoleDefinition>>;

    /// Lists roles ordered by name.
    async fn list_roles(&self, include_inactive: bool) -> AppResult<Vec<RoleDefinition>>;

    /// Flips the role active flag.
    async fn set_role_active(&self, name: &RoleName, is_active: bool)
    -> AppResult<RoleDefinition>;

    /// Replaces every permission entry of a role.
    async fn replace_role_permissions(
        &self,
        name: &RoleName,
        permissions: Vec<RolePermission>,
    ) -> AppResult<Vec<RolePermission>>;

    /// Lists permission entries of a role.
    async fn list_role_permissions(&self, name: &RoleName) -> AppResult<Vec<RolePermission>>;

    /// Atomically creates an assignment or reactivates a revoked one.
    ///
    /// Returns `Conflict` when the user already holds an active assignment of the role.
    async fn activate_or_create_assignment(
        &self,
        assignment: NewRoleAssignment,
    ) -> AppResult<AssignmentResult>;

    /// Revokes the active assignment, `NotFound` when there is none.
    async fn revoke_assignment(
        &self,
        user_id: UserId,
        role_name: &RoleName,
        revoked_by: UserId,
    ) -> AppResult<RoleAssignment>;

    /// Lists assignments held by one user.
    async fn list_assignments_for_user(
        &self,
        user_id: UserId,
        active_only: bool,
    ) -> AppResult<Vec<RoleAssignment>>;

    /// Lists active assignments of one role.
    async fn list_assignments_for_role(&self, name: &RoleName) -> AppResult<Vec<RoleAssignment>>;

    /// Lists active roles the user holds through active assignments, ordered by name.
    ///
    /// Only permission entries with `is_granted` set are returned.
    async fn list_held_roles(&self, user_id: UserId) -> AppResult<Vec<HeldRole>>;
}
