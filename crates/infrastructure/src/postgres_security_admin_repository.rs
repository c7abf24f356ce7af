use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use labelgate_application::{
    AssignmentResult, HeldRole, NewRole, NewRoleAssignment, RoleAssignment, RoleDefinition,
    SecurityAdminRepository,
};
use labelgate_core::{AppError, AppResult, UserId};
use labelgate_domain::{PermissionType, RoleName, RolePermission};

use crate::postgres_rows::{map_query_error, map_write_error, stored_role_name};

mod assignments;
mod roles;


const ROLE_COLUMNS: &str = r#"
    id AS role_id,
    name,
    display_name,
    description,
    is_system,
    is_active,
    created_by,
    created_at
"#;

const ASSIGNMENT_SELECT: &str = r#"
    SELECT
        assignments.id AS assignment_id,
        assignments.user_id,
        assignments.role_id,
        roles.name AS role_name,
        assignments.is_active,
        assignments.assigned_by,
        assignments.assigned_at,
        assignments.revoked_at,
        assignments.revoked_by,
        assignments.notes
    FROM rbac_user_role_assignments AS assignments
    INNER JOIN rbac_roles AS roles
        ON roles.id = assignments.role_id
"#;

/// PostgreSQL-backed repository for roles and role assignments.
#[derive(Clone)]
pub struct PostgresSecurityAdminRepository {
    pool: PgPool,
}

impl PostgresSecurityAdminRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> AppResult<Transaction<'_, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|error| AppError::Internal(format!("failed to begin transaction: {error}")))
    }
}

async fn commit(transaction: Transaction<'_, Postgres>) -> AppResult<()> {
    transaction
        .commit()
        .await
        .map_err(|error| AppError::Internal(format!("failed to commit transaction: {error}")))
}

#[derive(Debug, FromRow)]
struct RoleRow {
    role_id: Uuid,
    name: String,
    display_name: String,
    description: String,
    is_system: bool,
    is_active: bool,
    created_by: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl TryFrom<RoleRow> for RoleDefinition {
    type Error = AppError;

    fn try_from(row: RoleRow) -> AppResult<Self> {
        Ok(Self {
            role_id: row.role_id,
            name: stored_role_name(row.name)?,
            display_name: row.display_name,
            description: row.description,
            is_system: row.is_system,
            is_active: row.is_active,
            created_by: row.created_by.map(UserId::from_uuid),
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct RolePermissionRow {
    permission_name: String,
    permission_type: String,
    resource: String,
    is_granted: bool,
}

impl TryFrom<RolePermissionRow> for RolePermission {
    type Error = AppError;

    fn try_from(row: RolePermissionRow) -> AppResult<Self> {
        let permission_type = PermissionType::from_str(row.permission_type.as_str())
            .map_err(|error| {
                AppError::Internal(format!("invalid permission persisted in storage: {error}"))
            })?;
        RolePermission::new(
            row.permission_name,
            permission_type,
            row.resource,
            row.is_granted,
        )
    }
}

#[derive(Debug, FromRow)]
struct HeldRoleRow {
    #[sqlx(flatten)]
    role: RoleRow,
    assigned_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct HeldPermissionRow {
    role_id: Uuid,
    #[sqlx(flatten)]
    permission: RolePermissionRow,
}

#[derive(Debug, FromRow)]
struct RoleAssignmentRow {
    assignment_id: Uuid,
    user_id: Uuid,
    role_id: Uuid,
    role_name: String,
    is_active: bool,
    assigned_by: Option<Uuid>,
    assigned_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
    revoked_by: Option<Uuid>,
    notes: String,
}

impl TryFrom<RoleAssignmentRow> for RoleAssignment {
    type Error = AppError;

    fn try_from(row: RoleAssignmentRow) -> AppResult<Self> {
        Ok(Self {
            assignment_id: row.assignment_id,
            user_id: UserId::from_uuid(row.user_id),
            role_id: row.role_id,
            role_name: stored_role_name(row.role_name)?,
            is_active: row.is_active,
            assigned_by: row.assigned_by.map(UserId::from_uuid),
            assigned_at: row.assigned_at,
            revoked_at: row.revoked_at,
            revoked_by: row.revoked_by.map(UserId::from_uuid),
            notes: row.notes,
        })
    }
}

#[async_trait]
impl SecurityAdminRepository for PostgresSecurityAdminRepository {
    async fn create_role(&self, role: NewRole) -> AppResult<RoleDefinition> {
        self.create_role_impl(role).await
    }

    async fn find_role(&self, name: &RoleName) -> AppResult<Option<RoleDefinition>> {
        self.find_role_impl(name).await
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
        let mut connection = self
            .pool
            .acquire()
            .await
            .map_err(map_query_error("acquire connection"))?;
        list_permissions(&mut connection, name).await
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
        let sql = format!(
            "{ASSIGNMENT_SELECT} WHERE assignments.user_id = $1 AND (NOT $2 OR assignments.is_active) ORDER BY assignments.assigned_at"
        );
        let rows = sqlx::query_as::<_, RoleAssignmentRow>(sql.as_str())
            .bind(user_id.as_uuid())
            .bind(active_only)
            .fetch_all(&self.pool)
            .await
            .map_err(map_query_error("list user role assignments"))?;

        rows.into_iter().map(RoleAssignment::try_from).collect()
    }

    async fn list_assignments_for_role(&self, name: &RoleName) -> AppResult<Vec<RoleAssignment>> {
        let sql = format!(
            "{ASSIGNMENT_SELECT} WHERE roles.name = $1 AND assignments.is_active ORDER BY assignments.assigned_at"
        );
        let rows = sqlx::query_as::<_, RoleAssignmentRow>(sql.as_str())
            .bind(name.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(map_query_error("list role assignments"))?;

        rows.into_iter().map(RoleAssignment::try_from).collect()
    }

    async fn list_held_roles(&self, user_id: UserId) -> AppResult<Vec<HeldRole>> {
        self.list_held_roles_impl(user_id).await
    }
}

async fn list_permissions(
    connection: &mut PgConnection,
    name: &RoleName,
) -> AppResult<Vec<RolePermission>> {
    let rows = sqlx::query_as::<_, RolePermissionRow>(
        r#"
        SELECT
            permissions.permission_name,
            permissions.permission_type,
            permissions.resource,
            permissions.is_granted
        FROM rbac_role_permissions AS permissions
        INNER JOIN rbac_roles AS roles
            ON roles.id = permissions.role_id
        WHERE roles.name = $1
        ORDER BY permissions.permission_name, permissions.resource
        "#,
    )
    .bind(name.as_str())
    .fetch_all(&mut *connection)
    .await
    .map_err(map_query_error("list role permissions"))?;

    rows.into_iter().map(RolePermission::try_from).collect()
}

async fn fetch_assignment(
    connection: &mut PgConnection,
    assignment_id: Uuid,
) -> AppResult<RoleAssignment> {
    let sql = format!("{ASSIGNMENT_SELECT} WHERE assignments.id = $1");
    let row = sqlx::query_as::<_, RoleAssignmentRow>(sql.as_str())
        .bind(assignment_id)
        .fetch_one(&mut *connection)
        .await
        .map_err(map_query_error("load role assignment"))?;

    RoleAssignment::try_from(row)
}

fn role_not_found(name: &RoleName) -> AppError {
    AppError::NotFound(format!("role '{name}' does not exist"))
}
